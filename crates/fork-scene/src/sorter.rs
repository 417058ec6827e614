// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


//! Draw-order sorting of scene nodes relative to a viewpoint.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use fork_core::math::Vec3;
use fork_core::Transform;

use crate::graph::SceneGraph;
use crate::node::{NodeFlags, NodeId};

/// How [`sort_scene_nodes`] orders its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortMethod {
    /// Closest nodes first.
    NearToFar,
    /// Farthest nodes first.
    FarToNear,
    /// Nodes without [`NodeFlags::TRANSPARENT`] first, near to far, followed by the
    /// transparent ones, far to near.
    OpaqueToTransparent,
}

/// Orders `nodes` by their position as seen from `compare_transform`.
///
/// Each node's position (global or local, per `is_global`) is moved into the space of
/// `compare_transform` and ranked by distance from its origin. Equal distances fall
/// back to a lexicographic `(x, y, z)` comparison so the order is total.
///
/// If `compare_transform` is not invertible the slice is left untouched.
pub fn sort_scene_nodes(
    graph: &SceneGraph,
    nodes: &mut [NodeId],
    compare_transform: &Transform,
    method: SortMethod,
    is_global: bool,
) {
    let Some(inv_compare) = compare_transform.matrix().inverse() else {
        log::warn!("Cannot sort scene nodes: compare transform is not invertible");
        return;
    };

    let position_of = |id: NodeId| {
        let matrix = if is_global {
            graph.global_transform(id)
        } else {
            graph.local_transform(id)
        };
        inv_compare.transform_point3(matrix.translation())
    };
    let is_transparent = |id: NodeId| {
        graph
            .get(id)
            .is_some_and(|node| node.has_flag(NodeFlags::TRANSPARENT))
    };

    let mut keyed: Vec<(NodeId, Vec3, bool)> = nodes
        .iter()
        .map(|&id| (id, position_of(id), is_transparent(id)))
        .collect();

    match method {
        SortMethod::NearToFar => keyed.sort_by(|a, b| compare_depth(a.1, b.1)),
        SortMethod::FarToNear => keyed.sort_by(|a, b| compare_depth(b.1, a.1)),
        SortMethod::OpaqueToTransparent => keyed.sort_by(|a, b| {
            a.2.cmp(&b.2).then_with(|| {
                if a.2 {
                    compare_depth(b.1, a.1)
                } else {
                    compare_depth(a.1, b.1)
                }
            })
        }),
    }

    for (slot, (id, _, _)) in nodes.iter_mut().zip(keyed) {
        *slot = id;
    }
}

/// Strict total order on compare-space positions: squared distance, then axis order.
fn compare_depth(a: Vec3, b: Vec3) -> Ordering {
    a.length_squared()
        .total_cmp(&b.length_squared())
        .then_with(|| a.cmp_lexicographic(&b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;

    fn spawn_row(graph: &mut SceneGraph, depths: &[f32]) -> Vec<NodeId> {
        depths
            .iter()
            .map(|&z| graph.create(NodeKind::Dynamic(Transform::from_position(Vec3::new(0.0, 0.0, z)))))
            .collect()
    }

    #[test]
    fn test_near_to_far_and_back() {
        let mut graph = SceneGraph::new();
        let ids = spawn_row(&mut graph, &[-5.0, -1.0, -3.0]);
        let mut nodes = ids.clone();

        sort_scene_nodes(&graph, &mut nodes, &Transform::IDENTITY, SortMethod::NearToFar, false);
        assert_eq!(nodes, vec![ids[1], ids[2], ids[0]]);

        sort_scene_nodes(&graph, &mut nodes, &Transform::IDENTITY, SortMethod::FarToNear, false);
        assert_eq!(nodes, vec![ids[0], ids[2], ids[1]]);
    }

    #[test]
    fn test_compare_transform_moves_the_viewpoint() {
        let mut graph = SceneGraph::new();
        let ids = spawn_row(&mut graph, &[0.0, 10.0]);
        let mut nodes = ids.clone();

        let viewer = Transform::from_position(Vec3::new(0.0, 0.0, 9.0));
        sort_scene_nodes(&graph, &mut nodes, &viewer, SortMethod::NearToFar, true);
        assert_eq!(nodes, vec![ids[1], ids[0]]);
    }

    #[test]
    fn test_opaque_before_transparent() {
        let mut graph = SceneGraph::new();
        let ids = spawn_row(&mut graph, &[1.0, 2.0, 3.0, 4.0]);
        for &id in &[ids[0], ids[2]] {
            graph.get_mut(id).unwrap().meta.flags = NodeFlags::TRANSPARENT;
        }
        let mut nodes = ids.clone();

        sort_scene_nodes(
            &graph,
            &mut nodes,
            &Transform::IDENTITY,
            SortMethod::OpaqueToTransparent,
            false,
        );

        // Opaque near to far, then transparent far to near.
        assert_eq!(nodes, vec![ids[1], ids[3], ids[2], ids[0]]);
    }

    #[test]
    fn test_sorting_is_idempotent() {
        let mut graph = SceneGraph::new();
        let mut nodes = spawn_row(&mut graph, &[7.0, -2.0, 3.5, 0.5, -9.0]);
        sort_scene_nodes(&graph, &mut nodes, &Transform::IDENTITY, SortMethod::NearToFar, false);
        let first = nodes.clone();
        sort_scene_nodes(&graph, &mut nodes, &Transform::IDENTITY, SortMethod::NearToFar, false);
        assert_eq!(nodes, first);
    }

    #[test]
    fn test_singular_compare_transform_leaves_order() {
        let mut graph = SceneGraph::new();
        let ids = spawn_row(&mut graph, &[3.0, 1.0]);
        let mut nodes = ids.clone();
        let flat = Transform {
            scale: Vec3::new(1.0, 1.0, 0.0),
            ..Default::default()
        };
        sort_scene_nodes(&graph, &mut nodes, &flat, SortMethod::NearToFar, false);
        assert_eq!(nodes, ids);
    }
}
