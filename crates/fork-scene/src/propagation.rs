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


use std::collections::{HashMap, VecDeque};

use fork_core::math::Mat4;

use crate::graph::SceneGraph;
use crate::node::NodeId;

/// Computes the global matrix of every live node in a single pass.
///
/// Performs a breadth-first traversal starting at every root, so a parent's matrix is
/// always final before any of its children are visited. Renderers call this once per
/// frame instead of asking [`SceneGraph::global_transform`] node by node, which would
/// re-walk the ancestor chain each time.
pub fn propagate_transforms(graph: &SceneGraph) -> HashMap<NodeId, Mat4> {
    let mut globals = HashMap::with_capacity(graph.len());
    let mut queue: VecDeque<NodeId> = VecDeque::new();

    for root in graph.roots() {
        globals.insert(root, graph.local_transform(root));
        queue.push_back(root);
    }

    while let Some(parent) = queue.pop_front() {
        let parent_matrix = globals.get(&parent).copied().unwrap_or(Mat4::IDENTITY);
        for &child in graph.children(parent) {
            globals.insert(child, parent_matrix * graph.local_transform(child));
            queue.push_back(child);
        }
    }

    globals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;
    use fork_core::math::{Quaternion, Vec3, EPSILON, FRAC_PI_2};
    use fork_core::Transform;

    fn assert_matrix_approx_eq(a: Mat4, b: Mat4) {
        for i in 0..4 {
            for j in 0..4 {
                let val_a = a.cols[i][j];
                let val_b = b.cols[i][j];
                assert!(
                    (val_a - val_b).abs() < EPSILON,
                    "Matrix mismatch at col {}, row {}: {} != {}",
                    i,
                    j,
                    val_a,
                    val_b
                );
            }
        }
    }

    #[test]
    fn test_propagation_matches_per_node_query() {
        // --- 1. ARRANGE ---
        let mut graph = SceneGraph::new();
        let root = graph.create(NodeKind::Dynamic(Transform::new(
            Vec3::new(10.0, 0.0, 0.0),
            Quaternion::from_axis_angle(Vec3::Y, FRAC_PI_2),
            Vec3::ONE,
        )));
        let group = graph.create(NodeKind::Empty);
        let leaf = graph.create(NodeKind::Dynamic(Transform::from_position(Vec3::new(
            0.0, 2.0, 1.0,
        ))));
        let lone = graph.create(NodeKind::Empty);
        graph.add_child(root, group);
        graph.add_child(group, leaf);

        // --- 2. ACT ---
        let globals = propagate_transforms(&graph);

        // --- 3. ASSERT ---
        assert_eq!(globals.len(), 4);
        for id in [root, group, leaf, lone] {
            assert_matrix_approx_eq(globals[&id], graph.global_transform(id));
        }
        // The rotated parent turns the child's +Z offset into +X.
        let p = globals[&leaf].translation();
        assert!((p - Vec3::new(11.0, 2.0, 0.0)).length() < 1e-4);
    }
}
