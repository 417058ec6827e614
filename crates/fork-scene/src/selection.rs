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


//! Gizmo manipulation of scene nodes.
//!
//! A [`SceneGraph`] is a [`SelectionHost`] keyed by [`NodeId`], so a
//! [`Selector`](fork_selector::Selector) can move nodes directly. Only nodes that carry
//! a transform resolve; grouping nodes behave like unknown keys.

use fork_core::math::{Aabb, Mat4};
use fork_core::Transform;
use fork_selector::{Selectable, SelectionHost, TransformFlags};

use crate::graph::SceneGraph;
use crate::node::{NodeId, NodeKind, SceneNode};

static IDENTITY: Transform = Transform::IDENTITY;

impl Selectable for SceneNode {
    fn local_transform(&self) -> &Transform {
        self.kind.transform().unwrap_or(&IDENTITY)
    }

    /// Writing the transform of an [`NodeKind::Empty`] node turns it into a
    /// [`NodeKind::Dynamic`] node at the identity.
    fn local_transform_mut(&mut self) -> &mut Transform {
        if matches!(self.kind, NodeKind::Empty) {
            self.kind = NodeKind::Dynamic(Transform::IDENTITY);
        }
        match &mut self.kind {
            NodeKind::Dynamic(transform) | NodeKind::Geometry { transform, .. } => transform,
            NodeKind::Camera(camera) => &mut camera.transform,
            NodeKind::Empty => unreachable!("empty nodes were promoted above"),
        }
    }

    fn global_transform(&self) -> Mat4 {
        self.parent_world * SceneNode::local_transform(self)
    }

    fn transform_flags(&self) -> TransformFlags {
        match self.kind {
            NodeKind::Empty => TransformFlags::NONE,
            NodeKind::Camera(_) => TransformFlags::TRANSLATE | TransformFlags::ROTATE,
            NodeKind::Dynamic(_) | NodeKind::Geometry { .. } => TransformFlags::ALL,
        }
    }

    fn bounding_box(&self) -> Option<Aabb> {
        match &self.kind {
            NodeKind::Geometry { bounds, .. } if bounds.is_valid() => {
                Some(bounds.transform(&self.global_transform()))
            }
            _ => None,
        }
    }

    fn on_transform_end(&mut self) {
        log::debug!(
            "Scene node '{}' now at {:?}",
            self.meta.name,
            Selectable::local_transform(self).position
        );
    }
}

impl SelectionHost<NodeId> for SceneGraph {
    fn selectable(&self, key: NodeId) -> Option<&dyn Selectable> {
        self.get(key)
            .filter(|node| node.has_transform())
            .map(|node| node as &dyn Selectable)
    }

    /// Refreshes the node's cached parent matrix before handing it out.
    fn selectable_mut(&mut self, key: NodeId) -> Option<&mut dyn Selectable> {
        if !self.has_transform(key) {
            return None;
        }
        let parent_world = self
            .parent(key)
            .map_or(Mat4::IDENTITY, |parent| self.global_transform(parent));
        let node = self.get_mut(key)?;
        node.parent_world = parent_world;
        Some(node as &mut dyn Selectable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fork_core::math::Vec3;

    fn dynamic_at(graph: &mut SceneGraph, position: Vec3) -> NodeId {
        graph.create(NodeKind::Dynamic(Transform::from_position(position)))
    }

    #[test]
    fn test_empty_nodes_do_not_resolve() {
        let mut graph = SceneGraph::new();
        let group = graph.create(NodeKind::Empty);
        let leaf = dynamic_at(&mut graph, Vec3::X);

        assert!(graph.selectable(group).is_none());
        assert!(graph.selectable_mut(group).is_none());
        assert!(graph.selectable(leaf).is_some());
    }

    #[test]
    fn test_global_transform_follows_parent() {
        // --- 1. ARRANGE ---
        let mut graph = SceneGraph::new();
        let parent = dynamic_at(&mut graph, Vec3::new(10.0, 0.0, 0.0));
        let child = dynamic_at(&mut graph, Vec3::new(0.0, 1.0, 0.0));
        graph.add_child(parent, child);

        // --- 2. ACT ---
        if let Some(NodeKind::Dynamic(t)) = graph.get_mut(parent).map(|n| &mut n.kind) {
            t.position = Vec3::new(20.0, 0.0, 0.0);
        }
        let stale = graph.selectable(child).unwrap().global_transform();
        let fresh = graph.selectable_mut(child).unwrap().global_transform();

        // --- 3. ASSERT ---
        assert_eq!(stale.translation(), Vec3::new(10.0, 1.0, 0.0));
        assert_eq!(fresh.translation(), Vec3::new(20.0, 1.0, 0.0));
        assert_eq!(
            graph.selectable(child).unwrap().global_transform().translation(),
            Vec3::new(20.0, 1.0, 0.0)
        );
    }

    #[test]
    fn test_refresh_reaches_grandchildren() {
        let mut graph = SceneGraph::new();
        let root = dynamic_at(&mut graph, Vec3::ZERO);
        let middle = graph.create(NodeKind::Empty);
        let leaf = dynamic_at(&mut graph, Vec3::Z);
        graph.add_child(root, middle);
        graph.add_child(middle, leaf);

        if let Some(NodeKind::Dynamic(t)) = graph.get_mut(root).map(|n| &mut n.kind) {
            t.position = Vec3::new(0.0, 3.0, 0.0);
        }
        graph.refresh_world_cache();

        let world = graph.selectable(leaf).unwrap().global_transform();
        assert_eq!(world.translation(), Vec3::new(0.0, 3.0, 1.0));
    }

    #[test]
    fn test_geometry_bounds_are_in_world_space() {
        let mut graph = SceneGraph::new();
        let parent = dynamic_at(&mut graph, Vec3::new(5.0, 0.0, 0.0));
        let mesh = graph.create(NodeKind::Geometry {
            transform: Transform::IDENTITY,
            bounds: Aabb::from_min_max(Vec3::splat(-1.0), Vec3::splat(1.0)),
        });
        graph.add_child(parent, mesh);

        let bounds = graph.selectable(mesh).unwrap().bounding_box().unwrap();
        assert_eq!(bounds.center(), Vec3::new(5.0, 0.0, 0.0));
        assert!(graph.selectable(parent).unwrap().bounding_box().is_none());
    }

    #[test]
    fn test_cameras_refuse_scaling() {
        let mut graph = SceneGraph::new();
        let camera = graph.create(NodeKind::Camera(fork_core::Camera::default()));
        let flags = graph.selectable(camera).unwrap().transform_flags();
        assert!(flags.contains(TransformFlags::ROTATE));
        assert!(!flags.intersects(TransformFlags::SCALE));
    }
}
