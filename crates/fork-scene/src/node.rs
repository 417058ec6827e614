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


//! Scene node data: handles, kinds, flags, and metadata.

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;

use fork_core::camera::Camera;
use fork_core::math::{Aabb, Mat4};
use fork_core::Transform;

/// A generational handle to a node stored in a [`SceneGraph`](crate::SceneGraph).
///
/// When a node is destroyed its slot may be recycled, but the generation is bumped, so
/// stale handles never resolve to the new occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId {
    /// The slot index inside the arena.
    pub index: u32,
    /// The generation of the slot when this handle was issued.
    pub generation: u32,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({}v{})", self.index, self.generation)
    }
}

/// Per-node bit flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct NodeFlags {
    bits: u32,
}

impl NodeFlags {
    /// No flags.
    pub const NONE: Self = Self { bits: 0 };
    /// The node is drawn with blending and must be ordered back-to-front.
    pub const TRANSPARENT: Self = Self { bits: 1 << 0 };
    /// The node is skipped by renderers.
    pub const HIDDEN: Self = Self { bits: 1 << 1 };

    /// Creates flags from raw bits.
    pub const fn from_bits(bits: u32) -> Self {
        Self { bits }
    }

    /// Returns the raw bits.
    pub const fn bits(&self) -> u32 {
        self.bits
    }

    /// Combines two sets of flags.
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Checks whether every flag of `other` is set.
    pub const fn contains(&self, other: Self) -> bool {
        (self.bits & other.bits) == other.bits
    }

    /// Sets or clears the flags of `other`.
    pub fn set(&mut self, other: Self, enabled: bool) {
        if enabled {
            self.bits |= other.bits;
        } else {
            self.bits &= !other.bits;
        }
    }
}

impl std::ops::BitOr for NodeFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

/// Descriptive data attached to every node.
#[derive(Default)]
pub struct NodeMetaData {
    /// A human-readable name.
    pub name: String,
    /// Rendering and behavior flags.
    pub flags: NodeFlags,
    /// Opaque data owned by whoever created the node.
    pub user_data: Option<Box<dyn Any>>,
}

impl NodeMetaData {
    /// Creates metadata with a name and no flags.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

impl fmt::Debug for NodeMetaData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeMetaData")
            .field("name", &self.name)
            .field("flags", &self.flags)
            .field("user_data", &self.user_data.is_some())
            .finish()
    }
}

/// What a node is. Traversals dispatch on this with a `match`.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// A pure grouping node without a transform of its own.
    Empty,
    /// A movable node.
    Dynamic(Transform),
    /// A camera placed in the scene.
    Camera(Camera),
    /// A drawable node with local-space bounds.
    Geometry {
        /// The node's transform.
        transform: Transform,
        /// Bounds in the node's local space.
        bounds: Aabb,
    },
}

impl NodeKind {
    /// The node's transform, if it carries one.
    pub fn transform(&self) -> Option<&Transform> {
        match self {
            NodeKind::Empty => None,
            NodeKind::Dynamic(transform) | NodeKind::Geometry { transform, .. } => Some(transform),
            NodeKind::Camera(camera) => Some(&camera.transform),
        }
    }

    /// Mutable access to the node's transform, if it carries one.
    pub fn transform_mut(&mut self) -> Option<&mut Transform> {
        match self {
            NodeKind::Empty => None,
            NodeKind::Dynamic(transform) | NodeKind::Geometry { transform, .. } => Some(transform),
            NodeKind::Camera(camera) => Some(&mut camera.transform),
        }
    }
}

/// A node of the scene graph.
///
/// Structural links (`parent`, `children`) are maintained by the owning
/// [`SceneGraph`](crate::SceneGraph) and are read-only from outside.
#[derive(Debug)]
pub struct SceneNode {
    /// What the node is.
    pub kind: NodeKind,
    /// Disabled nodes stay in the tree but are skipped by consumers.
    pub is_enabled: bool,
    /// Name, flags, and user data.
    pub meta: NodeMetaData,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    /// World matrix of the parent as of the last cache refresh.
    pub(crate) parent_world: Mat4,
}

impl SceneNode {
    pub(crate) fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            is_enabled: true,
            meta: NodeMetaData::default(),
            parent: None,
            children: Vec::new(),
            parent_world: Mat4::IDENTITY,
        }
    }

    /// Returns `true` if the node stores and uses a real [`Transform`].
    pub fn has_transform(&self) -> bool {
        !matches!(self.kind, NodeKind::Empty)
    }

    /// The node's transform relative to its parent; identity for nodes without one.
    pub fn local_transform(&self) -> Mat4 {
        self.kind
            .transform()
            .map(Transform::matrix)
            .unwrap_or(Mat4::IDENTITY)
    }

    /// The parent node, if any.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The owned children, in insertion order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Shorthand for checking a metadata flag.
    pub fn has_flag(&self, flag: NodeFlags) -> bool {
        self.meta.flags.contains(flag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fork_core::math::Vec3;

    #[test]
    fn test_empty_node_has_identity_transform() {
        let node = SceneNode::new(NodeKind::Empty);
        assert!(!node.has_transform());
        assert_eq!(node.local_transform(), Mat4::IDENTITY);
        assert!(node.is_enabled);
    }

    #[test]
    fn test_dynamic_node_exposes_transform() {
        let t = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
        let mut node = SceneNode::new(NodeKind::Dynamic(t));
        assert!(node.has_transform());
        assert_eq!(node.local_transform().translation(), Vec3::new(1.0, 2.0, 3.0));

        node.kind.transform_mut().unwrap().position = Vec3::ZERO;
        assert_eq!(node.local_transform(), Mat4::IDENTITY);
    }

    #[test]
    fn test_flags() {
        let mut flags = NodeFlags::NONE;
        flags.set(NodeFlags::TRANSPARENT, true);
        assert!(flags.contains(NodeFlags::TRANSPARENT));
        assert!(!flags.contains(NodeFlags::TRANSPARENT | NodeFlags::HIDDEN));
        flags.set(NodeFlags::TRANSPARENT, false);
        assert_eq!(flags, NodeFlags::NONE);
    }
}
