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


//! The hierarchical scene graph.
//!
//! Nodes live in a [`SceneGraph`] arena and are addressed by generational [`NodeId`]
//! handles. A parent exclusively owns its children: destroying a node destroys its
//! whole subtree, while the parent link kept by each child is a plain back-reference.
//!
//! The graph also serves as a selection host, so nodes can be moved with a gizmo (see
//! [`selection`]).
//!
//! ```
//! use fork_core::{math::Vec3, Transform};
//! use fork_scene::{NodeKind, SceneGraph};
//!
//! let mut graph = SceneGraph::new();
//! let root = graph.create(NodeKind::Empty);
//! let a = graph.create(NodeKind::Dynamic(Transform::from_position(Vec3::new(1.0, 0.0, 0.0))));
//! let b = graph.create(NodeKind::Dynamic(Transform::from_position(Vec3::new(0.0, 2.0, 0.0))));
//! graph.add_child(root, a);
//! graph.add_child(a, b);
//!
//! assert_eq!(graph.global_transform(b).translation(), Vec3::new(1.0, 2.0, 0.0));
//! ```

pub mod graph;
pub mod node;
pub mod propagation;
pub mod selection;
pub mod sorter;
pub mod visitor;

pub use graph::SceneGraph;
pub use node::{NodeFlags, NodeId, NodeKind, NodeMetaData, SceneNode};
pub use propagation::propagate_transforms;
pub use sorter::{sort_scene_nodes, SortMethod};
pub use visitor::{LogSceneVisitor, SceneVisitor, Visit};
