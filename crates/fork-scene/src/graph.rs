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


//! The scene graph arena.

use std::collections::VecDeque;

use fork_core::math::Mat4;
use fork_core::Transform;

use crate::node::{NodeId, NodeKind, NodeMetaData, SceneNode};
use crate::sorter::{self, SortMethod};

/// Owns every scene node and maintains the parent/child relation between them.
///
/// Invariants:
/// * a node appears in at most one child list, and its `parent` names that list's owner;
/// * the relation is acyclic;
/// * handles to destroyed nodes never resolve again.
///
/// Handles that do not resolve (destroyed or never issued) are treated like a null node:
/// structural operations on them are silent no-ops and queries return identity/empty.
#[derive(Debug, Default)]
pub struct SceneGraph {
    /// Every slot ever allocated, paired with the handle currently issued for it.
    slots: Vec<(NodeId, Option<SceneNode>)>,
    /// Indices available for reuse.
    free: Vec<u32>,
    alive: usize,
}

impl SceneGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a detached node and returns its handle.
    pub fn create(&mut self, kind: NodeKind) -> NodeId {
        self.alive += 1;
        let node = SceneNode::new(kind);
        if let Some(index) = self.free.pop() {
            let (id, slot) = &mut self.slots[index as usize];
            id.generation += 1;
            *slot = Some(node);
            *id
        } else {
            let id = NodeId {
                index: self.slots.len() as u32,
                generation: 0,
            };
            self.slots.push((id, Some(node)));
            id
        }
    }

    /// Creates a detached node with the given name.
    pub fn create_named(&mut self, kind: NodeKind, name: impl Into<String>) -> NodeId {
        let id = self.create(kind);
        if let Some(node) = self.get_mut(id) {
            node.meta = NodeMetaData::named(name);
        }
        id
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.alive
    }

    /// Returns `true` if the graph holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.alive == 0
    }

    /// Returns `true` if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Resolves a handle.
    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.slots
            .get(id.index as usize)
            .and_then(|(slot_id, node)| {
                if slot_id.generation == id.generation {
                    node.as_ref()
                } else {
                    None
                }
            })
    }

    /// Resolves a handle mutably.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.slots
            .get_mut(id.index as usize)
            .and_then(|(slot_id, node)| {
                if slot_id.generation == id.generation {
                    node.as_mut()
                } else {
                    None
                }
            })
    }

    /// Iterates over all live nodes in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.slots
            .iter()
            .filter_map(|(id, node)| node.as_ref().map(|n| (*id, n)))
    }

    /// All live nodes without a parent, in slot order.
    pub fn roots(&self) -> Vec<NodeId> {
        self.iter()
            .filter(|(_, node)| node.parent.is_none())
            .map(|(id, _)| id)
            .collect()
    }

    /// The parent of `id`, if any.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|node| node.parent)
    }

    /// The children of `id` in insertion order. Empty for unknown handles.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|node| node.children()).unwrap_or(&[])
    }

    /// Returns `true` if `ancestor` lies on the parent chain of `node` (or is `node`).
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Appends `child` to `parent`'s children, detaching it from its previous parent.
    ///
    /// Does nothing if either handle is unknown, or if the link would make a node its
    /// own ancestor.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.is_alive(parent) || !self.is_alive(child) {
            log::trace!("add_child({parent}, {child}) ignored: unknown node");
            return;
        }
        if self.is_ancestor(child, parent) {
            log::warn!("add_child({parent}, {child}) ignored: would create a cycle");
            return;
        }

        self.detach(child);
        if let Some(node) = self.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.get_mut(parent) {
            node.children.push(child);
        }
        self.refresh_subtree(child);
    }

    /// Removes `child` from `parent`'s children and clears its parent link.
    ///
    /// The child stays alive as a root. Returns `false` if `child` was not a child of
    /// `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let Some(node) = self.get_mut(parent) else {
            return false;
        };
        let Some(pos) = node.children.iter().position(|&c| c == child) else {
            return false;
        };
        node.children.remove(pos);
        if let Some(node) = self.get_mut(child) {
            node.parent = None;
        }
        self.refresh_subtree(child);
        true
    }

    /// Detaches every child of `parent` and returns them, in their former order.
    ///
    /// The released nodes stay alive as roots; the caller decides whether to destroy or
    /// re-parent them.
    pub fn release_children(&mut self, parent: NodeId) -> Vec<NodeId> {
        let released = match self.get_mut(parent) {
            Some(node) => std::mem::take(&mut node.children),
            None => return Vec::new(),
        };
        for &child in &released {
            if let Some(node) = self.get_mut(child) {
                node.parent = None;
            }
            self.refresh_subtree(child);
        }
        released
    }

    /// Destroys `id` together with every node it owns, and returns how many nodes were
    /// destroyed. The node is removed from its parent's child list first.
    pub fn destroy(&mut self, id: NodeId) -> usize {
        if !self.is_alive(id) {
            return 0;
        }
        self.detach(id);

        let mut destroyed = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let (slot_id, slot) = &mut self.slots[current.index as usize];
            if slot_id.generation != current.generation {
                continue;
            }
            if let Some(node) = slot.take() {
                stack.extend(node.children);
                self.free.push(current.index);
                self.alive -= 1;
                destroyed += 1;
            }
        }
        log::trace!("Destroyed {destroyed} node(s) rooted at {id}");
        destroyed
    }

    /// The local transform of `id`; identity for unknown nodes and nodes without one.
    pub fn local_transform(&self, id: NodeId) -> Mat4 {
        self.get(id)
            .map(SceneNode::local_transform)
            .unwrap_or(Mat4::IDENTITY)
    }

    /// Composes the local transforms from the root down to `id`.
    pub fn global_transform(&self, id: NodeId) -> Mat4 {
        let mut matrix = self.local_transform(id);
        let mut current = self.parent(id);
        while let Some(ancestor) = current {
            matrix = self.local_transform(ancestor) * matrix;
            current = self.parent(ancestor);
        }
        matrix
    }

    /// Returns `true` if the node stores a transform of its own.
    pub fn has_transform(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(SceneNode::has_transform)
    }

    /// Reorders the children of `id` relative to `compare_transform`.
    ///
    /// See [`sort_scene_nodes`](crate::sorter::sort_scene_nodes).
    pub fn sort_children(
        &mut self,
        id: NodeId,
        compare_transform: &Transform,
        method: SortMethod,
        is_global: bool,
    ) {
        let Some(node) = self.get_mut(id) else {
            return;
        };
        let mut children = std::mem::take(&mut node.children);
        sorter::sort_scene_nodes(self, &mut children, compare_transform, method, is_global);
        if let Some(node) = self.get_mut(id) {
            node.children = children;
        }
    }

    /// Recomputes the cached parent matrix of every node.
    ///
    /// Structural edits keep the cache current on their own. Call this after changing
    /// transforms through [`get_mut`](Self::get_mut) so that selection reads the new
    /// world matrices.
    pub fn refresh_world_cache(&mut self) {
        for root in self.roots() {
            self.refresh_subtree(root);
        }
    }

    /// Refreshes the cached parent matrices of `id` and everything below it.
    pub(crate) fn refresh_subtree(&mut self, id: NodeId) {
        let parent_world = self
            .parent(id)
            .map_or(Mat4::IDENTITY, |parent| self.global_transform(parent));
        let mut queue = VecDeque::from([(id, parent_world)]);
        while let Some((current, parent_world)) = queue.pop_front() {
            let Some(node) = self.get_mut(current) else {
                continue;
            };
            node.parent_world = parent_world;
            let world = parent_world * node.local_transform();
            queue.extend(node.children.iter().map(|&child| (child, world)));
        }
    }

    /// Unlinks `id` from its parent, if it has one.
    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.parent(id) {
            self.remove_child(parent, id);
        }
    }
}
