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


//! Depth-first traversal of the scene graph.

use crate::graph::SceneGraph;
use crate::node::{NodeId, NodeKind, SceneNode};

/// What a [`SceneVisitor`] wants the traversal to do after visiting a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Descend into the node's children.
    Continue,
    /// Do not descend into this node's children.
    SkipChildren,
}

/// Receives every node of a subtree, parents before children, in child order.
///
/// Implementors dispatch on [`SceneNode::kind`] with a `match`; there is no per-kind
/// callback to override.
pub trait SceneVisitor {
    /// Visits one node. `depth` is 0 for the traversal root.
    fn visit(&mut self, graph: &SceneGraph, id: NodeId, node: &SceneNode, depth: usize) -> Visit;
}

impl SceneGraph {
    /// Walks the subtree rooted at `root` depth-first, pre-order.
    ///
    /// Does nothing if `root` is unknown.
    pub fn accept<V: SceneVisitor + ?Sized>(&self, root: NodeId, visitor: &mut V) {
        let mut stack = vec![(root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            let Some(node) = self.get(id) else {
                continue;
            };
            if visitor.visit(self, id, node, depth) == Visit::Continue {
                stack.extend(node.children().iter().rev().map(|&c| (c, depth + 1)));
            }
        }
    }
}

/// Writes the structure of a subtree to the log at `debug` level.
#[derive(Debug, Default)]
pub struct LogSceneVisitor {
    /// How many nodes were logged.
    pub visited: usize,
}

impl SceneVisitor for LogSceneVisitor {
    fn visit(&mut self, _graph: &SceneGraph, id: NodeId, node: &SceneNode, depth: usize) -> Visit {
        self.visited += 1;
        let kind = match &node.kind {
            NodeKind::Empty => "Empty".to_string(),
            NodeKind::Dynamic(t) => format!("Dynamic @ {:?}", t.position),
            NodeKind::Camera(c) => format!("Camera @ {:?}", c.transform.position),
            NodeKind::Geometry { transform, .. } => format!("Geometry @ {:?}", transform.position),
        };
        log::debug!(
            "{:indent$}{id} '{}' {kind}{}",
            "",
            node.meta.name,
            if node.is_enabled { "" } else { " (disabled)" },
            indent = depth * 2
        );
        Visit::Continue
    }
}
