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


//! Editor entities and the generational store that owns them.

use std::fmt;

use fork_core::math::{Aabb, Mat4};
use fork_core::Transform;
use fork_selector::{Selectable, SelectionHost};
use serde::{Deserialize, Serialize};

/// A handle to an entity in an [`EntityStore`].
///
/// The generation is bumped every time a slot is recycled, so a handle to a destroyed
/// entity never resolves to whatever took its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId {
    /// The slot index.
    pub index: u32,
    /// How many times the slot has been recycled.
    pub generation: u32,
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({}v{})", self.index, self.generation)
    }
}

/// A named object placed in the editor scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Display name.
    pub name: String,
    /// Transform relative to the parent.
    pub transform: Transform,
    /// Bounds in local space, if the entity has a visual extent.
    #[serde(default)]
    pub bounds: Option<Aabb>,
    /// The parent entity, if any.
    #[serde(default)]
    pub parent: Option<EntityId>,
    #[serde(skip)]
    parent_matrix: Mat4,
    #[serde(skip)]
    selected: bool,
    #[serde(skip)]
    revision: u64,
}

impl Entity {
    /// Creates a root entity with the given local transform.
    pub fn new(name: impl Into<String>, transform: Transform) -> Self {
        Self {
            name: name.into(),
            transform,
            bounds: None,
            parent: None,
            parent_matrix: Mat4::IDENTITY,
            selected: false,
            revision: 0,
        }
    }

    /// Sets the local-space bounds.
    pub fn with_bounds(mut self, bounds: Aabb) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Sets the parent. The store validates it on spawn.
    pub fn with_parent(mut self, parent: EntityId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Whether the entity is part of the editor selection.
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    /// Number of transform changes applied through a selector.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The parent's world matrix as of the last hierarchy refresh.
    pub fn parent_matrix(&self) -> Mat4 {
        self.parent_matrix
    }
}

impl Selectable for Entity {
    fn local_transform(&self) -> &Transform {
        &self.transform
    }

    fn local_transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    fn global_transform(&self) -> Mat4 {
        self.parent_matrix * self.transform.matrix()
    }

    fn bounding_box(&self) -> Option<Aabb> {
        self.bounds
            .filter(Aabb::is_valid)
            .map(|bounds| bounds.transform(&self.global_transform()))
    }

    fn on_transform_begin(&mut self) {
        log::trace!("Transforming '{}'", self.name);
    }

    fn on_transform(&mut self) {
        self.revision += 1;
    }

    fn on_transform_end(&mut self) {
        log::debug!(
            "'{}' now at {:?} (scale {:?})",
            self.name,
            self.transform.position,
            self.transform.scale
        );
    }
}

/// Owns every entity of the editor scene.
///
/// Slots are recycled through a free list; each reuse bumps the slot's generation.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    entities: Vec<(EntityId, Option<Entity>)>,
    freed_entities: Vec<u32>,
}

impl EntityStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entity and returns its handle.
    ///
    /// A parent that does not resolve is dropped with a warning; the entity becomes a root.
    pub fn spawn(&mut self, mut entity: Entity) -> EntityId {
        if let Some(parent) = entity.parent {
            if !self.contains(parent) {
                log::warn!("Parent {parent} of '{}' does not exist", entity.name);
                entity.parent = None;
            }
        }
        entity.parent_matrix = entity
            .parent
            .and_then(|parent| self.global_matrix(parent))
            .unwrap_or(Mat4::IDENTITY);
        entity.selected = false;

        if let Some(index) = self.freed_entities.pop() {
            let (id_slot, entity_slot) = &mut self.entities[index as usize];
            id_slot.generation += 1;
            *entity_slot = Some(entity);
            *id_slot
        } else {
            let id = EntityId {
                index: self.entities.len() as u32,
                generation: 0,
            };
            self.entities.push((id, Some(entity)));
            id
        }
    }

    /// Removes an entity and returns it.
    ///
    /// Its children become roots and keep their world placement.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        if !self.contains(id) {
            return None;
        }
        for child in self.children(id) {
            let Some(world) = self.global_matrix(child) else {
                continue;
            };
            if let Some(entity) = self.get_mut(child) {
                entity.transform = Transform::from_matrix(&world);
                entity.parent = None;
                entity.parent_matrix = Mat4::IDENTITY;
            }
        }
        let removed = self.entities[id.index as usize].1.take();
        self.freed_entities.push(id.index);
        removed
    }

    /// Looks up an entity.
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities
            .get(id.index as usize)
            .and_then(|(slot_id, entity)| {
                if slot_id.generation == id.generation {
                    entity.as_ref()
                } else {
                    None
                }
            })
    }

    /// Looks up an entity mutably.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities
            .get_mut(id.index as usize)
            .and_then(|(slot_id, entity)| {
                if slot_id.generation == id.generation {
                    entity.as_mut()
                } else {
                    None
                }
            })
    }

    /// Returns `true` if `id` refers to a live entity.
    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.entities.iter().filter(|(_, e)| e.is_some()).count()
    }

    /// Returns `true` if the store has no live entity.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over live entities in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities
            .iter()
            .filter_map(|(id, entity)| entity.as_ref().map(|e| (*id, e)))
    }

    /// Handles of every live entity in slot order.
    pub fn ids(&self) -> Vec<EntityId> {
        self.iter().map(|(id, _)| id).collect()
    }

    /// Direct children of `id`.
    pub fn children(&self, id: EntityId) -> Vec<EntityId> {
        self.iter()
            .filter(|(_, e)| e.parent == Some(id))
            .map(|(child, _)| child)
            .collect()
    }

    /// Re-parents `child`, keeping its local transform.
    ///
    /// Returns `false` if either handle is dead or the change would create a cycle.
    pub fn set_parent(&mut self, child: EntityId, parent: Option<EntityId>) -> bool {
        if !self.contains(child) {
            return false;
        }
        if let Some(parent) = parent {
            if !self.contains(parent) || self.is_ancestor_or_self(child, parent) {
                return false;
            }
        }
        if let Some(entity) = self.get_mut(child) {
            entity.parent = parent;
        }
        self.refresh_hierarchy();
        true
    }

    fn is_ancestor_or_self(&self, ancestor: EntityId, mut id: EntityId) -> bool {
        loop {
            if id == ancestor {
                return true;
            }
            match self.get(id).and_then(|e| e.parent) {
                Some(parent) => id = parent,
                None => return false,
            }
        }
    }

    /// World matrix of `id`, composed from the live hierarchy.
    pub fn global_matrix(&self, id: EntityId) -> Option<Mat4> {
        let entity = self.get(id)?;
        let mut matrix = entity.transform.matrix();
        let mut next = entity.parent;
        while let Some(parent_id) = next {
            let Some(parent) = self.get(parent_id) else {
                break;
            };
            matrix = parent.transform.matrix() * matrix;
            next = parent.parent;
        }
        Some(matrix)
    }

    /// Recomputes every entity's cached parent matrix.
    ///
    /// Must run after transforms change before children are read through
    /// [`Selectable::global_transform`].
    pub fn refresh_hierarchy(&mut self) {
        let parent_matrices: Vec<(EntityId, Mat4)> = self
            .iter()
            .map(|(id, e)| {
                let matrix = e
                    .parent
                    .and_then(|parent| self.global_matrix(parent))
                    .unwrap_or(Mat4::IDENTITY);
                (id, matrix)
            })
            .collect();
        for (id, matrix) in parent_matrices {
            if let Some(entity) = self.get_mut(id) {
                entity.parent_matrix = matrix;
            }
        }
    }
}

impl SelectionHost<EntityId> for EntityStore {
    fn selectable(&self, key: EntityId) -> Option<&dyn Selectable> {
        self.get(key).map(|e| e as &dyn Selectable)
    }

    fn selectable_mut(&mut self, key: EntityId) -> Option<&mut dyn Selectable> {
        self.get_mut(key).map(|e| e as &mut dyn Selectable)
    }
}
