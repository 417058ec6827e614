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


//! Ray picking of entities.

use fork_core::math::{Ray, Vec3};
use fork_selector::Selectable;

use crate::entity::{EntityId, EntityStore};

/// Resolves a world-space ray to the entity it hits first.
pub trait RayPicker {
    /// Returns the nearest entity along `ray`, if any.
    fn pick(&self, ray: &Ray) -> Option<EntityId>;
}

/// Picks entities by intersecting rays with bounding spheres.
///
/// Entities with bounds use the sphere enclosing their world-space box. Entities
/// without bounds get a sphere of [`default_radius`](Self::with_default_radius) around
/// their origin.
#[derive(Debug, Clone, Copy)]
pub struct BoundingSpherePicker<'a> {
    store: &'a EntityStore,
    default_radius: f32,
}

impl<'a> BoundingSpherePicker<'a> {
    /// Radius used for entities without bounds.
    pub const DEFAULT_RADIUS: f32 = 0.5;

    pub fn new(store: &'a EntityStore) -> Self {
        Self {
            store,
            default_radius: Self::DEFAULT_RADIUS,
        }
    }

    pub fn with_default_radius(mut self, radius: f32) -> Self {
        self.default_radius = radius.max(0.0);
        self
    }

    fn sphere(&self, entity: &dyn Selectable) -> (Vec3, f32) {
        match entity.bounding_box() {
            Some(bounds) => (bounds.center(), bounds.half_extents().length()),
            None => (
                entity.global_transform().translation(),
                self.default_radius,
            ),
        }
    }
}

impl RayPicker for BoundingSpherePicker<'_> {
    fn pick(&self, ray: &Ray) -> Option<EntityId> {
        self.store
            .iter()
            .filter_map(|(id, entity)| {
                let (center, radius) = self.sphere(entity);
                ray.intersect_sphere(center, radius).map(|t| (id, t))
            })
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(id, _)| id)
    }
}
