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


//! The capability an object implements to be manipulated by a selector.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use fork_core::math::{Aabb, Mat4, Quaternion, Vec3};
use fork_core::{ContractViolation, Transform};

/// The kinds of transformation an object accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransformFlags {
    bits: u32,
}

impl TransformFlags {
    /// No transformation is allowed.
    pub const NONE: Self = Self { bits: 0 };
    /// The object can be moved.
    pub const TRANSLATE: Self = Self { bits: 1 << 0 };
    /// The object can be rotated.
    pub const ROTATE: Self = Self { bits: 1 << 1 };
    /// The object can be scaled by the same amount on every axis.
    pub const UNIFORM_SCALE: Self = Self { bits: 1 << 2 };
    /// The object can be scaled independently per axis.
    pub const FREE_SCALE: Self = Self { bits: 1 << 3 };
    /// Any kind of scaling.
    pub const SCALE: Self = Self {
        bits: Self::UNIFORM_SCALE.bits | Self::FREE_SCALE.bits,
    };
    /// Everything.
    pub const ALL: Self = Self { bits: 0xff };

    /// Creates flags from raw bits.
    pub const fn from_bits(bits: u32) -> Self {
        Self { bits }
    }

    /// Returns the raw bits.
    pub const fn bits(&self) -> u32 {
        self.bits
    }

    /// Checks whether every flag of `other` is set.
    pub const fn contains(&self, other: Self) -> bool {
        (self.bits & other.bits) == other.bits
    }

    /// Checks whether at least one flag of `other` is set.
    pub const fn intersects(&self, other: Self) -> bool {
        (self.bits & other.bits) != 0
    }
}

impl std::ops::BitOr for TransformFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self::from_bits(self.bits | rhs.bits)
    }
}

impl Default for TransformFlags {
    fn default() -> Self {
        Self::ALL
    }
}

/// An object that can be selected and transformed by a
/// [`Selector`](crate::Selector).
///
/// The selector mutates [`local_transform_mut`](Selectable::local_transform_mut) and
/// then calls [`on_transform`](Selectable::on_transform), so implementors can push
/// the new transform to physics bodies, property grids, and the like.
pub trait Selectable {
    /// The transform relative to the object's parent.
    fn local_transform(&self) -> &Transform;

    /// Mutable access to the transform relative to the object's parent.
    fn local_transform_mut(&mut self) -> &mut Transform;

    /// The world matrix of the object.
    fn global_transform(&self) -> Mat4;

    /// Which transformations the object accepts.
    fn transform_flags(&self) -> TransformFlags {
        TransformFlags::ALL
    }

    /// World-space bounds used by the bounding-box pivot modes, if known.
    fn bounding_box(&self) -> Option<Aabb> {
        None
    }

    /// Called once when a drag starts.
    fn on_transform_begin(&mut self) {}

    /// Called after every incremental change to the transform.
    fn on_transform(&mut self) {}

    /// Called once when a drag ends or is cancelled.
    fn on_transform_end(&mut self) {}
}

/// Resolves selection keys to live [`Selectable`] objects.
///
/// Selectors only hold keys; whoever owns the objects passes itself as the host to
/// each operation that needs to read or move them.
pub trait SelectionHost<K> {
    /// Looks up an object.
    fn selectable(&self, key: K) -> Option<&dyn Selectable>;

    /// Looks up an object mutably.
    fn selectable_mut(&mut self, key: K) -> Option<&mut dyn Selectable>;
}

impl<K, T> SelectionHost<K> for HashMap<K, T>
where
    K: Eq + Hash,
    T: Selectable,
{
    fn selectable(&self, key: K) -> Option<&dyn Selectable> {
        self.get(&key).map(|obj| obj as &dyn Selectable)
    }

    fn selectable_mut(&mut self, key: K) -> Option<&mut dyn Selectable> {
        self.get_mut(&key).map(|obj| obj as &mut dyn Selectable)
    }
}

/// Key types usable in a selection.
pub trait SelectionKey: Copy + Eq + Hash + Debug {}

impl<K: Copy + Eq + Hash + Debug> SelectionKey for K {}

/// Runs `f` on the object's local transform and notifies it afterwards.
///
/// With `is_unique` set, the change is treated as a complete edit of its own:
/// `on_transform_begin` and `on_transform_end` bracket it.
pub fn transform_selectable(
    object: &mut dyn Selectable,
    is_unique: bool,
    f: impl FnOnce(&mut Transform),
) {
    if is_unique {
        object.on_transform_begin();
    }
    f(object.local_transform_mut());
    object.on_transform();
    if is_unique {
        object.on_transform_end();
    }
}

/// The error for a selected key its host can no longer resolve.
pub(crate) fn dangling<K: Debug>(key: K) -> ContractViolation {
    ContractViolation::DanglingSelection(format!("{key:?}"))
}

/// Maps world-space quantities into an object's parent space and back.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ParentSpace {
    matrix: Mat4,
    inverse: Mat4,
    rotation: Quaternion,
}

impl ParentSpace {
    /// Derives the parent frame from the object's global and local transforms.
    pub(crate) fn of(object: &dyn Selectable) -> Self {
        let local = object.local_transform().matrix();
        let parent = local
            .inverse()
            .map(|inv| object.global_transform() * inv)
            .unwrap_or(Mat4::IDENTITY);
        Self {
            matrix: parent,
            inverse: parent.inverse().unwrap_or(Mat4::IDENTITY),
            rotation: Quaternion::from_rotation_matrix(&parent),
        }
    }

    pub(crate) fn to_world(&self, local: Vec3) -> Vec3 {
        self.matrix.transform_point3(local)
    }

    pub(crate) fn point(&self, world: Vec3) -> Vec3 {
        self.inverse.transform_point3(world)
    }

    pub(crate) fn vector(&self, world: Vec3) -> Vec3 {
        self.inverse.transform_vector3(world)
    }

    /// The world orientation of an object whose local rotation is `local`.
    pub(crate) fn world_rotation(&self, local: Quaternion) -> Quaternion {
        self.rotation * local
    }

    pub(crate) fn rotation(&self, world: Quaternion) -> Quaternion {
        self.rotation.conjugate() * world * self.rotation
    }
}
