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


//! The position/rotation/scale value type used by scene nodes and selectable objects.

use serde::{Deserialize, Serialize};

use crate::math::{Mat4, Quaternion, Vec3, Vec4, EPSILON};

/// Describes an object's position, rotation, and scale relative to its parent.
///
/// `Transform` is a plain value: copy it freely. The matrix is derived on demand in
/// the standard `Translate * Rotate * Scale` order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// The position of the object.
    pub position: Vec3,
    /// The orientation of the object.
    pub rotation: Quaternion,
    /// The per-axis scale of the object.
    pub scale: Vec3,
}

impl Transform {
    /// The identity transform: origin, no rotation, unit scale.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quaternion::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Creates a transform from its three parts.
    pub fn new(position: Vec3, rotation: Quaternion, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Creates a transform at `position` with identity rotation and unit scale.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Builds the `T * R * S` matrix.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Decomposes an affine matrix. Negative scales are not recovered.
    pub fn from_matrix(m: &Mat4) -> Self {
        Self {
            position: m.translation(),
            rotation: Quaternion::from_rotation_matrix(m),
            scale: m.scale(),
        }
    }

    /// Moves the object by a delta expressed in its parent's space.
    #[inline]
    pub fn move_global(&mut self, delta: Vec3) {
        self.position += delta;
    }

    /// Moves the object along its own (rotated) axes.
    #[inline]
    pub fn move_local(&mut self, delta: Vec3) {
        self.position += self.rotation * delta;
    }

    /// Rotates the object around its own axes.
    #[inline]
    pub fn turn(&mut self, rotation: Quaternion) {
        self.rotation = (self.rotation * rotation).normalize();
    }

    /// Rotates the object around the parent-space axes through its own origin.
    #[inline]
    pub fn turn_global(&mut self, rotation: Quaternion) {
        self.rotation = (rotation * self.rotation).normalize();
    }

    /// Rotates the object around `pivot`, moving its position along the arc.
    pub fn turn_about(&mut self, rotation: Quaternion, pivot: Vec3) {
        let offset = self.position - pivot;
        self.position = pivot + rotation * offset;
        self.turn_global(rotation);
    }

    /// Adds `delta` to the scale.
    #[inline]
    pub fn scale_by(&mut self, delta: Vec3) {
        self.scale += delta;
    }

    /// Adds `delta` to the scale while keeping `pivot` fixed in parent space.
    pub fn scale_about(&mut self, delta: Vec3, pivot: Vec3) {
        let Some(inverse) = self.matrix().inverse() else {
            log::trace!("Degenerate transform {:?}, scaling without pivot", self.scale);
            self.scale_by(delta);
            return;
        };
        let pivot_offset = (inverse * Vec4::from_vec3(pivot, 1.0)).truncate();
        self.scale_by(delta);
        self.move_local(-(pivot_offset * delta));
    }

    /// Orients the object so that its forward axis (`-Z`) points at `target`.
    ///
    /// Does nothing if `target` coincides with the position or `up` is parallel to the
    /// view direction.
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        let forward = target - self.position;
        if forward.length_squared() < EPSILON * EPSILON {
            return;
        }
        let f = forward.normalize();
        let s = f.cross(up);
        if s.length_squared() < EPSILON * EPSILON {
            return;
        }
        let s = s.normalize();
        let u = s.cross(f);
        let basis = Mat4::from_cols(
            Vec4::from_vec3(s, 0.0),
            Vec4::from_vec3(u, 0.0),
            Vec4::from_vec3(-f, 0.0),
            Vec4::W,
        );
        self.rotation = Quaternion::from_rotation_matrix(&basis);
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
