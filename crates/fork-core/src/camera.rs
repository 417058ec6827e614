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


//! Cameras, projections, and the conversions between world and screen space.
//!
//! Screen space is measured in pixels with the origin at the top-left corner of the
//! window and `y` growing downwards. Projections are right-handed with a `[0, 1]`
//! depth range, matching the rest of the math library.

use serde::{Deserialize, Serialize};

use crate::math::{Mat4, Quaternion, Ray, Vec2, Vec3, Vec4};
use crate::transform::Transform;

/// A rectangular region of the window, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Viewport {
    /// Creates a viewport.
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Width divided by height, or `1.0` for a degenerate viewport.
    pub fn aspect_ratio(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0.0, 0.0, 800.0, 600.0)
    }
}

/// The projection model of a camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ProjectionKind {
    /// A perspective projection.
    Perspective {
        /// Vertical field of view in radians.
        fov_y_radians: f32,
    },
    /// An orthographic projection.
    Orthographic {
        /// Visible height in world units; the width follows the viewport aspect ratio.
        height: f32,
    },
}

/// A projection bound to a viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    /// The projection model.
    pub kind: ProjectionKind,
    /// Near clip distance.
    pub z_near: f32,
    /// Far clip distance.
    pub z_far: f32,
    /// The screen region the projection maps onto.
    pub viewport: Viewport,
}

impl Projection {
    /// Creates a perspective projection.
    pub fn perspective(fov_y_radians: f32, z_near: f32, z_far: f32, viewport: Viewport) -> Self {
        Self {
            kind: ProjectionKind::Perspective { fov_y_radians },
            z_near,
            z_far,
            viewport,
        }
    }

    /// Creates an orthographic projection showing `height` world units vertically.
    pub fn orthographic(height: f32, z_near: f32, z_far: f32, viewport: Viewport) -> Self {
        Self {
            kind: ProjectionKind::Orthographic { height },
            z_near,
            z_far,
            viewport,
        }
    }

    /// Returns `true` for orthographic projections.
    pub fn is_orthographic(&self) -> bool {
        matches!(self.kind, ProjectionKind::Orthographic { .. })
    }

    /// Builds the projection matrix.
    pub fn matrix(&self) -> Mat4 {
        let aspect = self.viewport.aspect_ratio();
        match self.kind {
            ProjectionKind::Perspective { fov_y_radians } => {
                Mat4::perspective_rh_zo(fov_y_radians, aspect, self.z_near, self.z_far)
            }
            ProjectionKind::Orthographic { height } => {
                let half_h = height * 0.5;
                let half_w = half_h * aspect;
                Mat4::orthographic_rh_zo(-half_w, half_w, -half_h, half_h, self.z_near, self.z_far)
            }
        }
    }

    /// Projects a point given in view space onto the screen.
    ///
    /// Returns `(x, y, depth)` with `x`/`y` in pixels, or `None` if the point lies
    /// behind the camera.
    pub fn project_point(&self, view_point: Vec3) -> Option<Vec3> {
        let clip = self.matrix() * Vec4::from_vec3(view_point, 1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        let vp = &self.viewport;
        Some(Vec3::new(
            vp.x + (ndc.x + 1.0) * 0.5 * vp.width,
            vp.y + (1.0 - ndc.y) * 0.5 * vp.height,
            ndc.z,
        ))
    }

    /// Builds the world-space picking ray through a screen point.
    ///
    /// `camera_matrix` is the camera's world transform (the inverse of the view matrix).
    /// Returns `None` if the combined matrix cannot be inverted.
    pub fn view_ray(&self, screen_point: Vec2, camera_matrix: &Mat4) -> Option<Ray> {
        let vp = &self.viewport;
        if vp.width <= 0.0 || vp.height <= 0.0 {
            return None;
        }
        let ndc_x = (screen_point.x - vp.x) / vp.width * 2.0 - 1.0;
        let ndc_y = 1.0 - (screen_point.y - vp.y) / vp.height * 2.0;

        let inv_projection = self.matrix().inverse()?;
        let to_world = *camera_matrix * inv_projection;
        let near = to_world.project_point3(Vec3::new(ndc_x, ndc_y, 0.0))?;
        let far = to_world.project_point3(Vec3::new(ndc_x, ndc_y, 1.0))?;
        Some(Ray::new(near, far - near))
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::perspective(std::f32::consts::FRAC_PI_4, 0.1, 1000.0, Viewport::default())
    }
}

/// A viewpoint into the scene: a world transform plus a projection.
///
/// The camera looks down its local `-Z` axis with `+Y` up. Its scale is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Camera {
    /// The camera's world transform.
    pub transform: Transform,
    /// The camera's projection.
    pub projection: Projection,
}

impl Camera {
    /// Creates a camera.
    pub fn new(transform: Transform, projection: Projection) -> Self {
        Self {
            transform,
            projection,
        }
    }

    /// World position of the camera.
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// World orientation of the camera.
    pub fn rotation(&self) -> Quaternion {
        self.transform.rotation
    }

    /// The camera's world matrix (rotation and translation only).
    pub fn camera_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(Vec3::ONE, self.rotation(), self.position())
    }

    /// The view matrix, mapping world space into camera space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_quat(self.rotation().conjugate()) * Mat4::from_translation(-self.position())
    }

    /// Projects a world-space point onto the screen.
    pub fn project_world(&self, world_point: Vec3) -> Option<Vec3> {
        self.projection
            .project_point(self.view_matrix().transform_point3(world_point))
    }

    /// Builds the world-space picking ray through a screen point.
    pub fn view_ray(&self, screen_point: Vec2) -> Option<Ray> {
        self.projection
            .view_ray(screen_point, &self.camera_matrix())
    }
}
