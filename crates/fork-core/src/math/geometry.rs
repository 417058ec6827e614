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


//! Provides geometric primitives for picking and bounding-volume queries.

use serde::{Deserialize, Serialize};

use super::{Mat4, Vec2, Vec3, EPSILON};

/// An Axis-Aligned Bounding Box (AABB).
///
/// An empty box is represented by [`Aabb::INVALID`], where `min > max`; inserting the
/// first point makes it valid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// The corner with the smallest coordinates on all axes.
    pub min: Vec3,
    /// The corner with the largest coordinates on all axes.
    pub max: Vec3,
}

impl Aabb {
    /// A box that contains nothing. Merging anything into it yields that thing.
    pub const INVALID: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    /// Creates a box from two corners; the corners are sorted per component.
    #[inline]
    pub fn from_min_max(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Creates the smallest box containing all `points`, or `None` for an empty slice.
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        Some(
            points
                .iter()
                .fold(Self::INVALID, |aabb, &p| aabb.merged_with_point(p)),
        )
    }

    /// Returns `true` if `min <= max` on every axis.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    /// The center point of the box.
    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Half of the box's size along each axis.
    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Returns a copy grown to contain `point`.
    #[inline]
    pub fn merged_with_point(&self, point: Vec3) -> Self {
        Self {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }

    /// Returns the smallest box containing both boxes.
    #[inline]
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Transforms all eight corners and returns the box enclosing them.
    pub fn transform(&self, matrix: &Mat4) -> Self {
        if !self.is_valid() {
            return *self;
        }
        (0..8).fold(Self::INVALID, |aabb, i| {
            let corner = Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
            aabb.merged_with_point(matrix.transform_point3(corner))
        })
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::INVALID
    }
}

/// A half-line starting at `origin`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// The start of the ray.
    pub origin: Vec3,
    /// The unit direction of the ray.
    pub direction: Vec3,
}

impl Ray {
    /// Creates a ray; `direction` is normalized.
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// The point at parameter `t` along the ray.
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Returns the point on the infinite line through `axis` that lies closest to this
    /// ray, or `None` when both lines are (nearly) parallel.
    pub fn closest_point_on_line(&self, axis: &Ray) -> Option<Vec3> {
        let w0 = self.origin - axis.origin;
        let a = self.direction.dot(self.direction);
        let b = self.direction.dot(axis.direction);
        let c = axis.direction.dot(axis.direction);
        let d = self.direction.dot(w0);
        let e = axis.direction.dot(w0);
        let denom = a * c - b * b;
        if denom.abs() < EPSILON {
            return None;
        }
        let t_axis = (a * e - b * d) / denom;
        Some(axis.at(t_axis))
    }

    /// Distance along the ray to the intersection with a sphere, if any.
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let b = oc.dot(self.direction);
        let c = oc.length_squared() - radius * radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let sqrt_disc = disc.sqrt();
        let t = if -b - sqrt_disc >= 0.0 {
            -b - sqrt_disc
        } else {
            -b + sqrt_disc
        };
        (t >= 0.0).then_some(t)
    }
}

/// An infinite plane `dot(normal, p) = distance`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// The unit normal of the plane.
    pub normal: Vec3,
    /// Signed distance of the plane from the origin along `normal`.
    pub distance: f32,
}

impl Plane {
    /// Creates the plane through `point` with the given normal.
    #[inline]
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        let normal = normal.normalize();
        Self {
            normal,
            distance: normal.dot(point),
        }
    }

    /// Intersects a ray with the plane, in either direction along the ray's line.
    ///
    /// Returns `None` when the ray is parallel to the plane.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<Vec3> {
        let denom = self.normal.dot(ray.direction);
        if denom.abs() < EPSILON {
            return None;
        }
        let t = (self.distance - self.normal.dot(ray.origin)) / denom;
        Some(ray.at(t))
    }
}

/// Shortest distance from `point` to the 2D segment `[start, end]`.
///
/// ```
/// use fork_core::math::{distance_to_segment_2d, Vec2};
///
/// let (start, end) = (Vec2::ZERO, Vec2::new(4.0, 0.0));
/// assert_eq!(distance_to_segment_2d(start, end, Vec2::new(2.0, 3.0)), 3.0);
/// assert_eq!(distance_to_segment_2d(start, end, Vec2::new(7.0, 4.0)), 5.0);
/// ```
pub fn distance_to_segment_2d(start: Vec2, end: Vec2, point: Vec2) -> f32 {
    let seg = end - start;
    let len_sq = seg.length_squared();
    if len_sq < EPSILON * EPSILON {
        return point.distance(start);
    }
    let t = ((point - start).dot(seg) / len_sq).clamp(0.0, 1.0);
    point.distance(start + seg * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_aabb_from_points() {
        let aabb = Aabb::from_points(&[
            Vec3::new(1.0, -2.0, 0.0),
            Vec3::new(-1.0, 4.0, 3.0),
            Vec3::new(0.0, 0.0, -5.0),
        ])
        .unwrap();
        assert_eq!(aabb.min, Vec3::new(-1.0, -2.0, -5.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 4.0, 3.0));
        assert_eq!(aabb.center(), Vec3::new(0.0, 1.0, -1.0));
        assert!(Aabb::from_points(&[]).is_none());
    }

    #[test]
    fn test_invalid_aabb_merge() {
        assert!(!Aabb::INVALID.is_valid());
        let p = Vec3::new(1.0, 2.0, 3.0);
        let merged = Aabb::INVALID.merged_with_point(p);
        assert!(merged.is_valid());
        assert_eq!(merged.min, p);
        assert_eq!(merged.max, p);
    }

    #[test]
    fn test_plane_intersection() {
        let plane = Plane::from_point_normal(Vec3::new(0.0, 2.0, 0.0), Vec3::Y);
        let ray = Ray::new(Vec3::new(1.0, 10.0, 1.0), -Vec3::Y);
        let hit = plane.intersect_ray(&ray).unwrap();
        assert_relative_eq!(hit.y, 2.0, epsilon = 1e-5);
        assert_relative_eq!(hit.x, 1.0, epsilon = 1e-5);

        let parallel = Ray::new(Vec3::ZERO, Vec3::X);
        assert!(plane.intersect_ray(&parallel).is_none());
    }

    #[test]
    fn test_closest_point_on_axis() {
        // A ray looking down -Z passing above the X axis at x = 3.
        let ray = Ray::new(Vec3::new(3.0, 1.0, 10.0), -Vec3::Z);
        let axis = Ray::new(Vec3::ZERO, Vec3::X);
        let p = ray.closest_point_on_line(&axis).unwrap();
        assert_relative_eq!(p.x, 3.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(p.z, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_segment_distance() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        assert_relative_eq!(distance_to_segment_2d(a, b, Vec2::new(5.0, 3.0)), 3.0);
        assert_relative_eq!(distance_to_segment_2d(a, b, Vec2::new(-4.0, 3.0)), 5.0);
        assert_relative_eq!(distance_to_segment_2d(a, a, Vec2::new(0.0, 2.0)), 2.0);
    }

    #[test]
    fn test_ray_sphere() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), -Vec3::Z);
        let t = ray.intersect_sphere(Vec3::ZERO, 1.0).unwrap();
        assert_relative_eq!(t, 9.0, epsilon = 1e-5);
        assert!(ray.intersect_sphere(Vec3::new(5.0, 0.0, 0.0), 1.0).is_none());
    }
}
