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


//! Shared fixtures for unit tests.

use std::collections::HashMap;

use fork_core::math::{Aabb, Mat4, Vec3, FRAC_PI_2};
use fork_core::{Camera, Projection, Transform, Viewport};

use crate::selectable::{Selectable, TransformFlags};

#[derive(Debug, Clone, Default)]
pub(crate) struct TestNode {
    pub(crate) transform: Transform,
    pub(crate) flags: Option<TransformFlags>,
    pub(crate) bounds: Option<Aabb>,
    pub(crate) events: Vec<&'static str>,
}

impl Selectable for TestNode {
    fn local_transform(&self) -> &Transform {
        &self.transform
    }
    fn local_transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }
    fn global_transform(&self) -> Mat4 {
        self.transform.matrix()
    }
    fn bounding_box(&self) -> Option<Aabb> {
        self.bounds
    }
    fn transform_flags(&self) -> TransformFlags {
        self.flags.unwrap_or(TransformFlags::ALL)
    }
    fn on_transform_begin(&mut self) {
        self.events.push("begin");
    }
    fn on_transform_end(&mut self) {
        self.events.push("end");
    }
}

/// Nodes keyed `0..n` at the given positions.
pub(crate) fn nodes_at(positions: &[Vec3]) -> HashMap<u32, TestNode> {
    positions
        .iter()
        .enumerate()
        .map(|(i, &p)| {
            (
                i as u32,
                TestNode {
                    transform: Transform::from_position(p),
                    ..Default::default()
                },
            )
        })
        .collect()
}

/// A 90 degree perspective camera at `(0, 0, 10)` looking down `-Z` on an 800x600
/// viewport.
pub(crate) fn front_camera() -> Camera {
    camera_at(Vec3::new(0.0, 0.0, 10.0))
}

pub(crate) fn camera_at(position: Vec3) -> Camera {
    Camera::new(
        Transform::from_position(position),
        Projection::perspective(FRAC_PI_2, 0.1, 100.0, Viewport::default()),
    )
}
