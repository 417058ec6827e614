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


//! Grid snapping for selector transforms.

use fork_core::math::{raster_value, RasterNumber, Vec3};
use serde::{Deserialize, Serialize};

/// How transform deltas are snapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RasterMode {
    /// No snapping.
    #[default]
    None,
    /// Deltas are accumulated and applied in whole raster steps.
    Relative,
    /// Resulting positions are snapped onto the world grid.
    Absolute,
}

impl RasterMode {
    /// Cycles `None -> Relative -> Absolute -> None`.
    pub fn next(self) -> Self {
        match self {
            RasterMode::None => RasterMode::Relative,
            RasterMode::Relative => RasterMode::Absolute,
            RasterMode::Absolute => RasterMode::None,
        }
    }
}

/// Standard `(size, angle in degrees)` pairs offered to the user.
pub const RASTER_PRESETS: [(f32, f32); 6] = [
    (0.1, 5.0),
    (0.25, 10.0),
    (0.5, 15.0),
    (1.0, 30.0),
    (2.5, 45.0),
    (5.0, 90.0),
];

/// Snapping configuration plus the relative-mode accumulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Raster {
    /// The snapping mode.
    pub mode: RasterMode,
    /// Grid size in world units, also used for scale steps.
    pub size: f32,
    /// Rotation step in degrees.
    pub angle: f32,
    /// Lets the gizmo follow the pointer freely while the objects snap.
    pub move_free_in_raster: bool,
    /// Translation accumulated but not yet applied in relative mode.
    #[serde(skip)]
    pub vector: [RasterNumber; 3],
}

impl Default for Raster {
    fn default() -> Self {
        Self {
            mode: RasterMode::None,
            size: 1.0,
            angle: 30.0,
            move_free_in_raster: true,
            vector: [RasterNumber::default(); 3],
        }
    }
}

impl Raster {
    /// Returns `true` unless the mode is [`RasterMode::None`].
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.mode != RasterMode::None
    }

    /// Snaps a scalar to the grid. Identity when snapping is off.
    pub fn snap(&self, value: f32) -> f32 {
        if self.is_enabled() {
            raster_value(value, self.size)
        } else {
            value
        }
    }

    /// Snaps an angle given in radians to the rotation step.
    pub fn snap_angle(&self, radians: f32) -> f32 {
        if self.is_enabled() {
            raster_value(radians, fork_core::math::degrees_to_radians(self.angle))
        } else {
            radians
        }
    }

    /// Applies a preset from [`RASTER_PRESETS`]. Returns `false` for an unknown index.
    pub fn apply_preset(&mut self, index: usize) -> bool {
        match RASTER_PRESETS.get(index) {
            Some(&(size, angle)) => {
                self.size = size;
                self.angle = angle;
                true
            }
            None => false,
        }
    }

    /// The accumulated, not yet applied translation.
    pub fn real_vector(&self) -> Vec3 {
        Vec3::new(self.vector[0].value, self.vector[1].value, self.vector[2].value)
    }

    /// Adds a translation to the accumulator.
    pub fn accumulate(&mut self, delta: Vec3) {
        for i in 0..3 {
            self.vector[i] += delta[i];
        }
    }

    /// Removes and returns the whole raster steps held by the accumulator.
    pub fn flush_vector(&mut self) -> Vec3 {
        let size = self.size;
        Vec3::new(
            self.vector[0].raster_flush(size),
            self.vector[1].raster_flush(size),
            self.vector[2].raster_flush(size),
        )
    }

    /// Clears the accumulator.
    pub fn reset_vector(&mut self) {
        self.vector.iter_mut().for_each(RasterNumber::reset);
    }
}
