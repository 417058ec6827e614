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


//! Snapping of continuous values to a fixed grid.

use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// A scalar that accumulates continuous input and hands it out in whole raster steps.
///
/// `raster_flush` is the core of relative snapping: small deltas pile up until they
/// amount to at least half a step, at which point the snapped quantum is returned and
/// removed from the accumulator.
///
/// ```
/// use fork_core::math::RasterNumber;
///
/// let mut n = RasterNumber::default();
/// n += 2.3;
/// assert_eq!(n.raster_flush(5.0), 0.0);
/// n += 1.0;
/// assert_eq!(n.raster_flush(5.0), 5.0);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RasterNumber {
    /// The accumulated, not yet flushed value.
    pub value: f32,
}

impl RasterNumber {
    /// Creates a number holding `value`.
    #[inline]
    pub const fn new(value: f32) -> Self {
        Self { value }
    }

    /// Returns the value rounded to the nearest multiple of `size`.
    #[inline]
    pub fn raster(&self, size: f32) -> f32 {
        raster_value(self.value, size)
    }

    /// Removes and returns the snapped part of the value.
    ///
    /// Returns `0.0` (leaving the value untouched) while the value is less than half a
    /// step away from zero.
    pub fn raster_flush(&mut self, size: f32) -> f32 {
        if size <= 0.0 {
            return 0.0;
        }
        let steps = (self.value / size).round();
        if steps.abs() > 0.5 {
            let flushed = steps * size;
            self.value -= flushed;
            flushed
        } else {
            0.0
        }
    }

    /// Clears the accumulator.
    #[inline]
    pub fn reset(&mut self) {
        self.value = 0.0;
    }
}

impl AddAssign<f32> for RasterNumber {
    #[inline]
    fn add_assign(&mut self, rhs: f32) {
        self.value += rhs;
    }
}

/// Rounds `value` to the nearest multiple of `size`. A non-positive size is ignored.
///
/// ```
/// use fork_core::math::raster_value;
///
/// assert_eq!(raster_value(1.3, 0.5), 1.5);
/// assert_eq!(raster_value(1.3, 0.0), 1.3);
/// ```
#[inline]
pub fn raster_value(value: f32, size: f32) -> f32 {
    if size > 0.0 {
        (value / size).round() * size
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_raster_rounding() {
        let cases = [
            (3.5, 5.0, 5.0),
            (2.4, 5.0, 0.0),
            (-4.9, 5.0, -5.0),
            (8.3, 5.0, 10.0),
            (3.5, 3.0, 3.0),
            (1.5, 3.0, 3.0),
            (-1.4, 3.0, 0.0),
            (-1.7, 3.0, -3.0),
        ];
        for (value, size, expected) in cases {
            assert_relative_eq!(RasterNumber::new(value).raster(size), expected);
        }
    }

    #[test]
    fn test_raster_flush_sequence() {
        let mut n = RasterNumber::default();

        n += 2.3;
        assert_relative_eq!(n.raster_flush(5.0), 0.0);
        n += 1.0;
        assert_relative_eq!(n.raster_flush(5.0), 5.0);
        n += 1.0;
        assert_relative_eq!(n.raster_flush(5.0), 0.0);
        n += 10.5;
        assert_relative_eq!(n.raster_flush(5.0), 10.0);

        // 2.3 + 1 + 1 + 10.5 - 15 leaves the remainder behind.
        assert_relative_eq!(n.value, -0.2, epsilon = 1e-5);
    }

    #[test]
    fn test_non_positive_size_is_identity() {
        assert_eq!(raster_value(1.23, 0.0), 1.23);
        let mut n = RasterNumber::new(7.0);
        assert_eq!(n.raster_flush(0.0), 0.0);
        assert_eq!(n.value, 7.0);
    }
}
