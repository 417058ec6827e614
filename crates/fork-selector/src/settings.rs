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


//! Tunable parameters of the selector.

use serde::{Deserialize, Serialize};

/// Errors raised while loading [`SelectorSettings`].
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The RON text could not be parsed.
    #[error("Invalid selector settings: {0}")]
    InvalidFormat(String),
}

/// Hit-testing, motion and sizing parameters of a selector.
///
/// Every field has a default, so a settings file only needs to list what it changes:
///
/// ```
/// use fork_selector::SelectorSettings;
///
/// let settings = SelectorSettings::from_ron("(selection_radius: 8.0)").unwrap();
/// assert_eq!(settings.selection_radius, 8.0);
/// assert_eq!(settings.motion_speed, 0.05);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorSettings {
    /// Pixel distance within which the pointer hits an axis or a plane handle.
    pub selection_radius: f32,
    /// Length of the plane handle edges relative to the axis length, in `[0, 1]`.
    pub axes_plane_size: f32,
    /// Projected axis length (pixels) at which an axis starts to fade in.
    pub visibility_min: f32,
    /// Projected axis length (pixels) at which an axis is fully visible.
    pub visibility_max: f32,
    /// Pixel radius around the projected origin that hits the uniform handle.
    pub uniform_radius: f32,
    /// Screen motion to transform progress factor.
    pub motion_speed: f32,
    /// Camera distance to translation speed factor.
    pub distance_factor: f32,
    /// Progress to radians factor for rotation.
    pub rotation_speed: f32,
    /// Progress factor for uniform rotate and scale.
    pub uniform_speed: f32,
    /// On-screen size of the gizmo, as a fraction of the viewport height.
    pub scale_factor: f32,
    /// Fades out axes that point (almost) straight at the viewer.
    pub use_visibility: bool,
    /// Translates by picking the axis/plane under the pointer instead of by relative
    /// pointer motion.
    pub picking_only_translation: bool,
}

impl Default for SelectorSettings {
    fn default() -> Self {
        Self {
            selection_radius: 5.0,
            axes_plane_size: 0.25,
            visibility_min: 10.0,
            visibility_max: 15.0,
            uniform_radius: 12.0,
            motion_speed: 0.05,
            distance_factor: 0.05,
            rotation_speed: 0.2,
            uniform_speed: 0.2,
            scale_factor: 0.5,
            use_visibility: true,
            picking_only_translation: false,
        }
    }
}

impl SelectorSettings {
    /// Parses settings from RON text. Missing fields keep their defaults.
    pub fn from_ron(text: &str) -> Result<Self, SettingsError> {
        ron::from_str(text).map_err(|e| SettingsError::InvalidFormat(e.to_string()))
    }

    /// Serializes the settings to pretty-printed RON.
    pub fn to_ron(&self) -> Result<String, SettingsError> {
        let pretty_config = ron::ser::PrettyConfig::default().indentor("  ".to_string());
        ron::ser::to_string_pretty(self, pretty_config)
            .map_err(|e| SettingsError::InvalidFormat(e.to_string()))
    }
}
