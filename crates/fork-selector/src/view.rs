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


//! Draws the gizmo through a [`PrimitiveRenderer`].

use fork_core::math::{Vec2, Vec3};
use fork_core::{LinearRgba, PrimitiveRenderer, RenderError, Transform};
use serde::{Deserialize, Serialize};

use crate::model::{AxisState, SelectorModel};
use crate::selectable::SelectionKey;

/// Options for [`SelectorView::draw`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DrawFlags {
    bits: u32,
}

impl DrawFlags {
    /// No options.
    pub const NONE: Self = Self { bits: 0 };
    /// Draw "X", "Y" and "Z" next to the axis ends.
    pub const AXES_LABELS: Self = Self { bits: 1 << 0 };
    /// While dragging, draw only the locked axes.
    pub const SELECTED_AXES_ONLY: Self = Self { bits: 1 << 1 };
    /// While dragging, also draw the gizmo where the drag started.
    pub const PREV_TRANSFORM: Self = Self { bits: 1 << 2 };
    /// Everything.
    pub const DEFAULT: Self = Self {
        bits: Self::AXES_LABELS.bits | Self::SELECTED_AXES_ONLY.bits | Self::PREV_TRANSFORM.bits,
    };

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
}

impl std::ops::BitOr for DrawFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self::from_bits(self.bits | rhs.bits)
    }
}

impl std::ops::BitOrAssign for DrawFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.bits |= rhs.bits;
    }
}

impl Default for DrawFlags {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Colors of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisColors {
    /// Idle color.
    pub normal: LinearRgba,
    /// Hovered or dragged color.
    pub selected: LinearRgba,
}

impl AxisColors {
    const fn with_normal(normal: LinearRgba) -> Self {
        Self {
            normal,
            selected: LinearRgba::YELLOW,
        }
    }
}

/// Visual configuration of the gizmo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorViewConfig {
    /// Per-axis colors, X first.
    pub axes: [AxisColors; 3],
    /// Color of axes that are not part of a running drag.
    pub inactive_axis_color: LinearRgba,
    /// Fill of the hovered plane handle.
    pub select_plane_color: LinearRgba,
    /// Line width of idle axes.
    pub normal_axis_width: f32,
    /// Line width of hovered axes.
    pub select_axis_width: f32,
    /// Label distance from the origin, relative to the axis length.
    pub label_offset: f32,
}

impl Default for SelectorViewConfig {
    fn default() -> Self {
        Self {
            axes: [
                AxisColors::with_normal(LinearRgba::RED),
                AxisColors::with_normal(LinearRgba::GREEN),
                AxisColors::with_normal(LinearRgba::BLUE),
            ],
            inactive_axis_color: LinearRgba::rgb(0.75, 0.75, 0.75),
            select_plane_color: LinearRgba::YELLOW.with_alpha(0.5),
            normal_axis_width: 2.0,
            select_axis_width: 3.0,
            label_offset: 1.2,
        }
    }
}

const LABELS: [&str; 3] = ["X", "Y", "Z"];

/// Renders a [`SelectorModel`].
#[derive(Debug, Clone, Default)]
pub struct SelectorView {
    /// Colors and sizes.
    pub config: SelectorViewConfig,
}

impl SelectorView {
    /// Creates a view with the given configuration.
    pub fn new(config: SelectorViewConfig) -> Self {
        Self { config }
    }

    /// Draws the gizmo at the model's transform. Draws nothing for an empty selection
    /// or before the model has a view.
    pub fn draw<K: SelectionKey>(
        &self,
        renderer: &mut dyn PrimitiveRenderer,
        model: &SelectorModel<K>,
        flags: DrawFlags,
    ) -> Result<(), RenderError> {
        if !model.any_nodes_selected() {
            return Ok(());
        }
        self.draw_at(renderer, model, model.transform(), model.axes_state(), flags)
    }

    /// Draws the gizmo at an arbitrary transform with explicit axis states.
    pub fn draw_at<K: SelectionKey>(
        &self,
        renderer: &mut dyn PrimitiveRenderer,
        model: &SelectorModel<K>,
        transform: &Transform,
        axes: &[AxisState; 3],
        flags: DrawFlags,
    ) -> Result<(), RenderError> {
        let Some(camera) = model.camera() else {
            log::trace!("Selector has no view, skipping draw");
            return Ok(());
        };

        let only_locked = flags.contains(DrawFlags::SELECTED_AXES_ONLY) && model.is_active();
        let visible: [bool; 3] =
            std::array::from_fn(|i| axes[i].enabled && (!only_locked || axes[i].active));

        let matrix = transform.matrix();
        let at = |local: Vec3| matrix.transform_point3(local);
        let origin = at(Vec3::ZERO);

        renderer.begin_3d(&(camera.projection.matrix() * camera.view_matrix()))?;

        for i in (0..3).filter(|&i| visible[i]) {
            let color = self.axis_color(model, axes[i].selected, i, axes[i].visibility);
            renderer.draw_line(origin, at(Vec3::AXES[i]), color, self.axis_width(axes[i].selected))?;
        }

        let len = model.axes_plane_size();
        let plane = |a: usize, b: usize| {
            (
                at(Vec3::AXES[a] * len),
                at(Vec3::AXES[b] * len),
                at((Vec3::AXES[a] + Vec3::AXES[b]) * len),
            )
        };

        if model.are_axes_planes_enabled() {
            for a in 0..3 {
                let b = (a + 1) % 3;
                if !(visible[a] && visible[b]) {
                    continue;
                }
                let is_selected = axes[a].selected && axes[b].selected;
                let (half_a, half_b, corner) = plane(a, b);
                let width = self.axis_width(is_selected);
                let color_a = self.axis_color(model, is_selected, a, axes[a].visibility);
                let color_b = self.axis_color(model, is_selected, b, axes[b].visibility);
                renderer.draw_line(half_a, corner, color_a, width)?;
                renderer.draw_line(half_b, corner, color_b, width)?;
            }
        }

        if model.is_plane_selection() {
            for a in 0..3 {
                let b = (a + 1) % 3;
                if visible[a] && visible[b] && axes[a].selected && axes[b].selected {
                    let (half_a, half_b, corner) = plane(a, b);
                    renderer.draw_quad([origin, half_a, corner, half_b], self.config.select_plane_color)?;
                }
            }
        }

        renderer.end_3d()?;

        if flags.contains(DrawFlags::AXES_LABELS) {
            renderer.begin_2d()?;
            for i in (0..3).filter(|&i| visible[i]) {
                let Some(p) = camera.project_world(at(Vec3::AXES[i] * self.config.label_offset))
                else {
                    continue;
                };
                let color = self.axis_color(model, axes[i].selected, i, axes[i].visibility);
                renderer.draw_text(Vec2::new(p.x.floor(), p.y.floor()), LABELS[i], color)?;
            }
            renderer.end_2d()?;
        }
        Ok(())
    }

    fn axis_color<K: SelectionKey>(
        &self,
        model: &SelectorModel<K>,
        selected: bool,
        axis: usize,
        alpha: f32,
    ) -> LinearRgba {
        let color = if selected {
            self.config.axes[axis].selected
        } else if model.is_active() {
            self.config.inactive_axis_color
        } else {
            self.config.axes[axis].normal
        };
        color.with_alpha(alpha)
    }

    fn axis_width(&self, selected: bool) -> f32 {
        if selected {
            self.config.select_axis_width
        } else {
            self.config.normal_axis_width
        }
    }
}
