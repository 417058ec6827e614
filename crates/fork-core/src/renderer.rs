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


//! The immediate-mode drawing sink used to render gizmos and debug overlays.
//!
//! The engine core never talks to a GPU. Whatever owns the window implements
//! [`PrimitiveRenderer`] and receives lines, quads, and text in world or screen space.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::math::{Mat4, Vec2, Vec3};

/// Represents a color in a linear RGBA color space using `f32` components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearRgba {
    /// The red component in linear space.
    pub r: f32,
    /// The green component in linear space.
    pub g: f32,
    /// The blue component in linear space.
    pub b: f32,
    /// The alpha (opacity) component.
    pub a: f32,
}

impl LinearRgba {
    /// Opaque red.
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    /// Opaque green.
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
    /// Opaque blue.
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);
    /// Opaque yellow.
    pub const YELLOW: Self = Self::rgb(1.0, 1.0, 0.0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    /// Creates a color with explicit RGBA values.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color.
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Returns the same color with a different alpha.
    #[inline]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }
}

/// An error reported by a [`PrimitiveRenderer`] backend.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// A draw call was issued outside a matching `begin`/`end` pair.
    InvalidState(String),
    /// The backend failed to record or submit a primitive.
    BackendFailure(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::InvalidState(msg) => write!(f, "Invalid draw state: {msg}"),
            RenderError::BackendFailure(msg) => write!(f, "Renderer backend failed: {msg}"),
        }
    }
}

impl std::error::Error for RenderError {}

/// An immediate-mode drawing surface for lines, quads, and text.
///
/// 3D primitives are issued between `begin_3d` and `end_3d` in world space; text is
/// issued between `begin_2d` and `end_2d` in pixel coordinates.
pub trait PrimitiveRenderer {
    /// Starts a batch of world-space primitives seen through `view_projection`.
    fn begin_3d(&mut self, view_projection: &Mat4) -> Result<(), RenderError>;

    /// Draws a world-space line.
    fn draw_line(
        &mut self,
        start: Vec3,
        end: Vec3,
        color: LinearRgba,
        width: f32,
    ) -> Result<(), RenderError>;

    /// Draws a filled world-space quad given its corners in winding order.
    fn draw_quad(&mut self, corners: [Vec3; 4], color: LinearRgba) -> Result<(), RenderError>;

    /// Ends the current 3D batch.
    fn end_3d(&mut self) -> Result<(), RenderError>;

    /// Starts a batch of screen-space primitives.
    fn begin_2d(&mut self) -> Result<(), RenderError>;

    /// Draws text with its top-left corner at `position` (pixels).
    fn draw_text(&mut self, position: Vec2, text: &str, color: LinearRgba)
        -> Result<(), RenderError>;

    /// Ends the current 2D batch.
    fn end_2d(&mut self) -> Result<(), RenderError>;
}

/// A primitive captured by a [`RecordingRenderer`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// `begin_3d` was called.
    Begin3d,
    /// A world-space line.
    Line {
        /// Start point.
        start: Vec3,
        /// End point.
        end: Vec3,
        /// Line color.
        color: LinearRgba,
        /// Line width in pixels.
        width: f32,
    },
    /// A world-space quad.
    Quad {
        /// Corner points.
        corners: [Vec3; 4],
        /// Fill color.
        color: LinearRgba,
    },
    /// `end_3d` was called.
    End3d,
    /// `begin_2d` was called.
    Begin2d,
    /// A text label.
    Text {
        /// Top-left position in pixels.
        position: Vec2,
        /// The label.
        text: String,
        /// Text color.
        color: LinearRgba,
    },
    /// `end_2d` was called.
    End2d,
}

/// A renderer that records every primitive instead of drawing it.
///
/// Clones share the same command list, so a handle can be kept after the renderer
/// itself has been moved into its owner.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    commands: Rc<RefCell<Vec<DrawCommand>>>,
}

impl RecordingRenderer {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything recorded so far.
    pub fn commands(&self) -> Vec<DrawCommand> {
        self.commands.borrow().clone()
    }

    /// Forgets all recorded commands.
    pub fn clear(&self) {
        self.commands.borrow_mut().clear();
    }

    fn push(&self, command: DrawCommand) -> Result<(), RenderError> {
        self.commands.borrow_mut().push(command);
        Ok(())
    }
}

impl PrimitiveRenderer for RecordingRenderer {
    fn begin_3d(&mut self, _view_projection: &Mat4) -> Result<(), RenderError> {
        self.push(DrawCommand::Begin3d)
    }

    fn draw_line(
        &mut self,
        start: Vec3,
        end: Vec3,
        color: LinearRgba,
        width: f32,
    ) -> Result<(), RenderError> {
        self.push(DrawCommand::Line {
            start,
            end,
            color,
            width,
        })
    }

    fn draw_quad(&mut self, corners: [Vec3; 4], color: LinearRgba) -> Result<(), RenderError> {
        self.push(DrawCommand::Quad { corners, color })
    }

    fn end_3d(&mut self) -> Result<(), RenderError> {
        self.push(DrawCommand::End3d)
    }

    fn begin_2d(&mut self) -> Result<(), RenderError> {
        self.push(DrawCommand::Begin2d)
    }

    fn draw_text(
        &mut self,
        position: Vec2,
        text: &str,
        color: LinearRgba,
    ) -> Result<(), RenderError> {
        self.push(DrawCommand::Text {
            position,
            text: text.to_owned(),
            color,
        })
    }

    fn end_2d(&mut self) -> Result<(), RenderError> {
        self.push(DrawCommand::End2d)
    }
}
