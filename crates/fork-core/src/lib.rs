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


//! Foundational types shared by the scene graph, the selector, and the editor.
//!
//! `fork-core` deliberately has no knowledge of scene nodes or selections. It provides
//! the math library, the [`Transform`](transform::Transform) value type, camera
//! projection helpers, the [`PrimitiveRenderer`](renderer::PrimitiveRenderer) drawing
//! sink, and the error types raised at contract boundaries.

#![warn(missing_docs)]

pub mod camera;
pub mod error;
pub mod math;
pub mod renderer;
pub mod transform;

pub use camera::{Camera, Projection, ProjectionKind, Viewport};
pub use error::ContractViolation;
pub use renderer::{DrawCommand, LinearRgba, PrimitiveRenderer, RecordingRenderer, RenderError};
pub use transform::Transform;
