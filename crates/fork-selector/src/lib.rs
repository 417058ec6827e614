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


//! An interactive transform gizmo for 3D editors.
//!
//! The crate is split along model/view/controller lines:
//! - [`SelectorModel`] owns the selection set, the gizmo transform, hit testing and the
//!   drag state machine.
//! - [`SelectorView`] draws the model through a [`PrimitiveRenderer`](fork_core::PrimitiveRenderer).
//! - [`Selector`] turns pointer samples into translations, rotations and scales, and
//!   [`MouseEventHandler`] routes raw mouse events into it.
//!
//! Selected objects are referenced by key. They implement [`Selectable`] and are
//! looked up through a [`SelectionHost`], usually the container that owns them.

pub mod input;
pub mod model;
pub mod raster;
pub mod selectable;
pub mod selector;
pub mod settings;
pub mod view;

#[cfg(test)]
mod test_util;

pub use input::{MouseButton, MouseEventHandler};
pub use model::{
    AxisState, OrientationAlignment, PivotAlignment, SelectionListener, SelectionState,
    SelectorModel, TransformMode,
};
pub use raster::{Raster, RasterMode, RASTER_PRESETS};
pub use selectable::{transform_selectable, Selectable, SelectionHost, SelectionKey, TransformFlags};
pub use selector::{Selector, SelectorBuilder, SelectorError};
pub use settings::{SelectorSettings, SettingsError};
pub use view::{AxisColors, DrawFlags, SelectorView, SelectorViewConfig};
