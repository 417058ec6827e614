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


//! Editor-side selection for ForkENGINE scenes.
//!
//! [`EntityStore`] owns the editor's entities and resolves [`EntityId`] handles for
//! the gizmo. [`EntitySelector`] wraps a `fork_selector::Selector` and adds what an
//! editor needs on top of it: click selection with modifiers, ray picking, a
//! clipboard, and destruction that keeps the selection free of dead handles.

pub mod entity;
pub mod entity_selector;
pub mod error;
pub mod picker;

pub use entity::{Entity, EntityId, EntityStore};
pub use entity_selector::{EntitySelector, EntitySelectorConfig, Modifiers};
pub use error::EditorError;
pub use picker::{BoundingSpherePicker, RayPicker};
