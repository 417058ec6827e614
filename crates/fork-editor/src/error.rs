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


use fork_core::ContractViolation;
use fork_selector::{SelectorError, SettingsError};
use thiserror::Error;

use crate::entity::EntityId;

/// Errors raised by editor-side selection operations.
#[derive(Debug, Error)]
pub enum EditorError {
    /// The gizmo failed to draw or to resolve its selection.
    #[error(transparent)]
    Selector(#[from] SelectorError),
    /// An API contract was broken.
    #[error(transparent)]
    Contract(#[from] ContractViolation),
    /// Selector settings could not be loaded.
    #[error(transparent)]
    Settings(#[from] SettingsError),
    /// The handle does not refer to a live entity.
    #[error("Unknown entity {0}")]
    UnknownEntity(EntityId),
}
