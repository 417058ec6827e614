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


//! Errors raised when a caller breaks an API precondition.

use std::fmt;

/// A programmer error detected at an API boundary.
///
/// These are never produced for benign input (removing something that is not there,
/// operating on an empty selection). They signal that a required collaborator is
/// missing or that an invariant the caller owns has been broken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractViolation {
    /// A required dependency was not supplied at construction.
    MissingDependency(&'static str),
    /// A selected object could not be resolved. Objects must be removed from every
    /// selection before they are destroyed.
    DanglingSelection(String),
    /// An argument was outside the range the operation accepts.
    InvalidArgument {
        /// The name of the offending argument.
        name: &'static str,
        /// What was wrong with it.
        reason: String,
    },
}

impl fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractViolation::MissingDependency(what) => {
                write!(f, "Required dependency '{what}' was not provided")
            }
            ContractViolation::DanglingSelection(key) => write!(
                f,
                "Selected object {key} no longer exists; remove it from the selection before destroying it"
            ),
            ContractViolation::InvalidArgument { name, reason } => {
                write!(f, "Invalid argument '{name}': {reason}")
            }
        }
    }
}

impl std::error::Error for ContractViolation {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contract_violation_display() {
        let err = ContractViolation::MissingDependency("renderer");
        assert_eq!(
            err.to_string(),
            "Required dependency 'renderer' was not provided"
        );

        let err = ContractViolation::InvalidArgument {
            name: "index",
            reason: "7 is out of range".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid argument 'index': 7 is out of range");
    }
}
