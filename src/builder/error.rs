//! Build errors for the machine builder.

use thiserror::Error;

use crate::validation::TopologyViolation;

/// Errors that can occur when building a state machine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Machine '{machine}' failed validation with {} violation(s). Fix them or call .build_unchecked()", .violations.len())]
    InvalidTopology {
        machine: String,
        violations: Vec<TopologyViolation>,
    },
}

impl BuildError {
    /// Every violation behind the error.
    pub fn violations(&self) -> &[TopologyViolation] {
        match self {
            Self::InvalidTopology { violations, .. } => violations,
        }
    }
}
