//! Runtime faults raised while driving a machine.

use thiserror::Error;

/// Configuration faults detected while entering or updating a machine.
///
/// All of them leave the active state unchanged for the faulting call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MachineError {
    #[error("Missing entry state '{entry}' in machine '{machine}'")]
    MissingEntryState { machine: String, entry: String },

    #[error("Missing state '{state}' in machine '{machine}'")]
    MissingState { machine: String, state: String },

    #[error("Infinite transition loop detected at '{state}' in machine '{machine}'")]
    TransitionLoop { machine: String, state: String },
}
