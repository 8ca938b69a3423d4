//! Topology violations found by static checks.

use thiserror::Error;

/// A structural problem in a machine definition.
///
/// Every variant names the machine it was found in, so violations collected
/// from a whole tree stay attributable.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TopologyViolation {
    #[error("Entry state '{entry}' is not registered in machine '{machine}'")]
    MissingEntryState { machine: String, entry: String },

    #[error("Transition '{from}-{to}' in machine '{machine}' targets an unknown state")]
    UnknownTarget {
        machine: String,
        from: String,
        to: String,
    },

    #[error("Transitions in machine '{machine}' leave unknown state '{from}'")]
    UnknownSource { machine: String, from: String },

    #[error("Machine '{machine}' contains a state with an empty name")]
    EmptyStateName { machine: String },
}

impl TopologyViolation {
    /// Name of the machine the violation was found in.
    pub fn machine(&self) -> &str {
        match self {
            Self::MissingEntryState { machine, .. }
            | Self::UnknownTarget { machine, .. }
            | Self::UnknownSource { machine, .. }
            | Self::EmptyStateName { machine } => machine,
        }
    }
}
