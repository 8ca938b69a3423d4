//! The hierarchical state machine evaluator.
//!
//! A [`StateMachine`] owns its states and an ordered transition list per
//! source state. Driving it follows a fixed lifecycle:
//!
//! - `enter` activates the entry state
//! - `update` resolves chained transitions (first satisfied guard wins at
//!   every hop), swaps the active state if needed and updates it once
//! - `exit` exits the active state and deactivates the machine
//!
//! Machines are themselves state nodes, so they nest.

mod error;
mod state_machine;
mod view;

pub use error::MachineError;
pub use state_machine::{StateMachine, StepResult};
pub use view::MachineView;

/// What a machine does after logging a configuration fault.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FaultPolicy {
    /// Log, then panic in debug builds.
    #[default]
    DebugAssert,

    /// Log only.
    Log,
}
