//! Statechart: a hierarchical state machine runtime
//!
//! Machines are trees of named states driven by an external loop. The
//! driver calls `enter` once, `update` once per tick and `exit` when done;
//! the machine resolves ordered, guarded transitions between ticks and
//! runs the lifecycle callbacks of whichever state is active.
//!
//! # Core Concepts
//!
//! - **State**: a leaf of callbacks, a parallel composition, a context
//!   adapter or a nested machine, all behind the `StateNode` contract
//! - **Transition**: a guarded `(source, target)` pair of state names; the
//!   first satisfied guard wins and chained hops settle within one tick
//! - **Bus**: every hop is published to observers as a `TransitionEvent`
//! - **Validation**: topology problems of a whole tree are accumulated
//!   with Stillwater's `Validation`
//!
//! # Example
//!
//! ```rust
//! use statechart::prelude::*;
//!
//! #[derive(Default)]
//! struct Door {
//!     open_requested: bool,
//!     opened: u32,
//! }
//!
//! let mut machine = MachineBuilder::new("Door")
//!     .state(StateBuilder::new("Closed").transition_to("Open", |d: &mut Door| d.open_requested))
//!     .state(
//!         StateBuilder::new("Open")
//!             .on_enter(|d: &mut Door| d.opened += 1)
//!             .transition_to("Closed", |d: &mut Door| !d.open_requested),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let hops = machine.bus().subscribe_channel();
//! let mut door = Door::default();
//!
//! machine.enter(&mut door);
//! door.open_requested = true;
//! machine.update(&mut door);
//!
//! assert_eq!(machine.active_id(), Some("Open"));
//! assert_eq!(door.opened, 1);
//! assert_eq!(hops.drain_pairs(), vec![("Closed".to_string(), "Open".to_string())]);
//! ```

pub mod builder;
pub mod core;
pub mod events;
pub mod graph;
pub mod machine;
pub mod validation;

/// Commonly used types.
pub mod prelude {
    pub use crate::builder::{BuildError, MachineBuilder, StateBuilder};
    pub use crate::core::{
        ComposedState, Condition, LeafState, MappedState, State, StateKind, StateNode, Transition,
        TransitionCondition,
    };
    pub use crate::events::{TransitionBus, TransitionEvent};
    pub use crate::graph::MachineGraph;
    pub use crate::machine::{FaultPolicy, MachineError, MachineView, StateMachine, StepResult};
}

pub use crate::core::{State, StateNode, Transition};
pub use crate::machine::StateMachine;
