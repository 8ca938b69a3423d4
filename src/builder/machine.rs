//! Builder for constructing state machines.

use tracing::debug;

use crate::builder::error::BuildError;
use crate::builder::state::StateBuilder;
use crate::core::DEFAULT_STATE_NAME;
use crate::events::TransitionBus;
use crate::machine::{FaultPolicy, StateMachine};
use crate::validation;

/// Builder for a root state machine with a fluent API.
///
/// # Example
///
/// ```rust
/// use statechart::builder::{MachineBuilder, StateBuilder};
/// use statechart::core::StateNode;
///
/// let mut machine = MachineBuilder::new("Player")
///     .state(StateBuilder::new("Idle").transition_to("Moving", |speed: &mut u32| *speed > 0))
///     .state(
///         StateBuilder::new("Moving")
///             .children(["Walking", "Running"])
///             .transition_to("Idle", |speed: &mut u32| *speed == 0),
///     )
///     .build()
///     .unwrap();
///
/// let mut speed = 0;
/// machine.enter(&mut speed);
/// speed = 3;
/// machine.update(&mut speed);
///
/// assert_eq!(machine.active_id(), Some("Moving"));
/// ```
pub struct MachineBuilder<C> {
    name: String,
    states: Vec<StateBuilder<C>>,
    entry: Option<String>,
    bus: Option<TransitionBus>,
    fault_policy: FaultPolicy,
}

impl<C: 'static> MachineBuilder<C> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            states: Vec::new(),
            entry: None,
            bus: None,
            fault_policy: FaultPolicy::default(),
        }
    }

    pub fn state(mut self, state: impl Into<StateBuilder<C>>) -> Self {
        self.states.push(state.into());
        self
    }

    pub fn states<I, B>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<StateBuilder<C>>,
    {
        self.states.extend(states.into_iter().map(Into::into));
        self
    }

    /// Set the entry state. Defaults to the first declared state.
    pub fn entry(mut self, entry: impl Into<String>) -> Self {
        self.entry = Some(entry.into());
        self
    }

    /// Publish hops of the whole tree on `bus`.
    pub fn bus(mut self, bus: TransitionBus) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn fault_policy(mut self, policy: FaultPolicy) -> Self {
        self.fault_policy = policy;
        self
    }

    /// Build and validate the machine tree.
    /// Returns an error listing every topology violation found.
    pub fn build(self) -> Result<StateMachine<C>, BuildError> {
        let machine = self.build_unchecked();
        match validation::into_result(machine.validate()) {
            Ok(()) => Ok(machine),
            Err(violations) => {
                debug!(machine = %machine.name(), count = violations.len(), "machine failed validation");
                Err(BuildError::InvalidTopology {
                    machine: machine.name().to_string(),
                    violations,
                })
            }
        }
    }

    /// Build without validating. Faults surface at run time instead.
    pub fn build_unchecked(self) -> StateMachine<C> {
        let entry = self
            .entry
            .or_else(|| self.states.first().map(|state| state.name().to_string()))
            .unwrap_or_else(|| DEFAULT_STATE_NAME.to_string());

        let mut states = Vec::with_capacity(self.states.len());
        let mut transitions = Vec::new();
        for builder in self.states {
            let (state, outgoing) = builder.into_parts();
            states.push(state);
            transitions.extend(outgoing);
        }

        let mut machine =
            StateMachine::new(self.name, states, transitions, entry).with_fault_policy(self.fault_policy);
        if let Some(bus) = self.bus {
            machine.attach_bus(&bus);
        }
        machine
    }
}

impl<C: 'static> StateMachine<C> {
    /// Start a [`MachineBuilder`] for a machine called `name`.
    pub fn builder(name: impl Into<String>) -> MachineBuilder<C> {
        MachineBuilder::new(name)
    }
}
