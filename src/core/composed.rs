//! Parallel composition of states under one name.

use super::node::{State, StateNode};
use crate::machine::MachineView;

/// A state that fans every lifecycle call out to its children in order.
pub struct ComposedState<C> {
    name: String,
    states: Vec<State<C>>,
}

impl<C> ComposedState<C> {
    pub fn new(name: impl Into<String>, states: Vec<State<C>>) -> Self {
        Self {
            name: name.into(),
            states,
        }
    }

    pub fn states(&self) -> &[State<C>] {
        &self.states
    }

    pub(crate) fn states_mut(&mut self) -> &mut [State<C>] {
        &mut self.states
    }
}

impl<C: 'static> StateNode<C> for ComposedState<C> {
    fn name(&self) -> &str {
        &self.name
    }

    fn enter(&mut self, context: &mut C) {
        for state in &mut self.states {
            state.enter(context);
        }
    }

    fn update(&mut self, context: &mut C) {
        for state in &mut self.states {
            state.update(context);
        }
    }

    fn exit(&mut self, context: &mut C) {
        for state in &mut self.states {
            state.exit(context);
        }
    }

    /// The first child that is (or wraps) a machine.
    fn as_state_machine(&self) -> Option<&dyn MachineView> {
        self.states.iter().find_map(|state| state.as_state_machine())
    }
}
