//! The state node contract and the closed set of node kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use stillwater::validation::Validation;

use super::composed::ComposedState;
use super::leaf::LeafState;
use super::mapped::MappedState;
use crate::events::TransitionBus;
use crate::machine::{FaultPolicy, MachineView, StateMachine};
use crate::validation::{rules, TopologyValidation};

/// A named unit of enter/update/exit behavior.
///
/// All lifecycle methods default to no-ops. The `*_owned` variants take the
/// context by value, run the call against a local copy and discard it.
pub trait StateNode<C> {
    /// The node's name, which is also its identity within a machine.
    fn name(&self) -> &str;

    fn id(&self) -> &str {
        self.name()
    }

    fn enter(&mut self, _context: &mut C) {}

    fn update(&mut self, _context: &mut C) {}

    fn exit(&mut self, _context: &mut C) {}

    /// The nested machine behind this node, if any.
    fn as_state_machine(&self) -> Option<&dyn MachineView> {
        None
    }

    fn enter_owned(&mut self, context: C) {
        let mut context = context;
        self.enter(&mut context);
    }

    fn update_owned(&mut self, context: C) {
        let mut context = context;
        self.update(&mut context);
    }

    fn exit_owned(&mut self, context: C) {
        let mut context = context;
        self.exit(&mut context);
    }
}

/// Discriminant of [`State`], exposed to read-only consumers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateKind {
    Leaf,
    Composed,
    Mapped,
    Machine,
}

/// A state node: leaf, parallel composition, context adapter or nested machine.
pub enum State<C> {
    Leaf(LeafState<C>),
    Composed(ComposedState<C>),
    Mapped(MappedState<C>),
    Machine(Box<StateMachine<C>>),
}

impl<C: 'static> State<C> {
    /// A leaf with no callbacks.
    pub fn leaf(name: impl Into<String>) -> Self {
        State::Leaf(LeafState::new(name))
    }

    pub fn kind(&self) -> StateKind {
        match self {
            State::Leaf(_) => StateKind::Leaf,
            State::Composed(_) => StateKind::Composed,
            State::Mapped(_) => StateKind::Mapped,
            State::Machine(_) => StateKind::Machine,
        }
    }

    /// Typed access to a directly nested machine.
    pub fn as_machine(&self) -> Option<&StateMachine<C>> {
        match self {
            State::Machine(machine) => Some(&**machine),
            _ => None,
        }
    }

    pub fn as_machine_mut(&mut self) -> Option<&mut StateMachine<C>> {
        match self {
            State::Machine(machine) => Some(&mut **machine),
            _ => None,
        }
    }

    /// Compose this state with `others` into a parallel state named after `self`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use statechart::core::{State, StateKind, StateNode};
    ///
    /// let joined: State<()> = State::leaf("Main").join([State::leaf("Audio")]);
    /// assert_eq!(joined.name(), "Main");
    /// assert_eq!(joined.kind(), StateKind::Composed);
    /// ```
    pub fn join(self, others: impl IntoIterator<Item = State<C>>) -> State<C> {
        let name = self.name().to_string();
        let mut states = vec![self];
        states.extend(others);
        State::Composed(ComposedState::new(name, states))
    }

    /// Adapt this state to a context of type `S` through a one-way transform.
    pub fn map_context<S: 'static>(
        self,
        transform: impl Fn(&S) -> C + Send + Sync + 'static,
    ) -> State<S> {
        State::Mapped(MappedState::new(transform, self))
    }

    /// Share `bus` with every machine nested in this node.
    pub(crate) fn attach_bus(&mut self, bus: &TransitionBus) {
        match self {
            State::Leaf(_) => {}
            State::Composed(composed) => composed
                .states_mut()
                .iter_mut()
                .for_each(|state| state.attach_bus(bus)),
            State::Mapped(mapped) => mapped.attach_bus(bus),
            State::Machine(machine) => machine.attach_bus(bus),
        }
    }

    pub(crate) fn apply_fault_policy(&mut self, policy: FaultPolicy) {
        match self {
            State::Leaf(_) => {}
            State::Composed(composed) => composed
                .states_mut()
                .iter_mut()
                .for_each(|state| state.apply_fault_policy(policy)),
            State::Mapped(mapped) => mapped.apply_fault_policy(policy),
            State::Machine(machine) => machine.apply_fault_policy(policy),
        }
    }

    pub(crate) fn validate(&self) -> TopologyValidation {
        match self {
            State::Leaf(_) => Validation::success(()),
            State::Composed(composed) => {
                rules::all(composed.states().iter().map(State::validate).collect())
            }
            State::Mapped(mapped) => mapped.validate(),
            State::Machine(machine) => machine.validate(),
        }
    }
}

impl<C: 'static> StateNode<C> for State<C> {
    fn name(&self) -> &str {
        match self {
            State::Leaf(leaf) => leaf.name(),
            State::Composed(composed) => composed.name(),
            State::Mapped(mapped) => mapped.name(),
            State::Machine(machine) => StateNode::name(&**machine),
        }
    }

    fn enter(&mut self, context: &mut C) {
        match self {
            State::Leaf(leaf) => leaf.enter(context),
            State::Composed(composed) => composed.enter(context),
            State::Mapped(mapped) => mapped.enter(context),
            State::Machine(machine) => machine.enter(context),
        }
    }

    fn update(&mut self, context: &mut C) {
        match self {
            State::Leaf(leaf) => leaf.update(context),
            State::Composed(composed) => composed.update(context),
            State::Mapped(mapped) => mapped.update(context),
            State::Machine(machine) => machine.update(context),
        }
    }

    fn exit(&mut self, context: &mut C) {
        match self {
            State::Leaf(leaf) => leaf.exit(context),
            State::Composed(composed) => composed.exit(context),
            State::Mapped(mapped) => mapped.exit(context),
            State::Machine(machine) => machine.exit(context),
        }
    }

    fn as_state_machine(&self) -> Option<&dyn MachineView> {
        match self {
            State::Leaf(_) => None,
            State::Composed(composed) => composed.as_state_machine(),
            State::Mapped(mapped) => mapped.as_state_machine(),
            State::Machine(machine) => Some(&**machine),
        }
    }
}

impl<C> From<LeafState<C>> for State<C> {
    fn from(leaf: LeafState<C>) -> Self {
        State::Leaf(leaf)
    }
}

impl<C> From<ComposedState<C>> for State<C> {
    fn from(composed: ComposedState<C>) -> Self {
        State::Composed(composed)
    }
}

impl<C> From<MappedState<C>> for State<C> {
    fn from(mapped: MappedState<C>) -> Self {
        State::Mapped(mapped)
    }
}

impl<C> From<StateMachine<C>> for State<C> {
    fn from(machine: StateMachine<C>) -> Self {
        State::Machine(Box::new(machine))
    }
}

impl<C: 'static> fmt::Debug for State<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("name", &self.name())
            .field("kind", &self.kind())
            .finish()
    }
}
