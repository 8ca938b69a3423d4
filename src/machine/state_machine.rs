//! State machine evaluation: lifecycle and transition resolution.

use std::collections::{HashMap, HashSet};
use std::fmt;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use tracing::{debug, error, trace};

use super::error::MachineError;
use super::view::MachineView;
use super::FaultPolicy;
use crate::core::{State, StateCollection, StateNode, Transition};
use crate::events::{TransitionBus, TransitionEvent};
use crate::graph::{self, MachineGraph};
use crate::validation::{self, TopologyViolation};

/// Outcome of a single [`StateMachine::try_update`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepResult {
    /// The machine has not been entered; nothing ran
    Idle,

    /// No transition fired; the active state was updated
    Stayed,

    /// The machine moved after `hops` chained transitions and updated the
    /// new active state
    Transitioned {
        from: String,
        to: String,
        hops: usize,
    },
}

/// A named set of states with ordered, guarded transitions between them.
///
/// Topology is fixed at construction apart from [`set_state`](Self::set_state).
/// The active state is `None` until `enter` and again after `exit`.
///
/// # Example
///
/// ```rust
/// use statechart::core::{State, StateNode, Transition};
/// use statechart::machine::StateMachine;
///
/// let mut machine = StateMachine::new(
///     "Light",
///     [State::leaf("Off"), State::leaf("On")],
///     [
///         Transition::new("Off", "On", |pressed: &mut bool| std::mem::take(pressed)),
///         Transition::new("On", "Off", |pressed: &mut bool| std::mem::take(pressed)),
///     ],
///     "Off",
/// );
///
/// let mut pressed = false;
/// machine.enter(&mut pressed);
/// machine.update(&mut pressed);
/// assert_eq!(machine.active_id(), Some("Off"));
///
/// pressed = true;
/// machine.update(&mut pressed);
/// assert_eq!(machine.active_id(), Some("On"));
/// assert!(!pressed);
///
/// machine.update(&mut pressed);
/// assert_eq!(machine.active_id(), Some("On"));
///
/// pressed = true;
/// machine.update(&mut pressed);
/// assert_eq!(machine.active_id(), Some("Off"));
/// ```
pub struct StateMachine<C> {
    name: String,
    states: StateCollection<C>,
    transitions: HashMap<String, Vec<Transition<C>>>,
    entry_id: String,
    active: Option<usize>,
    bus: TransitionBus,
    fault_policy: FaultPolicy,
}

impl<C: 'static> StateMachine<C> {
    /// Create a machine from a flat transition list.
    ///
    /// Transitions are grouped by source; declaration order within a source
    /// is kept and decides priority.
    pub fn new(
        name: impl Into<String>,
        states: impl IntoIterator<Item = State<C>>,
        transitions: impl IntoIterator<Item = Transition<C>>,
        entry_id: impl Into<String>,
    ) -> Self {
        let mut grouped: HashMap<String, Vec<Transition<C>>> = HashMap::new();
        for transition in transitions {
            grouped
                .entry(transition.source_id().to_string())
                .or_default()
                .push(transition);
        }
        Self::with_transition_map(name, states, grouped, entry_id)
    }

    /// Create a machine from transitions already keyed by source name.
    ///
    /// The map key is the source used during resolution.
    pub fn with_transition_map(
        name: impl Into<String>,
        states: impl IntoIterator<Item = State<C>>,
        transitions: HashMap<String, Vec<Transition<C>>>,
        entry_id: impl Into<String>,
    ) -> Self {
        let mut machine = Self {
            name: name.into(),
            states: StateCollection::new(states),
            transitions,
            entry_id: entry_id.into(),
            active: None,
            bus: TransitionBus::new(),
            fault_policy: FaultPolicy::default(),
        };
        let bus = machine.bus.clone();
        machine.attach_bus(&bus);
        machine
    }

    /// Publish this machine's hops, and those of every nested machine, on `bus`.
    pub fn with_bus(mut self, bus: TransitionBus) -> Self {
        self.attach_bus(&bus);
        self
    }

    pub fn attach_bus(&mut self, bus: &TransitionBus) {
        self.bus = bus.clone();
        for state in self.states.iter_mut() {
            state.attach_bus(bus);
        }
    }

    /// Set the fault policy of this machine and every nested machine.
    pub fn with_fault_policy(mut self, policy: FaultPolicy) -> Self {
        self.apply_fault_policy(policy);
        self
    }

    pub(crate) fn apply_fault_policy(&mut self, policy: FaultPolicy) {
        self.fault_policy = policy;
        for state in self.states.iter_mut() {
            state.apply_fault_policy(policy);
        }
    }

    /// Append a transition after those already declared for its source.
    pub fn add_transition(&mut self, transition: Transition<C>) {
        self.transitions
            .entry(transition.source_id().to_string())
            .or_default()
            .push(transition);
    }

    /// Replace the state with the same name in place, or append it.
    ///
    /// A replaced active state stays active without lifecycle calls.
    pub fn set_state(&mut self, state: State<C>) -> Option<State<C>> {
        let mut state = state;
        state.attach_bus(&self.bus);
        state.apply_fault_policy(self.fault_policy);
        self.states.set(state)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn states(&self) -> &StateCollection<C> {
        &self.states
    }

    pub fn transitions(&self) -> &HashMap<String, Vec<Transition<C>>> {
        &self.transitions
    }

    /// Transitions leaving `source`, in priority order.
    pub fn transitions_from(&self, source: &str) -> &[Transition<C>] {
        self.transitions
            .get(source)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn entry_id(&self) -> &str {
        &self.entry_id
    }

    pub fn active_state(&self) -> Option<&State<C>> {
        self.active.map(|index| &self.states[index])
    }

    pub fn active_state_mut(&mut self) -> Option<&mut State<C>> {
        match self.active {
            Some(index) => Some(&mut self.states[index]),
            None => None,
        }
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_state().map(|state| state.name())
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn bus(&self) -> &TransitionBus {
        &self.bus
    }

    pub fn fault_policy(&self) -> FaultPolicy {
        self.fault_policy
    }

    /// Known states in insertion order, then unknown sources sorted by name.
    pub(crate) fn ordered_sources(&self) -> Vec<&str> {
        let mut sources = self.states.names();
        let mut unknown: Vec<&str> = self
            .transitions
            .keys()
            .map(String::as_str)
            .filter(|source| !self.states.contains(source))
            .collect();
        unknown.sort_unstable();
        sources.extend(unknown);
        sources
    }

    /// Every declared `(source, target)` pair in a stable order.
    pub fn edges(&self) -> Vec<(&str, &str)> {
        self.ordered_sources()
            .into_iter()
            .flat_map(|source| {
                self.transitions_from(source)
                    .iter()
                    .map(move |transition| (source, transition.target_id()))
            })
            .collect()
    }

    /// Serializable snapshot of the machine tree.
    pub fn graph(&self) -> MachineGraph {
        graph::snapshot(self)
    }

    /// Check the whole tree, accumulating every topology problem.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<TopologyViolation>> {
        validation::rules::check_machine(self)
    }

    /// Every topology problem in this machine and its nested machines.
    pub fn violations(&self) -> Vec<TopologyViolation> {
        validation::into_result(self.validate()).err().unwrap_or_default()
    }

    /// Activate and enter the entry state.
    pub fn try_enter(&mut self, context: &mut C) -> Result<(), MachineError> {
        let index = self.states.position(&self.entry_id).ok_or_else(|| {
            MachineError::MissingEntryState {
                machine: self.name.clone(),
                entry: self.entry_id.clone(),
            }
        })?;

        trace!(machine = %self.name, state = %self.entry_id, "entering state machine");
        self.active = Some(index);
        self.states[index].enter(context);
        Ok(())
    }

    /// Resolve transitions, switch state if needed, then update the active state.
    ///
    /// On error nothing is switched and no state is updated.
    pub fn try_update(&mut self, context: &mut C) -> Result<StepResult, MachineError> {
        let Some(active) = self.active else {
            return Ok(StepResult::Idle);
        };

        let step = match self.resolve(active, context)? {
            None => StepResult::Stayed,
            Some((target, hops)) => {
                let next = self.states.position(&target).ok_or_else(|| {
                    MachineError::MissingState {
                        machine: self.name.clone(),
                        state: target.clone(),
                    }
                })?;
                let from = self.states[active].name().to_string();

                trace!(machine = %self.name, from = %from, to = %target, hops, "switching active state");
                self.states[active].exit(context);
                self.active = Some(next);
                self.states[next].enter(context);

                StepResult::Transitioned {
                    from,
                    to: target,
                    hops,
                }
            }
        };

        if let Some(index) = self.active {
            self.states[index].update(context);
        }
        Ok(step)
    }

    /// Follow satisfied guards from the active state.
    ///
    /// Returns the landing state and the number of hops, or `None` when no
    /// transition fired. Each hop is published before the next is evaluated.
    fn resolve(
        &self,
        active: usize,
        context: &mut C,
    ) -> Result<Option<(String, usize)>, MachineError> {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut current: &str = self.states[active].name();

        loop {
            let transitions = self.transitions_from(current);
            if transitions.is_empty() {
                debug!(machine = %self.name, state = %current, "no outgoing transitions");
                return Ok(landing(current, &visited));
            }

            let Some(taken) = transitions
                .iter()
                .find(|transition| transition.evaluate(context))
            else {
                debug!(machine = %self.name, state = %current, "no transition condition satisfied");
                return Ok(landing(current, &visited));
            };

            visited.insert(current);
            let target = taken.target_id();
            if visited.contains(target) {
                return Err(MachineError::TransitionLoop {
                    machine: self.name.clone(),
                    state: target.to_string(),
                });
            }

            trace!(machine = %self.name, from = %current, to = %target, "transition taken");
            self.bus
                .publish(TransitionEvent::new(self.name.as_str(), current, target));
            current = target;
        }
    }

    fn report(&self, fault: &MachineError) {
        error!(machine = %self.name, error = %fault, "state machine fault");
        if cfg!(debug_assertions) && self.fault_policy == FaultPolicy::DebugAssert {
            panic!("{fault}");
        }
    }
}

fn landing(current: &str, visited: &HashSet<&str>) -> Option<(String, usize)> {
    if visited.is_empty() {
        None
    } else {
        Some((current.to_string(), visited.len()))
    }
}

impl<C: 'static> StateNode<C> for StateMachine<C> {
    fn name(&self) -> &str {
        &self.name
    }

    fn enter(&mut self, context: &mut C) {
        if let Err(fault) = self.try_enter(context) {
            self.report(&fault);
        }
    }

    fn update(&mut self, context: &mut C) {
        if let Err(fault) = self.try_update(context) {
            self.report(&fault);
        }
    }

    fn exit(&mut self, context: &mut C) {
        if let Some(index) = self.active.take() {
            trace!(machine = %self.name, state = %self.states[index].name(), "exiting state machine");
            self.states[index].exit(context);
        }
    }

    fn as_state_machine(&self) -> Option<&dyn MachineView> {
        Some(self)
    }
}

impl<C: 'static> MachineView for StateMachine<C> {
    fn name(&self) -> &str {
        &self.name
    }

    fn entry_id(&self) -> &str {
        &self.entry_id
    }

    fn active_id(&self) -> Option<&str> {
        StateMachine::active_id(self)
    }

    fn state_names(&self) -> Vec<&str> {
        self.states.names()
    }

    fn edges(&self) -> Vec<(&str, &str)> {
        StateMachine::edges(self)
    }

    fn submachine(&self, name: &str) -> Option<&dyn MachineView> {
        self.states.get(name)?.as_state_machine()
    }

    fn graph(&self) -> MachineGraph {
        StateMachine::graph(self)
    }
}

impl<C: 'static> fmt::Debug for StateMachine<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("name", &self.name)
            .field("states", &self.states.names())
            .field("entry_id", &self.entry_id)
            .field("active", &self.active_id())
            .finish()
    }
}
