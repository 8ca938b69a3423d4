//! One-way context adapters.
//!
//! A mapped state lets a subtree written against context `T` live inside a
//! machine over context `S`. Each lifecycle call derives a fresh `T` from
//! the source context, hands it to the target and drops it afterwards.
//! Nothing is written back to the source.

use std::sync::Arc;

use super::node::{State, StateNode};
use crate::events::TransitionBus;
use crate::machine::{FaultPolicy, MachineView};
use crate::validation::TopologyValidation;

/// Shared derivation function from a source context to a target context.
pub type ContextTransform<S, T> = Arc<dyn Fn(&S) -> T + Send + Sync>;

/// Object-safe face of a target state whose context type has been erased.
trait MappedTarget<S>: Send {
    fn name(&self) -> &str;
    fn enter(&mut self, context: &S);
    fn update(&mut self, context: &S);
    fn exit(&mut self, context: &S);
    fn as_state_machine(&self) -> Option<&dyn MachineView>;
    fn attach_bus(&mut self, bus: &TransitionBus);
    fn apply_fault_policy(&mut self, policy: FaultPolicy);
    fn validate(&self) -> TopologyValidation;
}

struct ContextMap<S, T> {
    transform: ContextTransform<S, T>,
    target: State<T>,
}

impl<S: 'static, T: 'static> MappedTarget<S> for ContextMap<S, T> {
    fn name(&self) -> &str {
        self.target.name()
    }

    fn enter(&mut self, context: &S) {
        let mut derived = (self.transform)(context);
        self.target.enter(&mut derived);
    }

    fn update(&mut self, context: &S) {
        let mut derived = (self.transform)(context);
        self.target.update(&mut derived);
    }

    fn exit(&mut self, context: &S) {
        let mut derived = (self.transform)(context);
        self.target.exit(&mut derived);
    }

    fn as_state_machine(&self) -> Option<&dyn MachineView> {
        self.target.as_state_machine()
    }

    fn attach_bus(&mut self, bus: &TransitionBus) {
        self.target.attach_bus(bus);
    }

    fn apply_fault_policy(&mut self, policy: FaultPolicy) {
        self.target.apply_fault_policy(policy);
    }

    fn validate(&self) -> TopologyValidation {
        self.target.validate()
    }
}

/// A state over context `S` delegating to a target state over another context.
///
/// The name is the target's name.
///
/// # Example
///
/// ```rust
/// use statechart::core::{LeafState, MappedState, State, StateNode};
///
/// #[derive(Clone)]
/// struct Game { score: u32 }
///
/// let scoreboard: State<u32> = LeafState::new("Scoreboard")
///     .on_enter(|score: &mut u32| *score = 0)
///     .into();
/// let mut mapped = MappedState::new(|game: &Game| game.score, scoreboard);
///
/// let mut game = Game { score: 42 };
/// mapped.enter(&mut game);
///
/// assert_eq!(mapped.name(), "Scoreboard");
/// assert_eq!(game.score, 42);
/// ```
pub struct MappedState<S> {
    inner: Box<dyn MappedTarget<S>>,
}

impl<S: 'static> MappedState<S> {
    pub fn new<T: 'static>(
        transform: impl Fn(&S) -> T + Send + Sync + 'static,
        target: State<T>,
    ) -> Self {
        Self::from_shared(Arc::new(transform), target)
    }

    /// Build from a transform that is also used elsewhere (for example by
    /// guards adapted alongside the state).
    pub fn from_shared<T: 'static>(transform: ContextTransform<S, T>, target: State<T>) -> Self {
        Self {
            inner: Box::new(ContextMap { transform, target }),
        }
    }

    pub(crate) fn attach_bus(&mut self, bus: &TransitionBus) {
        self.inner.attach_bus(bus);
    }

    pub(crate) fn apply_fault_policy(&mut self, policy: FaultPolicy) {
        self.inner.apply_fault_policy(policy);
    }

    pub(crate) fn validate(&self) -> TopologyValidation {
        self.inner.validate()
    }
}

impl<S: 'static> StateNode<S> for MappedState<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn enter(&mut self, context: &mut S) {
        self.inner.enter(context);
    }

    fn update(&mut self, context: &mut S) {
        self.inner.update(context);
    }

    fn exit(&mut self, context: &mut S) {
        self.inner.exit(context);
    }

    fn as_state_machine(&self) -> Option<&dyn MachineView> {
        self.inner.as_state_machine()
    }
}
