//! Builder for a single node of the state tree.

use std::sync::Arc;

use crate::core::{
    ComposedState, Condition, ContextTransform, LeafState, MappedState, State, StateFn, StateNode,
    Transition,
};
use crate::machine::StateMachine;

/// Declarative description of one state and its outgoing transitions.
///
/// A node without children becomes a leaf. A node with children becomes a
/// nested machine whose entry is the first child. Callbacks set on a node
/// with children run from a leaf of the same name composed next to the
/// nested machine.
///
/// # Example
///
/// ```rust
/// use statechart::builder::StateBuilder;
/// use statechart::core::{StateKind, StateNode};
///
/// let (state, transitions) = StateBuilder::<u32>::new("Walking")
///     .child(StateBuilder::new("Slow").transition_to("Fast", |speed: &mut u32| *speed > 5))
///     .child("Fast")
///     .transition_to("Idle", |speed: &mut u32| *speed == 0)
///     .into_parts();
///
/// assert_eq!(state.name(), "Walking");
/// assert_eq!(state.kind(), StateKind::Machine);
/// assert_eq!(transitions[0].id(), "Walking-Idle");
/// ```
pub struct StateBuilder<C> {
    name: String,
    base: Option<State<C>>,
    children: Vec<StateBuilder<C>>,
    on_enter: Option<StateFn<C>>,
    on_update: Option<StateFn<C>>,
    on_exit: Option<StateFn<C>>,
    transitions: Vec<(String, Condition<C>)>,
}

impl<C: 'static> StateBuilder<C> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base: None,
            children: Vec::new(),
            on_enter: None,
            on_update: None,
            on_exit: None,
            transitions: Vec::new(),
        }
    }

    /// Start from an existing state. Its name becomes the node name.
    pub fn from_state(state: State<C>) -> Self {
        let mut builder = Self::new(state.name());
        builder.base = Some(state);
        builder
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a child. The first child is the nested machine's entry state.
    pub fn child(mut self, child: impl Into<StateBuilder<C>>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<I, B>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<StateBuilder<C>>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    pub fn on_enter<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&mut C) + Send + 'static,
    {
        self.on_enter = Some(Box::new(callback));
        self
    }

    pub fn on_update<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&mut C) + Send + 'static,
    {
        self.on_update = Some(Box::new(callback));
        self
    }

    pub fn on_exit<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&mut C) + Send + 'static,
    {
        self.on_exit = Some(Box::new(callback));
        self
    }

    /// Declare a transition from this node to `target`, guarded by a closure.
    ///
    /// Transitions keep declaration order; the first satisfied one wins.
    pub fn transition_to<F>(self, target: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&mut C) -> bool + Send + Sync + 'static,
    {
        self.transition(target, Condition::new(predicate))
    }

    /// Declare a transition with a prepared [`Condition`].
    pub fn transition(mut self, target: impl Into<String>, condition: Condition<C>) -> Self {
        self.transitions.push((target.into(), condition));
        self
    }

    fn has_callbacks(&self) -> bool {
        self.on_enter.is_some() || self.on_update.is_some() || self.on_exit.is_some()
    }

    /// Lower this node into a state plus the transitions leaving it.
    pub fn into_parts(self) -> (State<C>, Vec<Transition<C>>) {
        let has_callbacks = self.has_callbacks();
        let Self {
            name,
            base,
            children,
            on_enter,
            on_update,
            on_exit,
            transitions,
        } = self;

        let mut parts: Vec<State<C>> = Vec::new();
        parts.extend(base);

        if !children.is_empty() {
            let entry = children[0].name.clone();
            let mut states = Vec::with_capacity(children.len());
            let mut edges = Vec::new();
            for child in children {
                let (state, outgoing) = child.into_parts();
                states.push(state);
                edges.extend(outgoing);
            }
            parts.push(StateMachine::new(name.as_str(), states, edges, entry).into());
        }

        if has_callbacks {
            parts.push(LeafState::from_callbacks(name.as_str(), on_enter, on_update, on_exit).into());
        }

        let transitions = transitions
            .into_iter()
            .map(|(target, condition)| Transition::guarded(name.as_str(), target, condition))
            .collect();

        let state = match parts.len() {
            0 => State::leaf(name),
            1 => parts.remove(0),
            _ => ComposedState::new(name, parts).into(),
        };

        (state, transitions)
    }

    /// Adapt this subtree to run inside a machine over context `S`.
    ///
    /// The built node and the guards of its declared transitions both see a
    /// context derived from the outer one. Nothing flows back.
    pub fn map_context<S: 'static>(
        self,
        transform: impl Fn(&S) -> C + Send + Sync + 'static,
    ) -> StateBuilder<S> {
        let transform: ContextTransform<S, C> = Arc::new(transform);
        let (state, transitions) = self.into_parts();

        let transitions = transitions
            .into_iter()
            .map(|transition| {
                let transform = Arc::clone(&transform);
                let condition = transition.condition().clone();
                let adapted = Condition::new(move |context: &mut S| {
                    let mut derived = transform(context);
                    condition.evaluate(&mut derived)
                });
                (transition.target_id().to_string(), adapted)
            })
            .collect();

        let mut builder = StateBuilder::from_state(MappedState::from_shared(transform, state).into());
        builder.transitions = transitions;
        builder
    }
}

impl<C: AsRef<str> + 'static> StateBuilder<C> {
    /// Declare a transition that fires when the context equals `target`.
    pub fn transition_on(self, target: impl Into<String>) -> Self {
        let target = target.into();
        let expected = target.clone();
        self.transition_to(target, move |context: &mut C| context.as_ref() == expected)
    }
}

impl<C: 'static> From<&str> for StateBuilder<C> {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl<C: 'static> From<String> for StateBuilder<C> {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl<C: 'static> From<State<C>> for StateBuilder<C> {
    fn from(state: State<C>) -> Self {
        Self::from_state(state)
    }
}
