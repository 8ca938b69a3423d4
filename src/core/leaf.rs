//! Leaf states built from optional callbacks.

use super::node::StateNode;

/// Lifecycle callback over a mutable context.
pub type StateFn<C> = Box<dyn FnMut(&mut C) + Send>;

/// A named state whose behavior is three optional callbacks.
///
/// Missing callbacks are no-ops.
///
/// # Example
///
/// ```rust
/// use statechart::core::{LeafState, StateNode};
///
/// let mut idle = LeafState::new("Idle").on_update(|ticks: &mut u32| *ticks += 1);
/// let mut ticks = 0;
///
/// idle.enter(&mut ticks);
/// idle.update(&mut ticks);
/// idle.update(&mut ticks);
///
/// assert_eq!(ticks, 2);
/// ```
pub struct LeafState<C> {
    name: String,
    on_enter: Option<StateFn<C>>,
    on_update: Option<StateFn<C>>,
    on_exit: Option<StateFn<C>>,
}

impl<C> LeafState<C> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            on_enter: None,
            on_update: None,
            on_exit: None,
        }
    }

    pub(crate) fn from_callbacks(
        name: impl Into<String>,
        on_enter: Option<StateFn<C>>,
        on_update: Option<StateFn<C>>,
        on_exit: Option<StateFn<C>>,
    ) -> Self {
        Self {
            name: name.into(),
            on_enter,
            on_update,
            on_exit,
        }
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
}

impl<C> StateNode<C> for LeafState<C> {
    fn name(&self) -> &str {
        &self.name
    }

    fn enter(&mut self, context: &mut C) {
        if let Some(callback) = self.on_enter.as_mut() {
            callback(context);
        }
    }

    fn update(&mut self, context: &mut C) {
        if let Some(callback) = self.on_update.as_mut() {
            callback(context);
        }
    }

    fn exit(&mut self, context: &mut C) {
        if let Some(callback) = self.on_exit.as_mut() {
            callback(context);
        }
    }
}
