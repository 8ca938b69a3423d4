//! Guarded transitions between named states.
//!
//! A transition is pure string linkage: it names a source and a target
//! state and carries a condition evaluated against the machine context.
//! Transitions never own or reference state nodes; the machine resolves
//! names by lookup when a transition fires.

use std::fmt;
use std::sync::Arc;

/// Anything that can decide whether a transition should fire.
///
/// Closures of the form `Fn(&mut C) -> bool` implement this trait, so any
/// existing rule object only needs an `evaluate` method to be usable as a
/// transition condition.
///
/// # Example
///
/// ```rust
/// use statechart::core::{Transition, TransitionCondition};
///
/// struct Threshold(u32);
///
/// impl TransitionCondition<u32> for Threshold {
///     fn evaluate(&self, context: &mut u32) -> bool {
///         *context >= self.0
///     }
/// }
///
/// let transition: Transition<u32> = Transition::with_condition("Idle", "Busy", Threshold(10));
/// assert!(!transition.evaluate(&mut 3));
/// assert!(transition.evaluate(&mut 12));
/// ```
pub trait TransitionCondition<C> {
    /// Decide whether the transition fires for this context.
    fn evaluate(&self, context: &mut C) -> bool;
}

impl<C, F> TransitionCondition<C> for F
where
    F: Fn(&mut C) -> bool,
{
    fn evaluate(&self, context: &mut C) -> bool {
        self(context)
    }
}

/// Shared, cloneable transition guard.
///
/// Guards receive the context mutably so they can consume input (for
/// example popping a queued event). They must not change their own future
/// answer non-deterministically within one resolution pass.
pub struct Condition<C> {
    predicate: Arc<dyn Fn(&mut C) -> bool + Send + Sync>,
}

impl<C: 'static> Condition<C> {
    /// Create a condition from a closure.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&mut C) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
        }
    }

    /// Adapt an existing condition object through its `evaluate` method.
    pub fn from_evaluator<T>(condition: T) -> Self
    where
        T: TransitionCondition<C> + Send + Sync + 'static,
    {
        Self::new(move |context: &mut C| condition.evaluate(context))
    }

    /// A condition that always returns `value`.
    pub fn constant(value: bool) -> Self {
        Self::new(move |_: &mut C| value)
    }

    /// A condition that always fires.
    pub fn always() -> Self {
        Self::constant(true)
    }

    /// A condition that never fires.
    pub fn never() -> Self {
        Self::constant(false)
    }
}

impl<C> Condition<C> {
    /// Evaluate the guard against the context.
    pub fn evaluate(&self, context: &mut C) -> bool {
        (self.predicate)(context)
    }
}

impl<C> TransitionCondition<C> for Condition<C> {
    fn evaluate(&self, context: &mut C) -> bool {
        Condition::evaluate(self, context)
    }
}

impl<C> Clone for Condition<C> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<C> fmt::Debug for Condition<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Condition(..)")
    }
}

/// A directed, guarded edge between two named states.
///
/// Identity is the `(source, target)` pair; it is not required to be
/// unique within a machine.
pub struct Transition<C> {
    source: String,
    target: String,
    condition: Condition<C>,
}

impl<C: 'static> Transition<C> {
    /// Create a transition guarded by a closure.
    ///
    /// # Example
    ///
    /// ```rust
    /// use statechart::core::Transition;
    ///
    /// let transition = Transition::new("Locked", "Open", |code: &mut u32| *code == 1234);
    /// assert_eq!(transition.id(), "Locked-Open");
    /// assert!(transition.evaluate(&mut 1234));
    /// ```
    pub fn new<F>(source: impl Into<String>, target: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&mut C) -> bool + Send + Sync + 'static,
    {
        Self::guarded(source, target, Condition::new(predicate))
    }

    /// Create a transition whose guard always returns `value`.
    pub fn constant(source: impl Into<String>, target: impl Into<String>, value: bool) -> Self {
        Self::guarded(source, target, Condition::constant(value))
    }

    /// Create a transition from any object implementing [`TransitionCondition`].
    pub fn with_condition<T>(source: impl Into<String>, target: impl Into<String>, condition: T) -> Self
    where
        T: TransitionCondition<C> + Send + Sync + 'static,
    {
        Self::guarded(source, target, Condition::from_evaluator(condition))
    }
}

impl<C> Transition<C> {
    /// Create a transition from a prepared [`Condition`] without rewrapping it.
    pub fn guarded(
        source: impl Into<String>,
        target: impl Into<String>,
        condition: Condition<C>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            condition,
        }
    }

    pub fn source_id(&self) -> &str {
        &self.source
    }

    pub fn target_id(&self) -> &str {
        &self.target
    }

    pub fn condition(&self) -> &Condition<C> {
        &self.condition
    }

    /// `"{source}-{target}"`
    pub fn id(&self) -> String {
        format!("{}-{}", self.source, self.target)
    }

    /// Evaluate the guard against the context.
    pub fn evaluate(&self, context: &mut C) -> bool {
        self.condition.evaluate(context)
    }
}

impl<C> Clone for Transition<C> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            target: self.target.clone(),
            condition: self.condition.clone(),
        }
    }
}

impl<C> fmt::Debug for Transition<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("source", &self.source)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Inputs {
        queue: Vec<&'static str>,
        evaluations: usize,
    }

    struct NextInputIs(&'static str);

    impl TransitionCondition<Inputs> for NextInputIs {
        fn evaluate(&self, context: &mut Inputs) -> bool {
            context.evaluations += 1;
            context.queue.last() == Some(&self.0)
        }
    }

    #[test]
    fn constant_conditions() {
        let mut context = Inputs::default();

        assert!(Condition::<Inputs>::always().evaluate(&mut context));
        assert!(!Condition::<Inputs>::never().evaluate(&mut context));
        assert!(Condition::<Inputs>::constant(true).evaluate(&mut context));
        assert!(!Transition::<Inputs>::constant("A", "B", false).evaluate(&mut context));
    }

    #[test]
    fn guard_can_consume_context() {
        let transition = Transition::new("Idle", "Running", |ctx: &mut Inputs| {
            ctx.queue.pop() == Some("start")
        });

        let mut context = Inputs {
            queue: vec!["start"],
            ..Default::default()
        };

        assert!(transition.evaluate(&mut context));
        assert!(context.queue.is_empty());
        assert!(!transition.evaluate(&mut context));
    }

    #[test]
    fn adapts_condition_objects() {
        let transition = Transition::with_condition("Idle", "Running", NextInputIs("go"));

        let mut context = Inputs {
            queue: vec!["stop", "go"],
            ..Default::default()
        };

        assert!(transition.evaluate(&mut context));
        context.queue.pop();
        assert!(!transition.evaluate(&mut context));
        assert_eq!(context.evaluations, 2);
    }

    #[test]
    fn guarded_shares_a_prepared_condition() {
        let condition = Condition::new(|ctx: &mut Inputs| {
            ctx.evaluations += 1;
            ctx.queue.is_empty()
        });
        let first = Transition::guarded("A", "B", condition.clone());
        let second = Transition::guarded("A", "C", condition);
        let mut context = Inputs::default();

        assert!(first.evaluate(&mut context));
        assert!(second.evaluate(&mut context));
        assert_eq!(context.evaluations, 2);
    }

    #[test]
    fn identity_is_source_target_pair() {
        let transition = Transition::<Inputs>::constant("Idle", "Running", true);

        assert_eq!(transition.source_id(), "Idle");
        assert_eq!(transition.target_id(), "Running");
        assert_eq!(transition.id(), "Idle-Running");
    }

    #[test]
    fn clones_share_the_guard() {
        let transition = Transition::new("A", "B", |ctx: &mut Inputs| {
            ctx.evaluations += 1;
            true
        });
        let cloned = transition.clone();
        let mut context = Inputs::default();

        transition.evaluate(&mut context);
        cloned.evaluate(&mut context);

        assert_eq!(context.evaluations, 2);
        assert_eq!(cloned.id(), transition.id());
    }
}
