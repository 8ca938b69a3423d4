//! Static topology checks using `Validation`.
//!
//! Unlike the runtime, which stops at the first fault, validation walks the
//! whole machine tree and reports every problem at once.

pub(crate) mod rules;
mod violations;

pub use violations::TopologyViolation;

use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

use crate::machine::StateMachine;

/// Outcome of validating a machine tree.
pub type TopologyValidation = Validation<(), NonEmptyVec<TopologyViolation>>;

/// Validate `machine` and every machine nested in it.
///
/// # Example
///
/// ```rust
/// use statechart::core::{State, Transition};
/// use statechart::machine::StateMachine;
/// use statechart::validation::{self, TopologyViolation};
///
/// let machine: StateMachine<()> = StateMachine::new(
///     "Door",
///     [State::leaf("Closed")],
///     [Transition::constant("Closed", "Open", true)],
///     "Shut",
/// );
///
/// let violations = validation::into_result(validation::validate_machine(&machine)).unwrap_err();
/// assert_eq!(violations.len(), 2);
/// assert!(matches!(violations[0], TopologyViolation::MissingEntryState { .. }));
/// ```
pub fn validate_machine<C: 'static>(machine: &StateMachine<C>) -> TopologyValidation {
    rules::check_machine(machine)
}

/// Convert a validation outcome into a plain `Result`.
pub fn into_result(validation: TopologyValidation) -> Result<(), Vec<TopologyViolation>> {
    match validation {
        Validation::Success(()) => Ok(()),
        Validation::Failure(errors) => Err(errors.iter().cloned().collect()),
    }
}
