//! Individual topology checks.
//!
//! Each check inspects one aspect of a single machine and returns its own
//! `Validation`. `check_machine` runs all of them and accumulates every
//! failure with `all_vec`, recursing into nested machines last.

use stillwater::validation::Validation;

use super::{TopologyValidation, TopologyViolation};
use crate::core::StateNode;
use crate::machine::StateMachine;

/// Run every check against `machine` and the machines nested in it.
pub(crate) fn check_machine<C: 'static>(machine: &StateMachine<C>) -> TopologyValidation {
    all(vec![
        entry_exists(machine),
        state_names_present(machine),
        sources_known(machine),
        targets_known(machine),
        nested_states(machine),
    ])
}

/// The entry state must be registered.
fn entry_exists<C: 'static>(machine: &StateMachine<C>) -> TopologyValidation {
    if machine.states().contains(machine.entry_id()) {
        Validation::success(())
    } else {
        Validation::fail(TopologyViolation::MissingEntryState {
            machine: machine.name().to_string(),
            entry: machine.entry_id().to_string(),
        })
    }
}

/// No state may have an empty name. Reported once per machine.
fn state_names_present<C: 'static>(machine: &StateMachine<C>) -> TopologyValidation {
    if machine.states().iter().any(|state| state.name().is_empty()) {
        Validation::fail(TopologyViolation::EmptyStateName {
            machine: machine.name().to_string(),
        })
    } else {
        Validation::success(())
    }
}

fn sources_known<C: 'static>(machine: &StateMachine<C>) -> TopologyValidation {
    let checks = machine
        .ordered_sources()
        .into_iter()
        .filter(|source| !machine.transitions_from(source).is_empty())
        .map(|source| {
            if machine.states().contains(source) {
                Validation::success(())
            } else {
                Validation::fail(TopologyViolation::UnknownSource {
                    machine: machine.name().to_string(),
                    from: source.to_string(),
                })
            }
        })
        .collect();

    all(checks)
}

/// Every declared transition must point at a registered state.
fn targets_known<C: 'static>(machine: &StateMachine<C>) -> TopologyValidation {
    let checks = machine
        .edges()
        .into_iter()
        .map(|(from, to)| {
            if machine.states().contains(to) {
                Validation::success(())
            } else {
                Validation::fail(TopologyViolation::UnknownTarget {
                    machine: machine.name().to_string(),
                    from: from.to_string(),
                    to: to.to_string(),
                })
            }
        })
        .collect();

    all(checks)
}

fn nested_states<C: 'static>(machine: &StateMachine<C>) -> TopologyValidation {
    all(machine.states().iter().map(|state| state.validate()).collect())
}

pub(crate) fn all(checks: Vec<TopologyValidation>) -> TopologyValidation {
    Validation::all_vec(checks).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{State, Transition};

    fn machine(states: Vec<State<()>>, transitions: Vec<Transition<()>>, entry: &str) -> StateMachine<()> {
        StateMachine::new("M", states, transitions, entry)
    }

    fn failures(validation: TopologyValidation) -> Vec<TopologyViolation> {
        match validation {
            Validation::Success(_) => Vec::new(),
            Validation::Failure(errors) => errors.iter().cloned().collect(),
        }
    }

    #[test]
    fn each_check_stands_alone() {
        let m = machine(
            vec![State::leaf("A")],
            vec![Transition::constant("A", "B", true), Transition::constant("A", "C", true)],
            "A",
        );

        assert!(entry_exists(&m).is_success());
        assert!(state_names_present(&m).is_success());
        assert!(sources_known(&m).is_success());
        assert_eq!(failures(targets_known(&m)).len(), 2);
    }

    #[test]
    fn checks_accumulate_in_order() {
        let m = machine(
            vec![State::leaf("")],
            vec![Transition::constant("Ghost", "Missing", true)],
            "Nowhere",
        );

        let violations = failures(check_machine(&m));

        assert_eq!(
            violations,
            vec![
                TopologyViolation::MissingEntryState {
                    machine: "M".into(),
                    entry: "Nowhere".into(),
                },
                TopologyViolation::EmptyStateName { machine: "M".into() },
                TopologyViolation::UnknownSource {
                    machine: "M".into(),
                    from: "Ghost".into(),
                },
                TopologyViolation::UnknownTarget {
                    machine: "M".into(),
                    from: "Ghost".into(),
                    to: "Missing".into(),
                },
            ]
        );
    }

    #[test]
    fn empty_machine_only_misses_its_entry() {
        let m = machine(vec![], vec![], "Start");

        assert!(state_names_present(&m).is_success());
        assert!(sources_known(&m).is_success());
        assert!(targets_known(&m).is_success());
        assert!(nested_states(&m).is_success());
        assert_eq!(failures(check_machine(&m)).len(), 1);
    }
}
