//! Integration tests for the enter/update/exit lifecycle.

mod common;

use common::{init_tracing, journaled, Journal};
use statechart::prelude::*;

fn always(from: &str, to: &str) -> Transition<Journal> {
    Transition::constant(from, to, true)
}

fn never(from: &str, to: &str) -> Transition<Journal> {
    Transition::constant(from, to, false)
}

#[test]
fn first_match_wins_over_later_true_guards() {
    init_tracing();
    let mut machine = StateMachine::new(
        "Fan",
        ["A", "T1", "T2", "T3"].map(journaled),
        [never("A", "T1"), always("A", "T2"), always("A", "T3")],
        "A",
    );
    let mut journal = Journal::default();

    machine.enter(&mut journal);
    machine.update(&mut journal);

    assert_eq!(machine.active_id(), Some("T2"));
    assert_eq!(
        journal.take(),
        vec!["A.enter", "A.exit", "T2.enter", "T2.update"]
    );
}

#[test]
fn chained_hops_notify_in_order_then_update_landing_state() {
    init_tracing();
    let mut machine = StateMachine::new(
        "Chain",
        ["A", "B", "C"].map(journaled),
        [always("A", "B"), always("B", "C")],
        "A",
    );
    let hops = machine.bus().subscribe_channel();
    let mut journal = Journal::default();
    machine.enter(&mut journal);
    journal.take();

    let step = machine.try_update(&mut journal).unwrap();

    assert_eq!(
        step,
        StepResult::Transitioned {
            from: "A".into(),
            to: "C".into(),
            hops: 2
        }
    );
    assert_eq!(
        hops.drain_pairs(),
        vec![
            ("A".to_string(), "B".to_string()),
            ("B".to_string(), "C".to_string())
        ]
    );
    assert_eq!(journal.take(), vec!["A.exit", "C.enter", "C.update"]);
}

#[test]
fn cycles_fail_safely() {
    init_tracing();
    let mut machine = StateMachine::new(
        "Cycle",
        ["A", "B"].map(journaled),
        [always("A", "B"), always("B", "A")],
        "A",
    )
    .with_fault_policy(FaultPolicy::Log);
    let hops = machine.bus().subscribe_channel();
    let mut journal = Journal::default();
    machine.enter(&mut journal);
    journal.take();

    machine.update(&mut journal);

    assert_eq!(machine.active_id(), Some("A"));
    assert_eq!(hops.drain_pairs(), vec![("A".to_string(), "B".to_string())]);
    assert!(journal.take().is_empty());
}

#[test]
fn stable_state_updates_exactly_once_per_tick() {
    init_tracing();
    let mut machine = StateMachine::new(
        "Stable",
        ["A", "B", "C"].map(journaled),
        [never("A", "B"), never("A", "C"), always("C", "A")],
        "A",
    );
    let mut journal = Journal::default();
    machine.enter(&mut journal);

    for _ in 0..3 {
        assert_eq!(machine.try_update(&mut journal), Ok(StepResult::Stayed));
    }

    assert_eq!(machine.active_id(), Some("A"));
    assert_eq!(
        journal.take(),
        vec!["A.enter", "A.update", "A.update", "A.update"]
    );
}

#[test]
fn state_without_transitions_is_stable() {
    let mut machine = StateMachine::new("Solo", ["Only"].map(journaled), Vec::new(), "Only");
    let mut journal = Journal::default();

    machine.enter(&mut journal);
    machine.update(&mut journal);

    assert_eq!(journal.take(), vec!["Only.enter", "Only.update"]);
}

#[test]
fn exit_then_enter_restarts_from_entry() {
    let mut machine = StateMachine::new(
        "Restart",
        ["A", "B"].map(journaled),
        [always("A", "B")],
        "A",
    );
    let mut journal = Journal::default();

    machine.enter(&mut journal);
    machine.update(&mut journal);
    machine.exit(&mut journal);
    assert!(!machine.is_active());
    assert_eq!(machine.try_update(&mut journal), Ok(StepResult::Idle));

    machine.enter(&mut journal);

    assert_eq!(machine.active_id(), Some("A"));
    assert_eq!(
        journal.take(),
        vec!["A.enter", "A.exit", "B.enter", "B.update", "B.exit", "A.enter"]
    );
}

#[test]
fn missing_states_are_faults_not_fallbacks() {
    init_tracing();
    let mut no_entry = StateMachine::new("NoEntry", ["A"].map(journaled), Vec::new(), "Ghost");
    let mut no_target = StateMachine::new(
        "NoTarget",
        ["A"].map(journaled),
        [always("A", "Ghost")],
        "A",
    );
    let mut journal = Journal::default();

    assert_eq!(
        no_entry.try_enter(&mut journal),
        Err(MachineError::MissingEntryState {
            machine: "NoEntry".into(),
            entry: "Ghost".into()
        })
    );
    assert_eq!(no_entry.active_id(), None);

    no_target.try_enter(&mut journal).unwrap();
    assert!(matches!(
        no_target.try_update(&mut journal),
        Err(MachineError::MissingState { .. })
    ));
    assert_eq!(no_target.active_id(), Some("A"));
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "Missing entry state 'Ghost'")]
fn missing_entry_asserts_in_debug_builds() {
    let mut machine = StateMachine::new("NoEntry", ["A"].map(journaled), Vec::new(), "Ghost");

    machine.enter(&mut Journal::default());
}

#[test]
fn empty_machine_enters_default_state() {
    let mut machine: StateMachine<Journal> = StateMachine::new("Empty", [], Vec::new(), "state");

    machine.enter(&mut Journal::default());

    assert_eq!(machine.states().len(), 1);
    assert_eq!(machine.active_id(), Some("state"));
}

#[test]
fn owned_context_calls_discard_mutations() {
    let mut machine = StateMachine::new("Owned", ["A"].map(journaled), Vec::new(), "A");
    let journal = Journal::default();

    machine.enter_owned(journal.clone());
    machine.update_owned(journal.clone());
    machine.exit_owned(journal.clone());

    assert!(journal.calls.is_empty());
    assert!(!machine.is_active());
}

#[test]
fn guard_consuming_input_fires_once() {
    let mut machine = StateMachine::new(
        "Queue",
        [State::leaf("Idle"), State::leaf("Busy")],
        [
            Transition::new("Idle", "Busy", |queue: &mut Vec<&str>| {
                queue.last() == Some(&"job") && queue.pop().is_some()
            }),
            Transition::new("Busy", "Idle", |queue: &mut Vec<&str>| {
                queue.last() == Some(&"done") && queue.pop().is_some()
            }),
        ],
        "Idle",
    );
    let mut queue = vec!["job"];

    machine.enter(&mut queue);
    machine.update(&mut queue);
    machine.update(&mut queue);

    assert_eq!(machine.active_id(), Some("Busy"));
    assert!(queue.is_empty());

    queue.push("done");
    machine.update(&mut queue);
    assert_eq!(machine.active_id(), Some("Idle"));
}

#[test]
fn callback_subscribers_observe_hops() {
    use parking_lot::Mutex;
    use std::sync::Arc;

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let bus = TransitionBus::new();
    bus.subscribe(move |event| {
        let (from, to) = event.pair();
        sink.lock().push(format!("{from}>{to}"));
    });
    let mut machine = StateMachine::new(
        "Observed",
        ["A", "B"].map(journaled),
        [always("A", "B")],
        "A",
    )
    .with_bus(bus);

    machine.enter(&mut Journal::default());
    machine.update(&mut Journal::default());

    assert_eq!(*seen.lock(), vec!["A>B"]);
}
