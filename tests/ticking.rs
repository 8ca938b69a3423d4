//! Integration tests for machines fed one input per tick.

mod common;

use common::init_tracing;
use statechart::prelude::*;

#[derive(Debug, Default)]
struct Timer {
    ticks_in_state: u32,
}

fn light(name: &'static str, next: &'static str, duration: u32) -> StateBuilder<Timer> {
    StateBuilder::new(name)
        .on_update(|t: &mut Timer| t.ticks_in_state += 1)
        .transition_to(next, move |t: &mut Timer| {
            if t.ticks_in_state >= duration {
                t.ticks_in_state = 0;
                true
            } else {
                false
            }
        })
}

fn traffic_light() -> StateMachine<Timer> {
    MachineBuilder::new("TrafficLight")
        .state(light("Red", "Green", 3))
        .state(light("Green", "Yellow", 3))
        .state(light("Yellow", "Red", 1))
        .build()
        .unwrap()
}

#[test]
fn traffic_light_cycles_over_two_periods_without_faults() {
    init_tracing();
    let mut machine = traffic_light();
    let hops = machine.bus().subscribe_channel();
    let mut timer = Timer::default();
    machine.enter(&mut timer);

    let mut seen = Vec::new();
    for tick in 1..=15 {
        let step = machine.try_update(&mut timer).unwrap();
        if let StepResult::Transitioned { hops: count, .. } = step {
            assert_eq!(count, 1, "tick {tick} chained past the next light");
        }
        seen.extend(hops.drain().into_iter().map(|event| (tick, event.source, event.target)));
    }

    let expected = [
        (4, "Red", "Green"),
        (7, "Green", "Yellow"),
        (8, "Yellow", "Red"),
        (11, "Red", "Green"),
        (14, "Green", "Yellow"),
        (15, "Yellow", "Red"),
    ];
    assert_eq!(
        seen,
        expected
            .iter()
            .map(|(tick, from, to)| (*tick, from.to_string(), to.to_string()))
            .collect::<Vec<_>>()
    );
    assert_eq!(machine.active_id(), Some("Red"));
}

#[test]
fn traffic_light_ticks_never_fault_across_many_periods() {
    let mut machine = traffic_light();
    let mut timer = Timer::default();
    machine.enter(&mut timer);

    let faults = (0..71)
        .filter(|_| machine.try_update(&mut timer).is_err())
        .count();

    assert_eq!(faults, 0);
    assert_eq!(machine.active_id(), Some("Red"));
}

#[derive(Debug, Default)]
struct Door {
    current: Option<&'static str>,
    locked: bool,
}

impl Door {
    fn take(&mut self, event: &str) -> bool {
        if self.current == Some(event) {
            self.current = None;
            true
        } else {
            false
        }
    }
}

fn door() -> StateMachine<Door> {
    MachineBuilder::new("Door")
        .state(
            StateBuilder::new("Closed")
                .child(
                    StateBuilder::new("Locked")
                        .on_enter(|d: &mut Door| d.locked = true)
                        .transition_to("Unlocked", |d: &mut Door| d.take("unlock")),
                )
                .child(
                    StateBuilder::new("Unlocked")
                        .on_enter(|d: &mut Door| d.locked = false)
                        .transition_to("Locked", |d: &mut Door| d.take("lock")),
                )
                .transition_to("Open", |d: &mut Door| !d.locked && d.take("open")),
        )
        .state(StateBuilder::new("Open").transition_to("Closed", |d: &mut Door| d.take("close")))
        .entry("Closed")
        .build()
        .unwrap()
}

#[test]
fn door_consumes_at_most_one_event_per_tick() {
    init_tracing();
    let mut machine = door();
    let hops = machine.bus().subscribe_channel();
    let mut state = Door::default();
    machine.enter(&mut state);

    let mut ignored = Vec::new();
    for input in ["open", "unlock", "open", "close", "open"] {
        state.current = Some(input);
        machine.try_update(&mut state).unwrap();
        if let Some(event) = state.current.take() {
            ignored.push(event);
        }
    }

    assert_eq!(ignored, vec!["open", "open"]);
    assert_eq!(
        hops.drain_pairs(),
        vec![
            ("Locked".to_string(), "Unlocked".to_string()),
            ("Closed".to_string(), "Open".to_string()),
            ("Open".to_string(), "Closed".to_string()),
        ]
    );
    assert_eq!(machine.graph().active_path(), vec!["Closed", "Locked"]);
    assert!(state.locked);
}
