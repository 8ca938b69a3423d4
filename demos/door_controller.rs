//! Door Controller
//!
//! This example models a door with a nested lock machine and a keypad
//! subtree that works on its own context type.
//!
//! Key concepts:
//! - Nested machines built from child declarations
//! - Guards consuming the input of the current tick
//! - Context mapping for a self-contained subtree
//! - Validation failures reported by the builder
//!
//! Run with: cargo run --example door_controller

use statechart::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct Door {
    current: Option<&'static str>,
    code: u32,
    locked: bool,
}

impl Door {
    /// Consume this tick's event if it matches.
    fn take(&mut self, event: &str) -> bool {
        if self.current == Some(event) {
            self.current = None;
            true
        } else {
            false
        }
    }
}

fn door_machine() -> Result<StateMachine<Door>, BuildError> {
    MachineBuilder::new("Door")
        .state(
            StateBuilder::new("Closed")
                .child(
                    StateBuilder::new("Locked")
                        .on_enter(|d: &mut Door| d.locked = true)
                        .transition_to("Unlocked", |d: &mut Door| d.code == 1234 && d.take("unlock")),
                )
                .child(
                    StateBuilder::new("Unlocked")
                        .on_enter(|d: &mut Door| d.locked = false)
                        .transition_to("Locked", |d: &mut Door| d.take("lock")),
                )
                .transition_to("Open", |d: &mut Door| !d.locked && d.take("open")),
        )
        .state(
            StateBuilder::new("Open")
                .on_enter(|_: &mut Door| println!("  the door swings open"))
                .transition_to("Closed", |d: &mut Door| d.take("close")),
        )
        .state(
            StateBuilder::<u32>::new("Keypad")
                .on_update(|code: &mut u32| *code = 0)
                .map_context(|d: &Door| d.code),
        )
        .entry("Closed")
        .fault_policy(FaultPolicy::Log)
        .build()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Door Controller ===\n");

    let mut machine = door_machine().unwrap();
    let hops = machine.bus().subscribe_channel();
    let mut door = Door {
        code: 1234,
        ..Default::default()
    };

    machine.enter(&mut door);
    for input in ["open", "unlock", "open", "close"] {
        door.current = Some(input);
        machine.update(&mut door);
        for event in hops.drain() {
            println!("  [{}] {} -> {}", event.machine, event.source, event.target);
        }
        if let Some(ignored) = door.current.take() {
            println!("  '{ignored}' ignored in {:?}", machine.active_id());
        }
    }

    println!("\nActive path: {:?}", machine.graph().active_path());

    println!("\nA broken definition is rejected with every problem listed:");
    let broken = MachineBuilder::<Door>::new("Broken")
        .state(StateBuilder::new("Closed").transition_to("Ajar", |_: &mut Door| true))
        .entry("Sealed")
        .build();
    if let Err(error) = broken {
        println!("  {error}");
        for violation in error.violations() {
            println!("  - {violation}");
        }
    }

    println!("\n=== Example Complete ===");
}
