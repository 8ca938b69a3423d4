//! Traffic Light State Machine
//!
//! This example drives a cyclic machine from a tick counter.
//!
//! Key concepts:
//! - Guards reading the context decide when to move
//! - A firing guard resets the counter so the next light waits its turn
//! - A channel subscription observes every hop
//!
//! Run with: cargo run --example traffic_light

use statechart::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct Timer {
    ticks_in_state: u32,
}

/// Stay for `duration` updates, then hand over to `next`.
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

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Traffic Light State Machine ===\n");

    let mut machine = MachineBuilder::new("TrafficLight")
        .state(light("Red", "Green", 3))
        .state(light("Green", "Yellow", 3))
        .state(light("Yellow", "Red", 1))
        .build()
        .unwrap();
    let hops = machine.bus().subscribe_channel();

    let mut timer = Timer::default();
    machine.enter(&mut timer);
    println!("Initial state: {:?}\n", machine.active_id());

    for tick in 1..=15 {
        if let Err(fault) = machine.try_update(&mut timer) {
            println!("  tick {tick:>2}: {fault}");
        }
        for event in hops.drain() {
            println!("  tick {tick:>2}: {} -> {}", event.source, event.target);
        }
    }

    println!("\nFinal state: {:?}", machine.active_id());
    println!("\nTopology:\n{}", machine.graph().to_json_pretty().unwrap());

    println!("\n=== Example Complete ===");
}
