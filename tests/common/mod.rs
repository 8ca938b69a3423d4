//! Shared helpers for integration tests.

#![allow(dead_code)]

use statechart::core::{LeafState, State};
use tracing_subscriber::EnvFilter;

/// Route library logs to the test harness. Set `RUST_LOG` to see them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Context that records every lifecycle call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Journal {
    pub calls: Vec<String>,
}

impl Journal {
    pub fn take(&mut self) -> Vec<String> {
        std::mem::take(&mut self.calls)
    }
}

/// A leaf logging `"{name}.enter"`, `"{name}.update"` and `"{name}.exit"`.
pub fn journaled(name: &'static str) -> State<Journal> {
    LeafState::new(name)
        .on_enter(move |j: &mut Journal| j.calls.push(format!("{name}.enter")))
        .on_update(move |j: &mut Journal| j.calls.push(format!("{name}.update")))
        .on_exit(move |j: &mut Journal| j.calls.push(format!("{name}.exit")))
        .into()
}
