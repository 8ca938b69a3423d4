//! Core state node types.
//!
//! This module contains the building blocks evaluated by a
//! [`StateMachine`](crate::machine::StateMachine):
//! - The `StateNode` lifecycle contract and the closed `State` sum type
//! - Leaf, composed and context-mapped states
//! - Guarded transitions and their conditions
//! - The name-indexed `StateCollection`

mod collection;
mod composed;
mod leaf;
mod mapped;
mod node;
mod transition;

pub use collection::{StateCollection, DEFAULT_STATE_NAME};
pub use composed::ComposedState;
pub use leaf::{LeafState, StateFn};
pub use mapped::{ContextTransform, MappedState};
pub use node::{State, StateKind, StateNode};
pub use transition::{Condition, Transition, TransitionCondition};
