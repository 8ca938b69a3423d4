//! Transition notifications for external observers.
//!
//! Every hop taken while a machine resolves its next state is published on
//! a [`TransitionBus`] synchronously, before the next hop is evaluated.
//! Observers can register callbacks or receive events over a channel:
//!
//! ```rust
//! use statechart::events::TransitionBus;
//!
//! let bus = TransitionBus::new();
//! let subscription = bus.subscribe_channel();
//!
//! bus.publish(statechart::events::TransitionEvent::new("Door", "Closed", "Open"));
//!
//! let events = subscription.drain();
//! assert_eq!(events.len(), 1);
//! assert_eq!(events[0].pair(), ("Closed", "Open"));
//! ```
//!
//! Buses are cheap handles; clones share the same subscriber registry.

mod bus;
mod types;

pub use bus::TransitionBus;
pub use types::{SubscriptionId, TransitionEvent, TransitionSubscription};
