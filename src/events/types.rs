//! Types for transition notifications.

use chrono::{DateTime, Utc};
use crossbeam_channel::{Receiver, RecvError, TryRecvError};
use serde::{Deserialize, Serialize};

/// Unique identifier for a subscription on one bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubscriptionId(pub u64);

/// A transition hop taken by a machine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionEvent {
    /// Name of the machine that took the hop
    pub machine: String,
    /// State the hop left
    pub source: String,
    /// State the hop leads to
    pub target: String,
    /// When the hop was taken
    pub at: DateTime<Utc>,
}

impl TransitionEvent {
    pub fn new(
        machine: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            machine: machine.into(),
            source: source.into(),
            target: target.into(),
            at: Utc::now(),
        }
    }

    /// `(source, target)`
    pub fn pair(&self) -> (&str, &str) {
        (&self.source, &self.target)
    }
}

/// Channel-backed subscription returned by
/// [`TransitionBus::subscribe_channel`](super::TransitionBus::subscribe_channel).
///
/// Dropping the subscription disconnects it; the bus prunes it on the next
/// publish.
pub struct TransitionSubscription {
    pub(crate) id: SubscriptionId,
    pub(crate) receiver: Receiver<TransitionEvent>,
}

impl TransitionSubscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Block until the next event arrives.
    pub fn recv(&self) -> Result<TransitionEvent, RecvError> {
        self.receiver.recv()
    }

    pub fn try_recv(&self) -> Result<TransitionEvent, TryRecvError> {
        self.receiver.try_recv()
    }

    /// Take every event published so far without blocking.
    pub fn drain(&self) -> Vec<TransitionEvent> {
        self.receiver.try_iter().collect()
    }

    /// Like [`drain`](Self::drain) but only the `(source, target)` pairs.
    pub fn drain_pairs(&self) -> Vec<(String, String)> {
        self.receiver
            .try_iter()
            .map(|event| (event.source, event.target))
            .collect()
    }
}
