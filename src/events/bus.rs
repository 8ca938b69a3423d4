//! Publish/subscribe channel for transition hops.

use crossbeam_channel::{unbounded, Sender};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::types::{SubscriptionId, TransitionEvent, TransitionSubscription};

type Callback = Arc<dyn Fn(&TransitionEvent) + Send + Sync>;

/// Internal subscriber record.
#[derive(Clone)]
enum Subscriber {
    Callback(Callback),
    Channel(Sender<TransitionEvent>),
}

struct BusInner {
    /// Subscribers keyed by id; delivery follows subscription order.
    subscribers: RwLock<BTreeMap<SubscriptionId, Subscriber>>,
    next_id: AtomicU64,
}

/// Broadcasts [`TransitionEvent`]s to zero or more subscribers.
///
/// Cloning a bus yields another handle onto the same registry, which is how
/// nested machines share one channel with their parent.
#[derive(Clone)]
pub struct TransitionBus {
    inner: Arc<BusInner>,
}

impl TransitionBus {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(BusInner {
                subscribers: RwLock::new(BTreeMap::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId(self.inner.next_id.fetch_add(1, Ordering::SeqCst))
    }

    /// Register a callback invoked synchronously for every published event.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&TransitionEvent) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.inner
            .subscribers
            .write()
            .insert(id, Subscriber::Callback(Arc::new(callback)));
        id
    }

    /// Register a channel subscriber.
    pub fn subscribe_channel(&self) -> TransitionSubscription {
        let id = self.next_id();
        let (sender, receiver) = unbounded();
        self.inner
            .subscribers
            .write()
            .insert(id, Subscriber::Channel(sender));
        TransitionSubscription { id, receiver }
    }

    /// Remove a subscription. Returns whether it was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.subscribers.write().remove(&id).is_some()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.read().len()
    }

    /// Deliver `event` to every subscriber.
    ///
    /// The registry lock is released before callbacks run, so callbacks may
    /// subscribe or unsubscribe. Channel subscribers whose receiver was
    /// dropped are removed.
    pub fn publish(&self, event: TransitionEvent) {
        let subscribers: Vec<(SubscriptionId, Subscriber)> = self
            .inner
            .subscribers
            .read()
            .iter()
            .map(|(id, subscriber)| (*id, subscriber.clone()))
            .collect();

        let mut disconnected = Vec::new();
        for (id, subscriber) in subscribers {
            match subscriber {
                Subscriber::Callback(callback) => callback(&event),
                Subscriber::Channel(sender) => {
                    if sender.send(event.clone()).is_err() {
                        disconnected.push(id);
                    }
                }
            }
        }

        if !disconnected.is_empty() {
            tracing::debug!(count = disconnected.len(), "pruning disconnected transition subscribers");
            let mut subscribers = self.inner.subscribers.write();
            for id in disconnected {
                subscribers.remove(&id);
            }
        }
    }

    /// Whether both handles point at the same registry.
    pub fn same_bus(&self, other: &TransitionBus) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for TransitionBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TransitionBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
