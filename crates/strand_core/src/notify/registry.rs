//! Observer registration with immutable-snapshot-replace semantics.
//!
//! Subscribing or unsubscribing builds a new subscriber array and swaps it
//! in under a short mutex. Dispatch clones the current array and iterates it
//! with no lock held, so a callback may subscribe, unsubscribe, or call back
//! into the list that raised the event.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

/// Token returned by a subscription, used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

static NEXT_SUBSCRIPTION_ID: AtomicU64 = AtomicU64::new(1);

impl SubscriptionId {
    fn next() -> Self {
        Self(NEXT_SUBSCRIPTION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

type Callback<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// The set of callbacks registered for one event stream.
pub(crate) struct SubscriberSet<E> {
    subscribers: Mutex<Arc<[(SubscriptionId, Callback<E>)]>>,
}

impl<E> SubscriberSet<E> {
    pub(crate) fn new() -> Self {
        let empty: Vec<(SubscriptionId, Callback<E>)> = Vec::new();
        Self {
            subscribers: Mutex::new(empty.into()),
        }
    }

    pub(crate) fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = SubscriptionId::next();
        let mut current = self.subscribers.lock();
        let mut next: Vec<_> = current.iter().cloned().collect();
        next.push((id, Arc::new(callback) as Callback<E>));
        *current = next.into();
        id
    }

    /// Removes a subscriber. Returns `false` if `id` was not registered here.
    pub(crate) fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut current = self.subscribers.lock();
        if !current.iter().any(|(sub, _)| *sub == id) {
            return false;
        }
        let next: Vec<_> = current
            .iter()
            .filter(|(sub, _)| *sub != id)
            .cloned()
            .collect();
        *current = next.into();
        true
    }

    pub(crate) fn len(&self) -> usize {
        self.subscribers.lock().len()
    }

    /// Invokes every callback registered at the moment of the call.
    pub(crate) fn emit(&self, event: &E) {
        let subscribers = Arc::clone(&*self.subscribers.lock());
        for (_, callback) in subscribers.iter() {
            callback(event);
        }
    }
}
