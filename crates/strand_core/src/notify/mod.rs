//! # Change Notification
//!
//! Fan-out of committed mutations to external observers.
//!
//! ```text
//!   mutation ──> [write lock] apply + snapshot [unlock] ──> Notifier::publish
//!                                                              │
//!                       ┌──────────────────────┬───────────────┴──────┐
//!                       ▼                      ▼                      ▼
//!               PropertyChanged         CollectionChanged       channel sinks
//!                  callbacks           (Reset) callbacks        (both, per mutation)
//! ```
//!
//! The notifier never sees the list lock. Every call into it happens after
//! the guard has been dropped, so two publishes racing on different threads
//! may interleave. The `version` stamped on each event is the commit order.

mod channel;
mod events;
mod registry;

pub use channel::ListEventReceiver;
pub use events::{
    CollectionChangeAction, CollectionChanged, ListEvent, PropertyChanged, COUNT_PROPERTY,
};
pub use registry::SubscriptionId;

use channel::ChannelSinks;
use registry::SubscriberSet;

use crate::list::ListId;
use crate::snapshot::Snapshot;

/// All observers of one list.
pub(crate) struct Notifier<T> {
    pub(crate) property: SubscriberSet<PropertyChanged>,
    pub(crate) collection: SubscriberSet<CollectionChanged<T>>,
    pub(crate) channels: ChannelSinks<T>,
}

impl<T: Clone> Notifier<T> {
    pub(crate) fn new(channel_capacity: Option<usize>) -> Self {
        Self {
            property: SubscriberSet::new(),
            collection: SubscriberSet::new(),
            channels: ChannelSinks::new(channel_capacity),
        }
    }

    /// Number of registered callbacks and channels across both streams.
    pub(crate) fn observer_count(&self) -> usize {
        self.property.len() + self.collection.len() + self.channels.len()
    }

    /// Raises the size-changed notification, then the reset notification.
    ///
    /// `version` must be the arena version read in the same critical section
    /// that captured `snapshot`.
    pub(crate) fn publish(
        &self,
        list: ListId,
        list_name: &str,
        version: u64,
        snapshot: Snapshot<T>,
    ) {
        let property = PropertyChanged {
            list,
            property: COUNT_PROPERTY,
            count: snapshot.len(),
            version,
        };
        let collection = CollectionChanged {
            list,
            action: CollectionChangeAction::Reset,
            version,
            snapshot,
        };

        self.property.emit(&property);
        self.collection.emit(&collection);
        self.channels.send_all(
            list_name,
            &[
                ListEvent::PropertyChanged(property),
                ListEvent::CollectionChanged(collection),
            ],
        );
    }
}
