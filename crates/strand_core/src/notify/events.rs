//! Change notifications raised by a list after each committed mutation.
//!
//! Both streams are coarse. A collection change is always a reset: it says
//! "re-read everything" and never describes which element moved.
//!
//! Events are dispatched after the list lock is released, so notifications
//! for mutations committed on different threads can reach an observer out
//! of commit order. Every event carries the list `version` assigned inside
//! the critical section: versions increase strictly with commit order, and
//! both events of one mutation share a version. Observers that track state
//! should keep the highest version seen and discard anything lower.

use crate::list::ListId;
use crate::snapshot::Snapshot;

/// Property name carried by size-change notifications.
pub const COUNT_PROPERTY: &str = "Count";

/// What happened to the collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum CollectionChangeAction {
    /// Contents changed arbitrarily; observers must re-read the collection.
    Reset,
}

/// Raised after every committed mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectionChanged<T> {
    /// List that raised the event.
    pub list: ListId,
    /// Always [`CollectionChangeAction::Reset`].
    pub action: CollectionChangeAction,
    /// Commit version of the mutation that raised the event.
    pub version: u64,
    /// Contents captured inside the critical section of the mutation.
    pub snapshot: Snapshot<T>,
}

/// Raised when a mutation is believed to change a list property.
///
/// Only [`COUNT_PROPERTY`] is ever raised. Notifications may be spurious,
/// e.g. clearing an already-empty list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PropertyChanged {
    /// List that raised the event.
    pub list: ListId,
    /// Name of the changed property.
    pub property: &'static str,
    /// Element count captured inside the critical section.
    pub count: usize,
    /// Commit version of the mutation that raised the event.
    pub version: u64,
}

/// Both notification streams merged, as delivered to channel subscribers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListEvent<T> {
    /// A property changed.
    PropertyChanged(PropertyChanged),
    /// The collection was reset.
    CollectionChanged(CollectionChanged<T>),
}

impl<T> ListEvent<T> {
    /// Returns the id of the list that raised the event.
    #[must_use]
    pub fn list(&self) -> ListId {
        match self {
            Self::PropertyChanged(e) => e.list,
            Self::CollectionChanged(e) => e.list,
        }
    }

    /// Returns the commit version of the mutation that raised the event.
    #[must_use]
    pub fn version(&self) -> u64 {
        match self {
            Self::PropertyChanged(e) => e.version,
            Self::CollectionChanged(e) => e.version,
        }
    }
}
