//! # STRAND Core
//!
//! Observable concurrent doubly-linked list designed for:
//! - Many concurrent readers, one writer at a time
//! - Stable element handles that survive unrelated mutations
//! - Change notifications that are safe to react to from any thread
//!
//! ## Architecture Rules
//!
//! 1. **Snapshot, unlock, then notify** - observers never run under the list lock
//! 2. **Handles are addresses, not pointers** - `(list id, slot, generation)`
//! 3. **Resets only** - a collection change always means "re-read everything"
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use strand_core::{ConcurrentList, ListEvent};
//!
//! let list = Arc::new(ConcurrentList::new());
//! let events = list.subscribe_channel();
//!
//! let observed = Arc::clone(&list);
//! list.subscribe_property_changed(move |change| {
//!     // Re-entering the list from a handler is allowed.
//!     assert_eq!(observed.len(), change.count);
//! });
//!
//! list.push_back("lisbon");
//! assert!(matches!(events.try_recv(), Ok(ListEvent::PropertyChanged(_))));
//! assert!(matches!(events.try_recv(), Ok(ListEvent::CollectionChanged(_))));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod list;
pub mod notify;
pub mod snapshot;

pub use config::ListConfig;
pub use error::{ListError, ListResult};
pub use list::{ConcurrentList, ListId, NodeHandle};
pub use notify::{
    CollectionChangeAction, CollectionChanged, ListEvent, ListEventReceiver, PropertyChanged,
    SubscriptionId, COUNT_PROPERTY,
};
pub use snapshot::{Snapshot, SnapshotIter};
