//! # Node Handles
//!
//! Handles are lightweight identifiers consisting of:
//! - The identity of the list that issued them
//! - A slot index into that list's node arena
//! - A generation counter for detecting removed positions

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of one [`ConcurrentList`](crate::ConcurrentList) instance.
///
/// Ids are never reused within a process. Zero is reserved for the null
/// handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ListId(u64);

static NEXT_LIST_ID: AtomicU64 = AtomicU64::new(1);

impl ListId {
    /// The id carried by [`NodeHandle::NULL`].
    pub const NONE: Self = Self(0);

    /// Allocates a fresh, process-unique id.
    pub(crate) fn next() -> Self {
        Self(NEXT_LIST_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw id value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "list#{}", self.0)
    }
}

/// Opaque reference to one position in one list.
///
/// A handle stays valid until its position is removed. Removal bumps the
/// slot generation, so a stale handle is detected even after the slot has
/// been reused by a later insertion. Generations are `u32` and never wrap:
/// a slot that has been through `u32::MAX` removals is retired for the
/// life of the list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeHandle {
    list: ListId,
    slot: u32,
    generation: u32,
}

impl NodeHandle {
    /// The absent handle.
    pub const NULL: Self = Self {
        list: ListId::NONE,
        slot: u32::MAX,
        generation: u32::MAX,
    };

    #[inline]
    pub(crate) const fn new(list: ListId, slot: u32, generation: u32) -> Self {
        Self {
            list,
            slot,
            generation,
        }
    }

    /// Returns the id of the list that issued this handle.
    #[inline]
    #[must_use]
    pub const fn list_id(self) -> ListId {
        self.list
    }

    #[inline]
    pub(crate) const fn slot(self) -> u32 {
        self.slot
    }

    #[inline]
    pub(crate) const fn generation(self) -> u32 {
        self.generation
    }

    /// Checks if this is the absent handle.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.list.0 == ListId::NONE.0
    }
}

impl Default for NodeHandle {
    fn default() -> Self {
        Self::NULL
    }
}
