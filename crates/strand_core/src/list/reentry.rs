//! Per-thread record of held list locks.
//!
//! `parking_lot::RwLock` is not reentrant: a thread that re-acquires a lock
//! it already holds deadlocks (write) or may deadlock behind a queued writer
//! (read). Every acquisition registers here first so that reentry panics
//! with a message instead of hanging.

use std::cell::RefCell;

use super::handle::ListId;

thread_local! {
    static HELD: RefCell<Vec<ListId>> = const { RefCell::new(Vec::new()) };
}

/// Marks one list lock as held by the current thread until dropped.
pub(crate) struct HeldLock {
    id: ListId,
}

impl HeldLock {
    /// Registers `id` as held.
    ///
    /// # Panics
    ///
    /// Panics if the current thread already holds the lock of list `id`.
    pub(crate) fn enter(id: ListId, mode: &'static str) -> Self {
        HELD.with(|held| {
            let mut held = held.borrow_mut();
            assert!(
                !held.contains(&id),
                "recursive {mode} acquisition of {id} lock on the same thread"
            );
            held.push(id);
        });
        Self { id }
    }
}

impl Drop for HeldLock {
    fn drop(&mut self) {
        let id = self.id;
        // Thread-local storage may already be gone during thread teardown.
        let _ = HELD.try_with(|held| {
            let mut held = held.borrow_mut();
            if let Some(pos) = held.iter().rposition(|h| *h == id) {
                held.swap_remove(pos);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_allows_reacquire() {
        let id = ListId::next();
        drop(HeldLock::enter(id, "shared"));
        drop(HeldLock::enter(id, "exclusive"));
    }

    #[test]
    fn test_distinct_lists_nest() {
        let a = HeldLock::enter(ListId::next(), "shared");
        let b = HeldLock::enter(ListId::next(), "exclusive");
        drop(a);
        drop(b);
    }

    #[test]
    #[should_panic(expected = "recursive exclusive acquisition")]
    fn test_reentry_panics() {
        let id = ListId::next();
        let _outer = HeldLock::enter(id, "shared");
        let _inner = HeldLock::enter(id, "exclusive");
    }
}
