//! # Snapshots
//!
//! Immutable point-in-time copies of a list's contents. A snapshot is taken
//! under the list lock and read without it, so enumeration never observes a
//! list that changes mid-walk.

use std::ops::Deref;
use std::sync::Arc;

/// Immutable, fully materialized copy of a list's elements.
///
/// Cloning a snapshot is cheap: clones share the same buffer.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Snapshot<T> {
    items: Arc<[T]>,
}

impl<T> Snapshot<T> {
    pub(crate) fn from_vec(items: Vec<T>) -> Self {
        Self {
            items: items.into(),
        }
    }

    /// Returns the number of elements captured.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if nothing was captured.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the captured elements as a slice.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
        }
    }
}

impl<T> Deref for Snapshot<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self::from_vec(Vec::new())
    }
}

impl<'a, T> IntoIterator for &'a Snapshot<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Clone> IntoIterator for Snapshot<T> {
    type Item = T;
    type IntoIter = SnapshotIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        SnapshotIter {
            back: self.items.len(),
            items: self.items,
            front: 0,
        }
    }
}

/// Owning iterator over a [`Snapshot`], yielding cloned elements.
///
/// Holds no lock. Later mutations of the source list are not visible.
#[derive(Debug, Clone)]
pub struct SnapshotIter<T> {
    items: Arc<[T]>,
    front: usize,
    back: usize,
}

impl<T: Clone> Iterator for SnapshotIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        let item = self.items[self.front].clone();
        self.front += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T: Clone> DoubleEndedIterator for SnapshotIter<T> {
    fn next_back(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        Some(self.items[self.back].clone())
    }
}

impl<T: Clone> ExactSizeIterator for SnapshotIter<T> {}

impl<T: Clone> std::iter::FusedIterator for SnapshotIter<T> {}
