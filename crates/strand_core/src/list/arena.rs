//! # Node Arena
//!
//! Slot storage for the doubly-linked sequence. Links are slot indices, not
//! pointers, so the whole structure is safe Rust and a node can be addressed
//! by `(slot, generation)` from a [`NodeHandle`](super::NodeHandle).
//!
//! A slot whose generation would wrap past `u32::MAX` is retired instead of
//! being reused, so an old address can never become live again.

use std::collections::TryReserveError;

/// Sentinel for "no slot".
const NIL: u32 = u32::MAX;

/// One arena cell. `value` is `None` while the slot sits on the free list
/// or has been retired.
#[derive(Debug)]
struct Slot<T> {
    value: Option<T>,
    prev: u32,
    next: u32,
    generation: u32,
}

/// Address of a live node.
pub(crate) type SlotRef = (u32, u32);

/// A doubly-linked list laid out in a slot arena.
///
/// # Thread Safety
///
/// This arena is NOT thread-safe. [`ConcurrentList`](crate::ConcurrentList)
/// wraps it in a reader/writer lock.
#[derive(Debug)]
pub(crate) struct NodeArena<T> {
    slots: Vec<Slot<T>>,
    /// Free list - indices of vacant slots.
    free_list: Vec<u32>,
    head: u32,
    tail: u32,
    len: usize,
    /// Bumped by every committed mutation.
    version: u64,
}

impl<T> NodeArena<T> {
    /// Creates an empty arena without reserving storage.
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            head: NIL,
            tail: NIL,
            len: 0,
            version: 0,
        }
    }

    /// Creates an empty arena with room for `capacity` nodes.
    ///
    /// Fails instead of panicking when the reservation cannot be satisfied.
    pub(crate) fn try_with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        let mut arena = Self::new();
        arena.slots.try_reserve_exact(capacity)?;
        Ok(arena)
    }

    #[inline]
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    /// Number of committed mutations so far.
    #[inline]
    pub(crate) const fn version(&self) -> u64 {
        self.version
    }

    /// Checks that `slot` holds a value of the given generation.
    #[inline]
    pub(crate) fn is_live(&self, (slot, generation): SlotRef) -> bool {
        self.slots
            .get(slot as usize)
            .is_some_and(|s| s.generation == generation && s.value.is_some())
    }

    /// Appends `value` as the new tail.
    pub(crate) fn push_back(&mut self, value: T) -> SlotRef {
        let slot = self.allocate(value);
        self.link_after_tail(slot);
        self.version += 1;
        (slot, self.slots[slot as usize].generation)
    }

    /// Inserts `value` immediately before the live node `anchor`.
    ///
    /// The caller must have checked `anchor` with [`NodeArena::is_live`].
    pub(crate) fn insert_before(&mut self, anchor: SlotRef, value: T) -> SlotRef {
        debug_assert!(self.is_live(anchor), "insert_before on a dead anchor");
        let slot = self.allocate(value);
        let anchor = anchor.0;
        let prev = self.slots[anchor as usize].prev;

        {
            let node = &mut self.slots[slot as usize];
            node.prev = prev;
            node.next = anchor;
        }
        self.slots[anchor as usize].prev = slot;
        if prev == NIL {
            self.head = slot;
        } else {
            self.slots[prev as usize].next = slot;
        }
        self.len += 1;
        self.version += 1;

        (slot, self.slots[slot as usize].generation)
    }

    /// Unlinks a live node and returns its value, or `None` if the address is
    /// stale.
    pub(crate) fn remove(&mut self, at: SlotRef) -> Option<T> {
        if !self.is_live(at) {
            return None;
        }
        let slot = at.0;
        let (prev, next) = {
            let node = &self.slots[slot as usize];
            (node.prev, node.next)
        };

        if prev == NIL {
            self.head = next;
        } else {
            self.slots[prev as usize].next = next;
        }
        if next == NIL {
            self.tail = prev;
        } else {
            self.slots[next as usize].prev = prev;
        }

        let node = &mut self.slots[slot as usize];
        node.prev = NIL;
        node.next = NIL;
        let value = node.value.take();
        if let Some(generation) = node.generation.checked_add(1) {
            node.generation = generation;
            self.free_list.push(slot);
        }
        self.len -= 1;
        self.version += 1;
        value
    }

    /// Empties the arena and returns the removed values in sequence order.
    ///
    /// Every slot generation is bumped, so all previously issued addresses
    /// become stale. Storage is kept for reuse, except for slots whose
    /// generation is exhausted.
    pub(crate) fn drain(&mut self) -> Vec<T> {
        let mut values = Vec::with_capacity(self.len);
        let mut cursor = self.head;
        while cursor != NIL {
            let node = &mut self.slots[cursor as usize];
            cursor = node.next;
            if let Some(value) = node.value.take() {
                values.push(value);
            }
        }

        self.free_list.clear();
        for (index, slot) in self.slots.iter_mut().enumerate().rev() {
            slot.prev = NIL;
            slot.next = NIL;
            if let Some(generation) = slot.generation.checked_add(1) {
                slot.generation = generation;
                // `allocate` never lets the slot count reach NIL.
                #[allow(clippy::cast_possible_truncation)]
                let index = index as u32;
                self.free_list.push(index);
            }
        }
        self.head = NIL;
        self.tail = NIL;
        self.len = 0;
        self.version += 1;
        values
    }

    /// Walks from the head to the zero-based position `index`.
    pub(crate) fn nth(&self, index: usize) -> Option<SlotRef> {
        if index >= self.len {
            return None;
        }
        let mut cursor = self.head;
        for _ in 0..index {
            cursor = self.slots[cursor as usize].next;
        }
        self.slot_ref(cursor)
    }

    #[inline]
    pub(crate) fn first(&self) -> Option<SlotRef> {
        self.slot_ref(self.head)
    }

    #[inline]
    pub(crate) fn last(&self) -> Option<SlotRef> {
        self.slot_ref(self.tail)
    }

    /// Returns the node after a live node.
    pub(crate) fn next(&self, at: SlotRef) -> Option<SlotRef> {
        if !self.is_live(at) {
            return None;
        }
        self.slot_ref(self.slots[at.0 as usize].next)
    }

    /// Returns the node before a live node.
    pub(crate) fn prev(&self, at: SlotRef) -> Option<SlotRef> {
        if !self.is_live(at) {
            return None;
        }
        self.slot_ref(self.slots[at.0 as usize].prev)
    }

    /// Gets a reference to a live node's value.
    #[inline]
    pub(crate) fn get(&self, at: SlotRef) -> Option<&T> {
        if !self.is_live(at) {
            return None;
        }
        self.slots[at.0 as usize].value.as_ref()
    }

    /// Iterates values in sequence order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            if cursor == NIL {
                return None;
            }
            let node = &self.slots[cursor as usize];
            cursor = node.next;
            node.value.as_ref()
        })
    }

    fn slot_ref(&self, slot: u32) -> Option<SlotRef> {
        if slot == NIL {
            return None;
        }
        Some((slot, self.slots[slot as usize].generation))
    }

    /// Stores `value` in a vacant slot, reusing freed slots first.
    fn allocate(&mut self, value: T) -> u32 {
        if let Some(slot) = self.free_list.pop() {
            let node = &mut self.slots[slot as usize];
            node.value = Some(value);
            node.prev = NIL;
            node.next = NIL;
            return slot;
        }

        assert!(
            self.slots.len() < NIL as usize,
            "node arena exhausted: {} slots in use",
            self.slots.len()
        );
        // Checked against NIL above.
        #[allow(clippy::cast_possible_truncation)]
        let slot = self.slots.len() as u32;
        self.slots.push(Slot {
            value: Some(value),
            prev: NIL,
            next: NIL,
            generation: 0,
        });
        slot
    }

    fn link_after_tail(&mut self, slot: u32) {
        let tail = self.tail;
        self.slots[slot as usize].prev = tail;
        if tail == NIL {
            self.head = slot;
        } else {
            self.slots[tail as usize].next = slot;
        }
        self.tail = slot;
        self.len += 1;
    }
}

impl<T: Clone> NodeArena<T> {
    /// Copies all values in sequence order.
    pub(crate) fn to_vec(&self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.len);
        out.extend(self.iter().cloned());
        out
    }
}
