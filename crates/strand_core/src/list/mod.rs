//! # Concurrent List
//!
//! A doubly-linked list guarded by a reader/writer lock.
//!
//! ## Lock Discipline
//!
//! ```text
//!   queries:    read lock ──> read ──> unlock
//!   mutations:  write lock ──> apply ──> snapshot ──> unlock ──> notify
//! ```
//!
//! - Any number of queries run in parallel; a mutation excludes everything.
//! - Observers run strictly after the write lock is released, so a callback
//!   may call back into the list, even on the mutating thread.
//! - No user code runs under the lock except `T::clone` while snapshotting.
//!   Removed values are dropped after unlocking.
//! - Reentrant acquisition by the same thread is a programming error and
//!   panics (see `reentry`).
//!
//! ## Fairness
//!
//! The lock is `parking_lot::RwLock`, which is task-fair: once a writer is
//! waiting, new readers queue behind it, so a stream of readers cannot
//! starve a writer and vice versa.

mod arena;
mod handle;
mod reentry;

pub use handle::{ListId, NodeHandle};

use std::fmt;

use parking_lot::RwLock;

use arena::{NodeArena, SlotRef};
use reentry::HeldLock;

use crate::config::ListConfig;
use crate::error::{ListError, ListResult};
use crate::notify::{
    CollectionChanged, ListEventReceiver, Notifier, PropertyChanged, SubscriptionId,
};
use crate::snapshot::{Snapshot, SnapshotIter};

/// Thread-safe doubly-linked list with stable handles and reset notifications.
///
/// Share it between threads with `Arc<ConcurrentList<T>>`.
///
/// ## Usage
///
/// ```rust
/// use strand_core::ConcurrentList;
///
/// let list = ConcurrentList::new();
/// list.push_back(1);
/// list.push_back(2);
///
/// let two = list.node_at(1).unwrap().unwrap();
/// let ninety_nine = list.insert_before(two, 99).unwrap();
/// list.remove(two);
///
/// assert_eq!(list.to_vec(), vec![1, 99]);
/// assert_eq!(list.get(ninety_nine), Some(99));
/// ```
pub struct ConcurrentList<T> {
    id: ListId,
    name: String,
    nodes: RwLock<NodeArena<T>>,
    notifier: Notifier<T>,
}

impl<T: Clone> ConcurrentList<T> {
    /// Creates an empty list with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::build(ListConfig::default(), NodeArena::new())
    }

    /// Creates an empty list from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::InvalidConfig`] if `config` fails validation or
    /// its `initial_capacity` cannot be reserved.
    pub fn with_config(config: ListConfig) -> ListResult<Self> {
        config.validate()?;
        let nodes = NodeArena::try_with_capacity(config.initial_capacity).map_err(|err| {
            ListError::InvalidConfig(format!(
                "initial_capacity {} cannot be reserved: {err}",
                config.initial_capacity
            ))
        })?;
        Ok(Self::build(config, nodes))
    }

    fn build(config: ListConfig, nodes: NodeArena<T>) -> Self {
        let id = ListId::next();
        tracing::debug!(
            list = %config.name,
            id = id.get(),
            initial_capacity = config.initial_capacity,
            "list created"
        );
        Self {
            id,
            nodes: RwLock::new(nodes),
            notifier: Notifier::new(config.channel_capacity),
            name: config.name,
        }
    }

    /// Returns the identity that handles issued by this list are bound to.
    #[inline]
    #[must_use]
    pub fn id(&self) -> ListId {
        self.id
    }

    /// Returns the configured name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    // ========================================================================
    // Queries (shared access)
    // ========================================================================

    /// Returns the current element count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read(NodeArena::len)
    }

    /// Returns `true` if the list holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the handle at zero-based position `index`, walking from the
    /// head. Linear in `index`.
    ///
    /// Returns `Ok(None)` if `index` is past the end.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::InvalidArgument`] if `index` is negative (or
    /// otherwise not representable as a position).
    pub fn node_at<I>(&self, index: I) -> ListResult<Option<NodeHandle>>
    where
        I: TryInto<usize> + fmt::Display + Copy,
    {
        let position: usize = index.try_into().map_err(|_| ListError::InvalidArgument {
            name: "index",
            reason: format!("must be a non-negative position, got {index}"),
        })?;
        Ok(self.read(|nodes| nodes.nth(position)).map(|at| self.handle(at)))
    }

    /// Returns a copy of the value at `handle`.
    ///
    /// Returns `None` for the null handle, a handle issued by another list,
    /// or a handle whose position was removed.
    #[must_use]
    pub fn get(&self, handle: NodeHandle) -> Option<T> {
        let at = self.own(handle)?;
        self.read(|nodes| nodes.get(at).cloned())
    }

    /// Returns `true` if `handle` refers to a live position of this list.
    #[must_use]
    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.own(handle)
            .is_some_and(|at| self.read(|nodes| nodes.is_live(at)))
    }

    /// Returns the handle of the head element.
    #[must_use]
    pub fn first(&self) -> Option<NodeHandle> {
        self.read(NodeArena::first).map(|at| self.handle(at))
    }

    /// Returns the handle of the tail element.
    #[must_use]
    pub fn last(&self) -> Option<NodeHandle> {
        self.read(NodeArena::last).map(|at| self.handle(at))
    }

    /// Returns the handle after `handle`, or `None` at the tail or for an
    /// invalid handle.
    #[must_use]
    pub fn next(&self, handle: NodeHandle) -> Option<NodeHandle> {
        let at = self.own(handle)?;
        self.read(|nodes| nodes.next(at)).map(|at| self.handle(at))
    }

    /// Returns the handle before `handle`, or `None` at the head or for an
    /// invalid handle.
    #[must_use]
    pub fn prev(&self, handle: NodeHandle) -> Option<NodeHandle> {
        let at = self.own(handle)?;
        self.read(|nodes| nodes.prev(at)).map(|at| self.handle(at))
    }

    /// Returns the commit version: the number of mutations applied so far.
    ///
    /// Matches the `version` carried by the notifications of the most
    /// recent mutation.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.read(NodeArena::version)
    }

    /// Copies the full sequence under shared access.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot<T> {
        Snapshot::from_vec(self.read(NodeArena::to_vec))
    }

    /// Copies the full sequence into a `Vec`.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.read(NodeArena::to_vec)
    }

    /// Iterates a snapshot taken at the moment of the call.
    ///
    /// No lock is held while iterating. Mutations made after the call are
    /// not visible; call `iter` again to observe them.
    #[must_use]
    pub fn iter(&self) -> SnapshotIter<T> {
        self.snapshot().into_iter()
    }

    // ========================================================================
    // Mutations (exclusive access, notify after unlock)
    // ========================================================================

    /// Appends `value` as the new tail and returns its handle.
    pub fn push_back(&self, value: T) -> NodeHandle {
        let (at, version, snapshot) = self.write(|nodes| {
            let at = nodes.push_back(value);
            (at, nodes.version(), Snapshot::from_vec(nodes.to_vec()))
        });

        tracing::trace!(list = %self.name, version, len = snapshot.len(), "push_back");
        self.notifier.publish(self.id, &self.name, version, snapshot);
        self.handle(at)
    }

    /// Inserts `value` immediately before `anchor` and returns the new
    /// element's handle.
    ///
    /// # Errors
    ///
    /// - [`ListError::NullArgument`] if `anchor` is [`NodeHandle::NULL`].
    /// - [`ListError::InvalidOperation`] if `anchor` was issued by another
    ///   list or its position has been removed. Nothing is inserted.
    pub fn insert_before(&self, anchor: NodeHandle, value: T) -> ListResult<NodeHandle> {
        if anchor.is_null() {
            return Err(ListError::NullArgument("anchor"));
        }

        let outcome = self.write(|nodes| {
            if anchor.list_id() != self.id {
                return Err((
                    ListError::InvalidOperation(format!(
                        "handle belongs to {}, not {}",
                        anchor.list_id(),
                        self.id
                    )),
                    value,
                ));
            }
            let anchor_at = (anchor.slot(), anchor.generation());
            if !nodes.is_live(anchor_at) {
                return Err((
                    ListError::InvalidOperation(
                        "handle refers to a removed position".to_string(),
                    ),
                    value,
                ));
            }
            let at = nodes.insert_before(anchor_at, value);
            Ok((at, nodes.version(), Snapshot::from_vec(nodes.to_vec())))
        });

        // A rejected value is dropped here, outside the lock.
        let (at, version, snapshot) = outcome.map_err(|(err, _value)| err)?;

        tracing::trace!(list = %self.name, version, len = snapshot.len(), "insert_before");
        self.notifier.publish(self.id, &self.name, version, snapshot);
        Ok(self.handle(at))
    }

    /// Removes the element at `target`.
    ///
    /// The null handle, a handle from another list, or a handle whose
    /// position was already removed is a silent no-op that raises no
    /// notification. Returns `true` if an element was removed.
    pub fn remove(&self, target: NodeHandle) -> bool {
        if target.is_null() {
            return false;
        }

        let (removed, version, snapshot) = self.write(|nodes| {
            let removed = if target.list_id() == self.id {
                nodes.remove((target.slot(), target.generation()))
            } else {
                None
            };
            (removed, nodes.version(), Snapshot::from_vec(nodes.to_vec()))
        });

        let Some(value) = removed else {
            return false;
        };
        drop(value);

        tracing::trace!(list = %self.name, version, len = snapshot.len(), "remove");
        self.notifier.publish(self.id, &self.name, version, snapshot);
        true
    }

    /// Removes every element.
    ///
    /// Always raises both notifications, even if the list was already empty.
    /// Every previously issued handle becomes invalid.
    pub fn clear(&self) {
        let (drained, version) = self.write(|nodes| {
            let drained = nodes.drain();
            (drained, nodes.version())
        });
        let removed = drained.len();
        drop(drained);

        tracing::trace!(list = %self.name, version, removed, "clear");
        self.notifier
            .publish(self.id, &self.name, version, Snapshot::default());
    }

    /// Appends every value in order inside one critical section.
    ///
    /// The source iterator is drained before the lock is taken. Raises the
    /// notification pair once, and only if at least one value was appended.
    pub fn extend<I>(&self, values: I)
    where
        I: IntoIterator<Item = T>,
    {
        let values: Vec<T> = values.into_iter().collect();
        if values.is_empty() {
            return;
        }
        let appended = values.len();

        let (version, snapshot) = self.write(|nodes| {
            for value in values {
                nodes.push_back(value);
            }
            (nodes.version(), Snapshot::from_vec(nodes.to_vec()))
        });

        tracing::trace!(list = %self.name, version, appended, len = snapshot.len(), "extend");
        self.notifier.publish(self.id, &self.name, version, snapshot);
    }

    // ========================================================================
    // Observers
    // ========================================================================

    /// Registers a callback for size changes (property [`COUNT_PROPERTY`]).
    ///
    /// [`COUNT_PROPERTY`]: crate::COUNT_PROPERTY
    pub fn subscribe_property_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&PropertyChanged) + Send + Sync + 'static,
    {
        let id = self.notifier.property.subscribe(callback);
        tracing::debug!(list = %self.name, subscription = %id, "property observer added");
        id
    }

    /// Removes a size-change callback. Returns `false` if `id` is unknown.
    pub fn unsubscribe_property_changed(&self, id: SubscriptionId) -> bool {
        let removed = self.notifier.property.unsubscribe(id);
        tracing::debug!(list = %self.name, subscription = %id, removed, "property observer removed");
        removed
    }

    /// Registers a callback for collection resets.
    pub fn subscribe_collection_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&CollectionChanged<T>) + Send + Sync + 'static,
    {
        let id = self.notifier.collection.subscribe(callback);
        tracing::debug!(list = %self.name, subscription = %id, "collection observer added");
        id
    }

    /// Removes a collection-reset callback. Returns `false` if `id` is unknown.
    pub fn unsubscribe_collection_changed(&self, id: SubscriptionId) -> bool {
        let removed = self.notifier.collection.unsubscribe(id);
        tracing::debug!(list = %self.name, subscription = %id, removed, "collection observer removed");
        removed
    }

    /// Opens a channel that receives both notification streams.
    ///
    /// The two events of one mutation arrive property first, then reset.
    /// Events of mutations committed by different threads may arrive out of
    /// commit order; compare [`ListEvent::version`] and keep the highest.
    /// Dropping the receiver unsubscribes it.
    ///
    /// [`ListEvent::version`]: crate::ListEvent::version
    #[must_use]
    pub fn subscribe_channel(&self) -> ListEventReceiver<T> {
        tracing::debug!(list = %self.name, "channel observer added");
        self.notifier.channels.subscribe()
    }

    /// Returns the number of registered callbacks and channels.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.notifier.observer_count()
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn read<R>(&self, f: impl FnOnce(&NodeArena<T>) -> R) -> R {
        let _held = HeldLock::enter(self.id, "shared");
        let nodes = self.nodes.read();
        f(&nodes)
    }

    fn write<R>(&self, f: impl FnOnce(&mut NodeArena<T>) -> R) -> R {
        let _held = HeldLock::enter(self.id, "exclusive");
        let mut nodes = self.nodes.write();
        f(&mut nodes)
    }

    /// Converts a handle of this list into an arena address.
    fn own(&self, handle: NodeHandle) -> Option<SlotRef> {
        (!handle.is_null() && handle.list_id() == self.id)
            .then(|| (handle.slot(), handle.generation()))
    }

    fn handle(&self, (slot, generation): SlotRef) -> NodeHandle {
        NodeHandle::new(self.id, slot, generation)
    }
}

impl<T: Clone> Default for ConcurrentList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> FromIterator<T> for ConcurrentList<T> {
    /// Builds a populated list. No notification is raised: a list under
    /// construction has no observers.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let values: Vec<T> = iter.into_iter().collect();
        let list = Self::new();
        list.write(|nodes| {
            for value in values {
                nodes.push_back(value);
            }
        });
        list
    }
}

impl<'a, T: Clone> IntoIterator for &'a ConcurrentList<T> {
    type Item = T;
    type IntoIter = SnapshotIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for ConcurrentList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcurrentList")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("items", &self.snapshot().as_slice())
            .finish()
    }
}
