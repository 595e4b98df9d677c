//! Channel subscribers.
//!
//! Each subscriber owns the receiving end of a crossbeam channel. Sends never
//! block the mutating thread: a full bounded channel drops the event, and a
//! disconnected receiver is pruned on the next dispatch.

use crossbeam_channel::{Receiver, Sender, TrySendError};
use parking_lot::Mutex;

use super::events::ListEvent;

/// Receiving end handed to channel subscribers.
pub type ListEventReceiver<T> = Receiver<ListEvent<T>>;

/// Senders for every live channel subscriber of one list.
pub(crate) struct ChannelSinks<T> {
    senders: Mutex<Vec<Sender<ListEvent<T>>>>,
    capacity: Option<usize>,
}

impl<T: Clone> ChannelSinks<T> {
    pub(crate) fn new(capacity: Option<usize>) -> Self {
        Self {
            senders: Mutex::new(Vec::new()),
            capacity,
        }
    }

    pub(crate) fn subscribe(&self) -> ListEventReceiver<T> {
        let (sender, receiver) = match self.capacity {
            Some(capacity) => crossbeam_channel::bounded(capacity),
            None => crossbeam_channel::unbounded(),
        };
        self.senders.lock().push(sender);
        receiver
    }

    pub(crate) fn len(&self) -> usize {
        self.senders.lock().len()
    }

    /// Sends `events` in order to every subscriber.
    pub(crate) fn send_all(&self, list_name: &str, events: &[ListEvent<T>]) {
        let mut senders = self.senders.lock();
        if senders.is_empty() {
            return;
        }
        senders.retain(|sender| {
            for event in events {
                match sender.try_send(event.clone()) {
                    Ok(()) => {}
                    Err(TrySendError::Full(_)) => {
                        tracing::warn!(list = list_name, "event channel full, dropping event");
                    }
                    Err(TrySendError::Disconnected(_)) => {
                        tracing::debug!(list = list_name, "pruning disconnected event channel");
                        return false;
                    }
                }
            }
            true
        });
    }
}
