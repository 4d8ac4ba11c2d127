//! Fan-out of profile change notifications to subscribers.

use std::sync::Mutex;

use crossbeam_channel::{unbounded, Receiver, Sender};

use affinity_core::models::ProfileChange;

/// Publish/subscribe channel for profile mutations.
///
/// Every subscriber receives every change published after it subscribed.
/// Subscribers whose receiver was dropped are pruned on the next publish.
#[derive(Default)]
pub struct ChangeFeed {
    subscribers: Mutex<Vec<Sender<ProfileChange>>>,
}

impl ChangeFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Receiver<ProfileChange> {
        let (tx, rx) = unbounded();
        self.lock().push(tx);
        rx
    }

    /// Deliver `change` to every live subscriber. Returns how many received it.
    pub fn publish(&self, change: ProfileChange) -> usize {
        let mut subscribers = self.lock();
        subscribers.retain(|tx| tx.send(change.clone()).is_ok());
        subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Sender<ProfileChange>>> {
        // A panic while holding this lock cannot leave the sender list inconsistent.
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
