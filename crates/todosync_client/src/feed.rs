//! Broadcast feed for publishing state to subscribers.
//!
//! The store uses two feeds: one for snapshots and one for the busy
//! flag. Delivery is synchronous at publish time on the publisher's
//! task; channels are unbounded, so a slow subscriber never blocks a
//! publish. Every subscriber receives the same sequence of values.

use parking_lot::RwLock;
use std::sync::mpsc::{self, Receiver, Sender};

/// A broadcast feed of cloned values.
///
/// Dropping the returned receiver is the unsubscribe handle;
/// disconnected subscribers are pruned on the next publish.
pub struct Feed<T> {
    subscribers: RwLock<Vec<Sender<T>>>,
    latest: RwLock<Option<T>>,
}

impl<T: Clone> Feed<T> {
    /// Creates a feed with no subscribers.
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
            latest: RwLock::new(None),
        }
    }

    /// Subscribes to the feed.
    ///
    /// Returns a receiver that observes all future published values.
    pub fn subscribe(&self) -> Receiver<T> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.write().push(tx);
        rx
    }

    /// Publishes a value to all subscribers and records it as latest.
    pub fn publish(&self, value: T) {
        *self.latest.write() = Some(value.clone());

        let mut subscribers = self.subscribers.write();
        subscribers.retain(|tx| tx.send(value.clone()).is_ok());
    }

    /// Returns the most recently published value, if any.
    pub fn latest(&self) -> Option<T> {
        self.latest.read().clone()
    }

    /// Returns the number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }
}

impl<T: Clone> Default for Feed<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn publish_and_receive() {
        let feed = Feed::new();
        let rx = feed.subscribe();

        feed.publish(vec![1, 2, 3]);

        let received = rx.recv_timeout(Duration::from_millis(100)).unwrap();
        assert_eq!(received, vec![1, 2, 3]);
        assert_eq!(feed.latest(), Some(vec![1, 2, 3]));
    }

    #[test]
    fn all_subscribers_see_the_same_sequence() {
        let feed = Feed::new();
        let rx1 = feed.subscribe();
        let rx2 = feed.subscribe();

        feed.publish(1);
        feed.publish(2);

        assert_eq!(rx1.try_iter().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(rx2.try_iter().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn dropped_subscriber_is_pruned() {
        let feed = Feed::new();
        assert_eq!(feed.subscriber_count(), 0);

        let rx = feed.subscribe();
        let _rx2 = feed.subscribe();
        assert_eq!(feed.subscriber_count(), 2);

        drop(rx);
        feed.publish(1);
        assert_eq!(feed.subscriber_count(), 1);
    }

    #[test]
    fn late_subscriber_misses_earlier_values() {
        let feed = Feed::new();
        feed.publish(1);

        let rx = feed.subscribe();
        feed.publish(2);

        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![2]);
        assert_eq!(feed.latest(), Some(2));
    }

    #[test]
    fn latest_starts_empty() {
        let feed: Feed<i32> = Feed::new();
        assert_eq!(feed.latest(), None);
    }
}
