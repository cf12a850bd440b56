use crossbeam_channel::{unbounded, Receiver};
use log::debug;

/// FIFO of pending work items, populated once and then closed.
///
/// Workers call [`dequeue`](WorkQueue::dequeue) to claim the next item.
/// Because no items can arrive after construction, a drained queue is
/// indistinguishable from a finished one: `None` means the run is over for
/// that worker.
pub struct WorkQueue<T> {
    items: Receiver<T>,
    total: usize,
}

impl<T> WorkQueue<T> {
    /// Builds the queue from a collection of items.
    pub fn new(items: impl IntoIterator<Item = T>) -> Self {
        let (tx, rx) = unbounded();
        let mut total = 0;
        for item in items {
            // Receiver is held locally, so the channel cannot be disconnected yet.
            tx.send(item).expect("work queue receiver dropped during population");
            total += 1;
        }
        // Dropping the sender closes the queue: once drained, receivers see
        // a disconnect instead of blocking for items that will never come.
        drop(tx);
        debug!("{} items in work queue", total);
        Self { items: rx, total }
    }

    /// Claims the next item, or `None` once the queue is drained.
    ///
    /// Blocks only while another worker is mid-claim; never waits for new
    /// producers, since there are none after construction.
    pub fn dequeue(&self) -> Option<T> {
        self.items.recv().ok()
    }

    /// Total items enqueued at construction.
    pub fn total(&self) -> usize {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use std::thread;

    #[test]
    fn delivers_in_order_to_a_single_consumer() {
        let queue = WorkQueue::new(vec![1, 2, 3]);
        assert_eq!(queue.total(), 3);
        assert_eq!(queue.dequeue(), Some(1));
        assert_eq!(queue.dequeue(), Some(2));
        assert_eq!(queue.dequeue(), Some(3));
        assert_eq!(queue.dequeue(), None);
    }

    #[test]
    fn empty_queue_reports_drained_immediately() {
        let queue: WorkQueue<i32> = WorkQueue::new(Vec::new());
        assert_eq!(queue.total(), 0);
        assert_eq!(queue.dequeue(), None);
    }

    #[test]
    fn each_item_claimed_exactly_once_across_threads() {
        let queue = WorkQueue::new(0..1000);
        let claimed = Mutex::new(Vec::new());

        thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    while let Some(item) = queue.dequeue() {
                        claimed.lock().unwrap().push(item);
                    }
                });
            }
        });

        let claimed = claimed.into_inner().unwrap();
        assert_eq!(claimed.len(), 1000);
        let unique: HashSet<_> = claimed.iter().copied().collect();
        assert_eq!(unique.len(), 1000);
    }
}
