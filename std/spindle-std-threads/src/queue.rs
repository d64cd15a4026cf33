//!
//! Message Queue
//!
//! An optionally bounded FIFO shared by any number of posting threads and a
//! single consuming thread. Pushing never blocks: a full queue rejects the
//! item and hands it back. Popping blocks until an item arrives or the
//! queue is closed and drained.
//!
//! `close_with` appends one final item regardless of capacity and closes the
//! queue in the same critical section, so nothing can be queued behind it.
//!

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// A rejected push. The item is returned to the caller.
#[derive(Debug, PartialEq, Eq)]
pub enum PushError<T> {
    Full(T),
    Closed(T),
}

impl<T> PushError<T> {
    pub fn into_inner(self) -> T {
        match self {
            PushError::Full(item) | PushError::Closed(item) => item,
        }
    }
}

struct QueueInner<T> {
    buffer: VecDeque<T>,
    closed: bool,
}

pub struct MessageQueue<T> {
    inner: Mutex<QueueInner<T>>,
    not_empty: Condvar,
    capacity: Option<usize>,
}

impl<T> MessageQueue<T> {
    pub fn unbounded() -> Self {
        Self::with_capacity(None)
    }

    /// A queue holding at most `capacity` items (a zero capacity is treated as one)
    pub fn bounded(capacity: usize) -> Self {
        Self::with_capacity(Some(capacity))
    }

    pub fn with_capacity(capacity: Option<usize>) -> Self {
        let capacity = capacity.map(|c| c.max(1));
        Self {
            inner: Mutex::new(QueueInner {
                buffer: VecDeque::with_capacity(capacity.unwrap_or(0).min(64)),
                closed: false,
            }),
            not_empty: Condvar::new(),
            capacity,
        }
    }

    fn lock(&self) -> MutexGuard<'_, QueueInner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Append at the tail
    pub fn push(&self, item: T) -> Result<(), PushError<T>> {
        let mut inner = self.lock();
        if inner.closed {
            return Err(PushError::Closed(item));
        }
        if let Some(capacity) = self.capacity {
            if inner.buffer.len() >= capacity {
                return Err(PushError::Full(item));
            }
        }
        inner.buffer.push_back(item);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Append `last` ignoring the capacity bound, then close.
    /// Returns false (dropping `last`) if the queue was already closed.
    pub fn close_with(&self, last: T) -> bool {
        let mut inner = self.lock();
        if inner.closed {
            return false;
        }
        inner.buffer.push_back(last);
        inner.closed = true;
        self.not_empty.notify_all();
        true
    }

    /// Close without a final item; waiting consumers wake and drain
    pub fn close(&self) -> bool {
        let mut inner = self.lock();
        let was_open = !inner.closed;
        inner.closed = true;
        self.not_empty.notify_all();
        was_open
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Block until an item is available. `None` once closed and empty.
    pub fn pop(&self) -> Option<T> {
        let mut inner = self.lock();
        while inner.buffer.is_empty() && !inner.closed {
            inner = self
                .not_empty
                .wait(inner)
                .unwrap_or_else(PoisonError::into_inner);
        }
        inner.buffer.pop_front()
    }

    /// Take everything queued without waiting
    pub fn drain(&self) -> Vec<T> {
        self.lock().buffer.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().buffer.is_empty()
    }
}

impl<T> Default for MessageQueue<T> {
    fn default() -> Self {
        Self::unbounded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_queue_fifo() {
        let queue = MessageQueue::unbounded();
        for i in 0..5 {
            queue.push(i).unwrap();
        }
        let drained: Vec<_> = (0..5).map(|_| queue.pop().unwrap()).collect();
        assert_eq!(drained, vec![0, 1, 2, 3, 4]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_bounded_rejects_without_blocking() {
        let queue = MessageQueue::bounded(2);
        queue.push("a").unwrap();
        queue.push("b").unwrap();
        assert_eq!(queue.push("c"), Err(PushError::Full("c")));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_zero_capacity_holds_one() {
        let queue = MessageQueue::bounded(0);
        assert_eq!(queue.capacity(), Some(1));
        queue.push(1).unwrap();
        assert!(matches!(queue.push(2), Err(PushError::Full(2))));
    }

    #[test]
    fn test_close_with_bypasses_capacity() {
        let queue = MessageQueue::bounded(1);
        queue.push(1).unwrap();
        assert!(queue.close_with(99));
        assert!(!queue.close_with(100));
        assert!(matches!(queue.push(2), Err(PushError::Closed(2))));

        assert_eq!(queue.pop(), Some(1));
        assert_eq!(queue.pop(), Some(99));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn test_pop_blocks_until_push() {
        let queue = Arc::new(MessageQueue::unbounded());
        let consumer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.pop())
        };
        thread::sleep(Duration::from_millis(20));
        queue.push(42).unwrap();
        assert_eq!(consumer.join().unwrap(), Some(42));
    }

    #[test]
    fn test_close_wakes_consumer() {
        let queue: Arc<MessageQueue<i32>> = Arc::new(MessageQueue::unbounded());
        let consumer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.pop())
        };
        thread::sleep(Duration::from_millis(20));
        assert!(queue.close());
        assert_eq!(consumer.join().unwrap(), None);
    }

    #[test]
    fn test_drain_empties_closed_queue() {
        let queue = MessageQueue::bounded(2);
        queue.push(1).unwrap();
        queue.push(2).unwrap();
        assert!(queue.close_with(3));

        assert_eq!(queue.drain(), vec![1, 2, 3]);
        assert!(queue.is_empty());
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn test_concurrent_producers_keep_per_producer_order() {
        let queue = Arc::new(MessageQueue::unbounded());
        let producers: Vec<_> = (0..2)
            .map(|p| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    for i in 0..100 {
                        queue.push((p, i)).unwrap();
                    }
                })
            })
            .collect();
        for p in producers {
            p.join().unwrap();
        }

        let mut last = [-1i32; 2];
        for (p, i) in queue.drain() {
            assert!(i > last[p], "producer {} out of order", p);
            last[p] = i;
        }
        assert_eq!(last, [99, 99]);
    }
}
