use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Milliseconds on the host's monotonic clock (`performance.now()`).
pub type Millis = u64;

#[derive(Debug)]
struct Entry<T> {
    at: Millis,
    seq: u64,
    task: T,
}

impl<T> Entry<T> {
    fn key(&self) -> (Millis, u64) {
        (self.at, self.seq)
    }
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// Deterministic stand-in for `setTimeout`.
///
/// Tasks are plain values; the owner decides what a fired task means. The
/// queue never reads a clock: callers pass `now` into [`pop_due`], which
/// keeps every timing path reproducible in tests.
///
/// [`pop_due`]: TimerQueue::pop_due
#[derive(Debug)]
pub struct TimerQueue<T> {
    heap: BinaryHeap<Reverse<Entry<T>>>,
    next_seq: u64,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Schedule `task` to fire at `at`. Tasks sharing a deadline fire in
    /// scheduling order.
    pub fn schedule(&mut self, at: Millis, task: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Entry { at, seq, task }));
    }

    /// Pop the earliest task whose deadline is `<= now`, together with that
    /// deadline.
    pub fn pop_due(&mut self, now: Millis) -> Option<(Millis, T)> {
        if self.next_deadline()? > now {
            return None;
        }
        self.heap.pop().map(|Reverse(entry)| (entry.at, entry.task))
    }

    pub fn next_deadline(&self) -> Option<Millis> {
        self.heap.peek().map(|Reverse(entry)| entry.at)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
