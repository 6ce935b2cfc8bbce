//! Trailing-edge rate limiting for high-frequency events.
//!
//! A [`Throttle`] opens a window on the first call it sees while idle and
//! asks its owner to come back when the window closes. Calls landing inside
//! the window only overwrite the pending arguments, so a burst of scroll
//! events collapses into one delivery carrying the latest position.

use std::collections::HashMap;
use std::hash::Hash;

use log::{trace, warn};

use crate::timer::Millis;

#[derive(Debug)]
pub struct Throttle<T> {
    interval: Millis,
    pending: Option<T>,
    deadline: Option<Millis>,
}

impl<T> Throttle<T> {
    pub fn new(interval: Millis) -> Self {
        Self {
            interval,
            pending: None,
            deadline: None,
        }
    }

    pub fn interval(&self) -> Millis {
        self.interval
    }

    /// Record a call.
    ///
    /// Returns the deadline the owner must schedule a [`flush`] for when
    /// this call opened a new window, and `None` when a flush is already
    /// scheduled.
    ///
    /// [`flush`]: Throttle::flush
    pub fn call(&mut self, now: Millis, args: T) -> Option<Millis> {
        self.pending = Some(args);
        if self.deadline.is_some() {
            return None;
        }
        let deadline = now.saturating_add(self.interval);
        self.deadline = Some(deadline);
        Some(deadline)
    }

    /// Deliver the latest arguments if the window has closed.
    pub fn flush(&mut self, now: Millis) -> Option<T> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.pending.take()
            }
            _ => None,
        }
    }

    /// Whether a delivery is outstanding.
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }
}

/// Index of a wrapped handler inside a [`ThrottleRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThrottleId(usize);

/// One throttle per handler identity.
///
/// Wrapping the same handler twice hands back the existing throttle, so
/// repeated setup can never leave two windows racing to deliver the same
/// event stream.
#[derive(Debug)]
pub struct ThrottleRegistry<H, T> {
    by_handler: HashMap<H, ThrottleId>,
    throttles: Vec<Throttle<T>>,
}

impl<H, T> ThrottleRegistry<H, T>
where
    H: Copy + Eq + Hash + std::fmt::Debug,
{
    pub fn new() -> Self {
        Self {
            by_handler: HashMap::new(),
            throttles: Vec::new(),
        }
    }

    /// Throttle `handler` to one delivery per `interval`.
    ///
    /// Idempotent per handler: a second wrap returns the first id and keeps
    /// the first interval.
    pub fn wrap(&mut self, handler: H, interval: Millis) -> ThrottleId {
        if let Some(&id) = self.by_handler.get(&handler) {
            let existing = self.throttles[id.0].interval();
            if existing != interval {
                warn!(
                    "throttle for {handler:?} already wrapped at {existing}ms; ignoring {interval}ms"
                );
            }
            return id;
        }
        let id = ThrottleId(self.throttles.len());
        self.throttles.push(Throttle::new(interval));
        self.by_handler.insert(handler, id);
        trace!("wrapped {handler:?} at {interval}ms as {id:?}");
        id
    }

    /// See [`Throttle::call`]. Unknown ids are ignored.
    pub fn call(&mut self, id: ThrottleId, now: Millis, args: T) -> Option<Millis> {
        let deadline = self.throttles.get_mut(id.0)?.call(now, args);
        if let Some(at) = deadline {
            trace!("{id:?} armed until {at}");
        }
        deadline
    }

    /// See [`Throttle::flush`]. Unknown ids are ignored.
    pub fn flush(&mut self, id: ThrottleId, now: Millis) -> Option<T> {
        self.throttles.get_mut(id.0)?.flush(now)
    }

    pub fn id_of(&self, handler: H) -> Option<ThrottleId> {
        self.by_handler.get(&handler).copied()
    }

    pub fn len(&self) -> usize {
        self.throttles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.throttles.is_empty()
    }
}

impl<H, T> Default for ThrottleRegistry<H, T>
where
    H: Copy + Eq + Hash + std::fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Handler {
        Nav,
        Other,
    }

    /// Drive a throttle the way the page does: schedule on the returned
    /// deadline, flush when the clock reaches it.
    fn run_burst(throttle: &mut Throttle<u32>, calls: &[(Millis, u32)], until: Millis) -> Vec<u32> {
        let mut deadlines = Vec::new();
        let mut delivered = Vec::new();
        for &(at, arg) in calls {
            if let Some(d) = throttle.call(at, arg) {
                deadlines.push(d);
            }
        }
        for d in deadlines {
            if d <= until
                && let Some(arg) = throttle.flush(d)
            {
                delivered.push(arg);
            }
        }
        delivered
    }

    #[test]
    fn burst_collapses_to_last_call() {
        let mut t = Throttle::new(100);
        // Ten calls within 50ms.
        let calls: Vec<_> = (0..10).map(|i| (i * 5, i as u32)).collect();
        let delivered = run_burst(&mut t, &calls, 1_000);
        assert_eq!(delivered, vec![9]);
        assert!(!t.is_armed());
    }

    #[test]
    fn only_first_call_in_window_schedules() {
        let mut t = Throttle::new(100);
        assert_eq!(t.call(10, 1), Some(110));
        assert_eq!(t.call(20, 2), None);
        assert_eq!(t.call(109, 3), None);
    }

    #[test]
    fn early_flush_delivers_nothing() {
        let mut t = Throttle::new(100);
        t.call(0, 7);
        assert_eq!(t.flush(99), None);
        assert_eq!(t.flush(100), Some(7));
        assert_eq!(t.flush(200), None);
    }

    #[test]
    fn new_window_after_delivery() {
        let mut t = Throttle::new(100);
        t.call(0, 1);
        assert_eq!(t.flush(100), Some(1));
        assert_eq!(t.call(150, 2), Some(250));
        assert_eq!(t.flush(250), Some(2));
    }

    #[test]
    fn wrap_is_idempotent_per_handler() {
        let mut reg: ThrottleRegistry<Handler, f64> = ThrottleRegistry::new();
        let a = reg.wrap(Handler::Nav, 100);
        let b = reg.wrap(Handler::Nav, 100);
        let c = reg.wrap(Handler::Nav, 250);
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(reg.len(), 1);

        let other = reg.wrap(Handler::Other, 100);
        assert_ne!(a, other);
        assert_eq!(reg.id_of(Handler::Nav), Some(a));
    }

    #[test]
    fn double_wrap_shares_one_window() {
        let mut reg: ThrottleRegistry<Handler, f64> = ThrottleRegistry::new();
        let first = reg.wrap(Handler::Nav, 100);
        let second = reg.wrap(Handler::Nav, 100);

        assert_eq!(reg.call(first, 0, 10.0), Some(100));
        // Same state behind both ids: no second timer requested.
        assert_eq!(reg.call(second, 5, 20.0), None);
        assert_eq!(reg.flush(first, 100), Some(20.0));
        assert_eq!(reg.flush(second, 100), None);
    }
}
