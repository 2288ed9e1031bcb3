#![forbid(unsafe_code)]

//! Trailing-edge debouncer driven by explicit timestamps.
//!
//! The caller supplies `now` on every call, so the debouncer works the same
//! under a real clock, a test clock, or a browser's `performance.now()`.

use web_time::{Duration, Instant};

/// Delay between a hide and clearing the active identity.
pub const DEFAULT_HIDE_DEBOUNCE: Duration = Duration::from_millis(200);

#[derive(Debug, Clone)]
struct Scheduled<T> {
    deadline: Instant,
    value: T,
}

/// Fires the most recent value once `interval` has passed without a new call.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    interval: Duration,
    scheduled: Option<Scheduled<T>>,
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_HIDE_DEBOUNCE)
    }
}

impl<T> Debouncer<T> {
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            scheduled: None,
        }
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Schedule `value` for `now + interval`, replacing any earlier call.
    pub fn call(&mut self, now: Instant, value: T) {
        self.scheduled = Some(Scheduled {
            deadline: now + self.interval,
            value,
        });
    }

    /// Drop the scheduled call. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.scheduled.take().is_some()
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.scheduled.is_some()
    }

    /// When the scheduled call fires, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.scheduled.as_ref().map(|s| s.deadline)
    }

    /// Take the scheduled value if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.scheduled {
            Some(s) if now >= s.deadline => self.scheduled.take().map(|s| s.value),
            _ => None,
        }
    }
}
