//! Wall-clock source for the engines.
//!
//! Both engines measure time as differences between timestamps read at tick
//! time, never by counting ticks. Reading "now" goes through [`Clock`] so a
//! host can run on the system clock while tests drive a [`ManualClock`].

use std::cell::Cell;
use std::rc::Rc;

use chrono::{DateTime, Duration, Utc};

/// A source of the current time.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// The real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A hand-driven clock for simulations and tests.
///
/// Clones share the same instant, so a test can keep one handle and advance
/// it while an engine holds another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn advance_ms(&self, ms: i64) {
        self.advance(Duration::milliseconds(ms));
    }

    pub fn set(&self, at: DateTime<Utc>) {
        self.now.set(at);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(DateTime::<Utc>::UNIX_EPOCH)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

/// Milliseconds from `from` to `to`, clamped at zero when the clock went
/// backwards.
pub(crate) fn elapsed_ms(from: DateTime<Utc>, to: DateTime<Utc>) -> u64 {
    u64::try_from((to - from).num_milliseconds()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::default();
        let handle = clock.clone();
        handle.advance_ms(1500);
        assert_eq!(elapsed_ms(DateTime::<Utc>::UNIX_EPOCH, clock.now()), 1500);
    }

    #[test]
    fn elapsed_is_clamped_when_clock_goes_backwards() {
        let clock = ManualClock::default();
        let start = clock.now();
        clock.advance_ms(-10_000);
        assert_eq!(elapsed_ms(start, clock.now()), 0);
    }
}
