//! Time source abstraction.
//!
//! Freshness decisions in the memoizer compare `Clock::now()` against entry
//! timestamps, so tests can drive expiry with a synthetic clock instead of
//! sleeping through real TTL windows.

use std::sync::{Arc, Mutex};

use time::{Duration, OffsetDateTime};

/// Supplies the current time to the cache layer.
pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

/// Wall-clock time (`OffsetDateTime::now_utc`). The production clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// A settable clock for tests.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<OffsetDateTime>>,
}

impl ManualClock {
    pub fn new(start: OffsetDateTime) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Move the clock forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        let mut now = self.lock();
        *now += delta;
    }

    pub fn set(&self, instant: OffsetDateTime) {
        *self.lock() = instant;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, OffsetDateTime> {
        match self.now.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        *self.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::new(OffsetDateTime::UNIX_EPOCH);
        assert_eq!(clock.now(), OffsetDateTime::UNIX_EPOCH);

        clock.advance(Duration::hours(7));
        assert_eq!(clock.now() - OffsetDateTime::UNIX_EPOCH, Duration::hours(7));
    }

    #[test]
    fn manual_clock_clones_share_state() {
        let clock = ManualClock::new(OffsetDateTime::UNIX_EPOCH);
        let handle = clock.clone();

        handle.advance(Duration::seconds(30));
        assert_eq!(clock.now(), handle.now());
    }
}
