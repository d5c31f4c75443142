// SPDX-FileCopyrightText: 2026 Cairn Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A clock that only moves when told to.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};

use cairn_core::Clock;

/// Manually advanced [`Clock`] for TTL and expiry tests.
///
/// Time is stored as UTC milliseconds so `advance` works from `&self` across
/// threads without locking.
pub struct ManualClock {
    millis: AtomicI64,
}

impl ManualClock {
    /// Start at a fixed instant.
    pub fn new(start: DateTime<Utc>) -> Self {
        ManualClock {
            millis: AtomicI64::new(start.timestamp_millis()),
        }
    }

    /// Start at the current wall-clock time.
    pub fn starting_now() -> Self {
        ManualClock::new(Utc::now())
    }

    /// Move the clock forward.
    pub fn advance(&self, delta: Duration) {
        self.millis
            .fetch_add(delta.as_millis() as i64, Ordering::SeqCst);
    }

    /// Jump the clock to an absolute instant.
    pub fn set(&self, to: DateTime<Utc>) {
        self.millis.store(to.timestamp_millis(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.millis.load(Ordering::SeqCst))
            .expect("manual clock timestamp in range")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_moves_time_forward() {
        let clock = ManualClock::new("2026-01-01T00:00:00Z".parse().unwrap());
        let start = clock.now();

        clock.advance(Duration::from_secs(90));
        assert_eq!(clock.now() - start, chrono::TimeDelta::seconds(90));
    }

    #[test]
    fn set_jumps_to_instant() {
        let clock = ManualClock::starting_now();
        let target: DateTime<Utc> = "2030-06-15T12:00:00Z".parse().unwrap();
        clock.set(target);
        assert_eq!(clock.now(), target);
    }
}
