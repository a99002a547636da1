use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};

use presenza_core::clock::Clock;

/// A settable clock for tests. Cloned handles share the same instant, so a
/// test can hold one handle, hand clones to the code under test, and advance
/// time between assertions.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    /// Fixed arbitrary starting instant (2026-03-09 09:00:00 UTC).
    pub fn default_start() -> Self {
        Self::new(Utc.with_ymd_and_hms(2026, 3, 9, 9, 0, 0).unwrap())
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}
