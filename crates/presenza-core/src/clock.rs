use chrono::{DateTime, Utc};

/// Source of server-authoritative time.
///
/// All countdown arithmetic goes through a `Clock` so tests can pin or advance
/// time; production code uses [`SystemClock`].
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time from the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
