use chrono::{DateTime, Utc};

/// Source of the current instant.
///
/// Everything time-dependent (OTP expiry, token lifetimes, the due-item
/// window) reads through this trait so tests can pin the clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Unix timestamp (seconds).
    fn now_ts(&self) -> i64 {
        self.now().timestamp()
    }
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
