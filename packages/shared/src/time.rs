//! Time-related utilities with clock abstraction for testability.

use chrono::{DateTime, Utc};

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Get current Unix timestamp in milliseconds
    fn now_millis(&self) -> i64;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        get_unix_timestamp()
    }
}

/// Fixed clock implementation for testing (returns a fixed time)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_time: i64,
}

impl FixedClock {
    /// Create a new fixed clock with the given timestamp
    pub fn new(fixed_time_millis: i64) -> Self {
        Self {
            fixed_time: fixed_time_millis,
        }
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.fixed_time
    }
}

/// Get current Unix timestamp in milliseconds (UTC)
pub fn get_unix_timestamp() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert Unix timestamp (milliseconds) to RFC 3339 format (UTC)
pub fn timestamp_to_rfc3339(timestamp_millis: i64) -> String {
    let seconds = timestamp_millis.div_euclid(1000);
    let nanos = (timestamp_millis.rem_euclid(1000) * 1_000_000) as u32;
    let dt: DateTime<Utc> = DateTime::from_timestamp(seconds, nanos).unwrap_or_default();
    dt.to_rfc3339()
}
