//! Wall-clock readings supplied by the caller.
//!
//! Nothing in the workspace reads the system clock; every time-dependent
//! operation receives `now` explicitly.

use chrono::{DateTime, Utc};

pub type Timestamp = DateTime<Utc>;

/// Timestamp from whole seconds since the Unix epoch.
///
/// Out-of-range inputs saturate to the epoch.
pub fn from_unix(secs: i64) -> Timestamp {
    DateTime::<Utc>::from_timestamp(secs, 0).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Seconds elapsed from `since` to `now`, clamped at zero when the clock
/// reads earlier than `since`.
pub fn elapsed_secs(since: Timestamp, now: Timestamp) -> u64 {
    (now - since).num_seconds().max(0) as u64
}
