//! Feed timestamp handling
//!
//! Frames carry RFC 3339 timestamps. Internally every instant is an `i64`
//! of Unix nanoseconds. Feed windows are requested with a start time
//! truncated to a 10-second boundary.

use chrono::{DateTime, Utc};

use crate::errors::FrameError;

pub const NANOS_PER_MILLI: i64 = 1_000_000;
pub const NANOS_PER_SEC: i64 = 1_000_000_000;

/// Window start times are aligned to this many seconds.
pub const WINDOW_ALIGNMENT_SECS: i64 = 10;

/// Convert whole seconds to nanoseconds.
pub fn secs(value: i64) -> i64 {
    value * NANOS_PER_SEC
}

/// Parse an RFC 3339 timestamp (`2021-09-05T08:12:37.409Z`) into Unix nanos.
pub fn parse_timestamp(value: &str) -> Result<i64, FrameError> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .and_then(|dt| dt.timestamp_nanos_opt())
        .ok_or_else(|| FrameError::InvalidTimestamp(value.to_string()))
}

/// Floor a Unix-nanos instant to the window alignment.
pub fn align_to_window(timestamp_nanos: i64) -> i64 {
    let alignment = secs(WINDOW_ALIGNMENT_SECS);
    timestamp_nanos.div_euclid(alignment) * alignment
}

/// Format a Unix-nanos instant as a window start time
/// (`2021-09-05T08:12:30Z`), aligned down to the window boundary.
pub fn format_window_time(timestamp_nanos: i64) -> String {
    let aligned_secs = align_to_window(timestamp_nanos) / NANOS_PER_SEC;
    DateTime::<Utc>::from_timestamp(aligned_secs, 0)
        .unwrap_or_default()
        .format("%Y-%m-%dT%H:%M:%SZ")
        .to_string()
}
