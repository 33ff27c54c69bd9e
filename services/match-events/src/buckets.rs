//! Time bucket builder
//!
//! Coalesces the snapshots of consecutive update cycles into buckets of a
//! configured width. A bucket opens at the timestamp of the frame that
//! crossed the previous bucket's width (buckets are not epoch-aligned) and
//! closes when a later frame crosses its own width, or when the game ends.
//!
//! Empty buckets are never emitted.

use serde::{Deserialize, Serialize};

use match_types::event::{Event, Snapshot};

/// Snapshots emitted within one interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBucket {
    /// Unix nanos of the frame that opened the bucket
    pub start_time: i64,
    pub snapshots: Vec<Snapshot>,
}

impl TimeBucket {
    pub fn new(start_time: i64) -> Self {
        Self {
            start_time,
            snapshots: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.iter().all(|s| s.events.is_empty())
    }

    /// All events of the bucket in emission order.
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.snapshots.iter().flat_map(|s| s.events.iter())
    }

    pub fn event_count(&self) -> usize {
        self.snapshots.iter().map(|s| s.events.len()).sum()
    }
}

/// Rotates buckets on a fixed interval and retains the closed ones.
#[derive(Debug, Clone)]
pub struct BucketBuilder {
    interval_nanos: i64,
    current: TimeBucket,
    /// Closed, non-empty buckets in close order
    closed: Vec<TimeBucket>,
}

impl BucketBuilder {
    pub fn new(interval_nanos: i64, start_time: i64) -> Self {
        Self {
            interval_nanos,
            current: TimeBucket::new(start_time),
            closed: Vec::new(),
        }
    }

    pub fn interval_nanos(&self) -> i64 {
        self.interval_nanos
    }

    pub fn current(&self) -> &TimeBucket {
        &self.current
    }

    pub fn closed(&self) -> &[TimeBucket] {
        &self.closed
    }

    pub fn into_closed(self) -> Vec<TimeBucket> {
        self.closed
    }

    /// Advance the clock to `now`.
    ///
    /// Opens a new bucket when at least one interval has elapsed since the
    /// current bucket opened; returns the bucket that closed if it held any
    /// events.
    pub fn advance(&mut self, now: i64) -> Option<TimeBucket> {
        if now - self.current.start_time < self.interval_nanos {
            return None;
        }
        let finished = std::mem::replace(&mut self.current, TimeBucket::new(now));
        self.retain(finished)
    }

    /// Append a snapshot to the current bucket.
    pub fn record(&mut self, snapshot: Snapshot) {
        self.current.snapshots.push(snapshot);
    }

    /// Force-close the current bucket (game end).
    pub fn close_current(&mut self) -> Option<TimeBucket> {
        let start = self.current.start_time;
        let finished = std::mem::replace(&mut self.current, TimeBucket::new(start));
        self.retain(finished)
    }

    fn retain(&mut self, bucket: TimeBucket) -> Option<TimeBucket> {
        if bucket.is_empty() {
            return None;
        }
        self.closed.push(bucket.clone());
        Some(bucket)
    }
}
