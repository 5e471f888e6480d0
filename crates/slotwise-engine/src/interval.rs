//! UTC time intervals, tagged busy intervals, slots, and the merge sweep.
//!
//! All instants are UTC-normalized; timezone conversion happens only at
//! day-boundary computation in [`crate::schedule`]. Intervals are immutable
//! value types constructed fresh per request.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A half-open interval `[start, end)` of UTC instants.
///
/// `start < end` is enforced at construction (including deserialization);
/// a `TimeInterval` is never empty or inverted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct TimeInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawInterval> for TimeInterval {
    type Error = ValidationError;

    fn try_from(raw: RawInterval) -> Result<Self, Self::Error> {
        TimeInterval::new(raw.start, raw.end)
    }
}

impl TimeInterval {
    /// Build an interval, rejecting `start >= end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ValidationError> {
        if start >= end {
            return Err(ValidationError::InvalidInterval { start, end });
        }
        Ok(TimeInterval { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Strict overlap: touching intervals (`a.end == b.start`) do not overlap.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Strict overlap against a raw `[start, end)` span.
    pub fn overlaps_span(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start < end && start < self.end
    }

    /// Widen the interval by non-negative buffers on each side. Used to
    /// compute the buffer footprint of an existing busy interval.
    pub fn widen(&self, before: Duration, after: Duration) -> TimeInterval {
        TimeInterval {
            start: self.start - before,
            end: self.end + after,
        }
    }
}

/// Which collaborator a busy interval came from. Carried for diagnostics
/// only — the resolver treats every source uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BusySource {
    ExistingBooking,
    CalendarSync,
    OutOfOffice,
}

/// A busy interval from one of the external collaborators (booking table,
/// calendar sync, out-of-office periods). Assembled fresh per request and
/// never persisted by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyInterval {
    #[serde(flatten)]
    pub interval: TimeInterval,
    pub source: BusySource,
}

impl BusyInterval {
    pub fn new(interval: TimeInterval, source: BusySource) -> Self {
        BusyInterval { interval, source }
    }
}

/// A candidate or confirmed bookable unit; `end = start + duration`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Merge overlapping or adjacent intervals into a minimal sorted disjoint set.
///
/// Sorts by start (then end, for stability) and folds left, extending the
/// last accumulated interval when `current.start <= accumulated.end`.
/// Touching intervals merge: back-to-back bookings count as one continuous
/// busy block for conflict purposes. Empty input yields empty output; the
/// operation is idempotent.
pub fn merge_busy_intervals(intervals: &[TimeInterval]) -> Vec<TimeInterval> {
    let mut sorted = intervals.to_vec();
    sorted.sort_by_key(|iv| (iv.start, iv.end));

    let mut merged: Vec<TimeInterval> = Vec::new();
    for iv in sorted {
        if let Some(last) = merged.last_mut() {
            if iv.start <= last.end {
                // Overlapping or adjacent — extend the current block.
                last.end = last.end.max(iv.end);
                continue;
            }
        }
        merged.push(iv);
    }

    merged
}
