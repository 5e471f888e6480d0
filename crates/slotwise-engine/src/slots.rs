//! Stride-based candidate slot generation for a single working window.

use chrono::{DateTime, Duration, Utc};

use crate::interval::Slot;

/// Generate the candidate slots for one working window.
///
/// Slots begin at `window_start` and advance by `stride_minutes`; a slot is
/// emitted only while `slot_start + duration <= window_end` — no partial slot
/// is produced at the window boundary. `window_start >= window_end` (or a
/// zero duration/stride) yields no slots. Pure function of its inputs.
///
/// The endpoints are UTC instants; callers resolve local wall-clock windows
/// through [`crate::schedule::WeeklySchedule::local_instant`] so that slots
/// keep their wall-clock positions across DST transitions.
pub fn generate_slots(
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    duration_minutes: u32,
    stride_minutes: u32,
) -> Vec<Slot> {
    if window_start >= window_end || duration_minutes == 0 || stride_minutes == 0 {
        return Vec::new();
    }

    let duration = Duration::minutes(i64::from(duration_minutes));
    let stride = Duration::minutes(i64::from(stride_minutes));

    let mut slots = Vec::new();
    let mut cursor = window_start;
    while cursor + duration <= window_end {
        slots.push(Slot {
            start: cursor,
            end: cursor + duration,
        });
        cursor += stride;
    }

    slots
}
