//! The composition root: list bookable slots over a date range, or validate
//! one proposed slot against the full rule set.
//!
//! Both operations share the same constraint pipeline over a caller-supplied
//! snapshot: widen existing busy intervals by the event type's buffers, merge
//! them into disjoint blocks, then apply notice, horizon, and (for single-slot
//! validation) booking-limit counters. The caller supplies `now` and a
//! consistent snapshot; transactional read-then-write guarantees belong to
//! the persistence layer, not here.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::business_calendar::BusinessCalendarConfig;
use crate::error::{Result, ValidationError};
use crate::interval::{merge_busy_intervals, BusyInterval, Slot, TimeInterval};
use crate::schedule::{TimeOfDay, WeeklySchedule};
use crate::slots::generate_slots;

/// Booking-limit period keys, in the order they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LimitPeriod {
    PerDay,
    PerWeek,
    PerMonth,
    PerYear,
}

impl LimitPeriod {
    pub const CHECK_ORDER: [LimitPeriod; 4] = [
        LimitPeriod::PerDay,
        LimitPeriod::PerWeek,
        LimitPeriod::PerMonth,
        LimitPeriod::PerYear,
    ];
}

impl std::fmt::Display for LimitPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            LimitPeriod::PerDay => "PER_DAY",
            LimitPeriod::PerWeek => "PER_WEEK",
            LimitPeriod::PerMonth => "PER_MONTH",
            LimitPeriod::PerYear => "PER_YEAR",
        })
    }
}

/// Optional per-period caps on bookings by one booker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingLimits {
    #[serde(default, rename = "PER_DAY", skip_serializing_if = "Option::is_none")]
    pub per_day: Option<u32>,
    #[serde(default, rename = "PER_WEEK", skip_serializing_if = "Option::is_none")]
    pub per_week: Option<u32>,
    #[serde(default, rename = "PER_MONTH", skip_serializing_if = "Option::is_none")]
    pub per_month: Option<u32>,
    #[serde(default, rename = "PER_YEAR", skip_serializing_if = "Option::is_none")]
    pub per_year: Option<u32>,
}

impl BookingLimits {
    pub fn limit_for(&self, period: LimitPeriod) -> Option<u32> {
        match period {
            LimitPeriod::PerDay => self.per_day,
            LimitPeriod::PerWeek => self.per_week,
            LimitPeriod::PerMonth => self.per_month,
            LimitPeriod::PerYear => self.per_year,
        }
    }
}

/// Existing booking counts for the candidate's periods, supplied by the
/// persistence collaborator as part of the snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodLoad {
    #[serde(default)]
    pub per_day: u32,
    #[serde(default)]
    pub per_week: u32,
    #[serde(default)]
    pub per_month: u32,
    #[serde(default)]
    pub per_year: u32,
}

impl PeriodLoad {
    pub fn count_for(&self, period: LimitPeriod) -> u32 {
        match period {
            LimitPeriod::PerDay => self.per_day,
            LimitPeriod::PerWeek => self.per_week,
            LimitPeriod::PerMonth => self.per_month,
            LimitPeriod::PerYear => self.per_year,
        }
    }
}

/// Temporal configuration of one event type. `duration_minutes` must be
/// positive; a zero duration produces no bookable slots and fails every
/// single-slot validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTypeConfig {
    pub duration_minutes: u32,
    /// Stride between candidate slot starts; defaults to the duration.
    #[serde(default)]
    pub slot_interval_minutes: Option<u32>,
    #[serde(default)]
    pub buffer_before_minutes: u32,
    #[serde(default)]
    pub buffer_after_minutes: u32,
    #[serde(default)]
    pub minimum_notice_minutes: u32,
    /// Future-booking horizon in days from `now`; `None` means unlimited.
    #[serde(default)]
    pub future_limit_days: Option<u32>,
    #[serde(default)]
    pub booking_limits: BookingLimits,
}

impl EventTypeConfig {
    pub fn new(duration_minutes: u32) -> Self {
        EventTypeConfig {
            duration_minutes,
            ..EventTypeConfig::default()
        }
    }

    pub fn slot_interval(&self) -> u32 {
        self.slot_interval_minutes.unwrap_or(self.duration_minutes)
    }

    fn duration(&self) -> Duration {
        Duration::minutes(i64::from(self.duration_minutes))
    }

    fn earliest_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now + Duration::minutes(i64::from(self.minimum_notice_minutes))
    }

    fn latest_start(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.future_limit_days
            .map(|days| now + Duration::days(i64::from(days)))
    }
}

/// Widen every busy interval by the event type's buffers and merge into
/// disjoint blocks. The source tag never influences the footprint — an
/// out-of-office period blocks exactly like a booking or a synced event.
fn blocked_intervals(event_type: &EventTypeConfig, busy: &[BusyInterval]) -> Vec<TimeInterval> {
    let before = Duration::minutes(i64::from(event_type.buffer_before_minutes));
    let after = Duration::minutes(i64::from(event_type.buffer_after_minutes));
    let widened: Vec<TimeInterval> = busy.iter().map(|b| b.interval.widen(before, after)).collect();
    merge_busy_intervals(&widened)
}

/// Compute the bookable slots for each day in `[range_start, range_end]`.
///
/// A date contributes candidates when it has a (non-unavailable) override, or
/// when it is a business day with matching weekday rules. Candidates are then
/// filtered against the merged busy footprint, the minimum-notice boundary,
/// and the future-booking horizon (both boundaries inclusive-pass). The
/// result is ascending by start time.
///
/// The schedule is assumed validated ([`WeeklySchedule::validate`]); overlap
/// checking happens at schedule-save time, not per request.
pub fn list_available_slots(
    event_type: &EventTypeConfig,
    schedule: &WeeklySchedule,
    calendar: &BusinessCalendarConfig,
    busy: &[BusyInterval],
    range_start: NaiveDate,
    range_end: NaiveDate,
    now: DateTime<Utc>,
) -> Vec<Slot> {
    let blocked = blocked_intervals(event_type, busy);
    let earliest = event_type.earliest_start(now);
    let latest = event_type.latest_start(now);

    let mut out = Vec::new();
    let mut date = range_start;
    while date <= range_end {
        for (work_start, work_end) in day_windows(schedule, calendar, date) {
            // Each endpoint resolves through the timezone on its own, so a
            // window keeps its wall-clock position across a DST transition.
            let window_start = schedule.local_instant(date, work_start);
            let window_end = schedule.local_instant(date, work_end);
            for slot in generate_slots(
                window_start,
                window_end,
                event_type.duration_minutes,
                event_type.slot_interval(),
            ) {
                if slot.start < earliest {
                    continue;
                }
                if latest.is_some_and(|l| slot.start > l) {
                    continue;
                }
                if blocked.iter().any(|b| b.overlaps_span(slot.start, slot.end)) {
                    continue;
                }
                out.push(slot);
            }
        }
        date = match date.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    out.sort_by_key(|s| s.start);
    out
}

/// The working windows for one date: the override's ranges if an override
/// exists (empty when marked unavailable), otherwise the weekday rules —
/// but only on business days.
fn day_windows(
    schedule: &WeeklySchedule,
    calendar: &BusinessCalendarConfig,
    date: NaiveDate,
) -> Vec<(TimeOfDay, TimeOfDay)> {
    use chrono::Datelike;

    if let Some(ov) = schedule.override_for(date) {
        if ov.is_unavailable {
            return Vec::new();
        }
        let mut ranges = ov.ranges.clone();
        ranges.sort();
        return ranges;
    }
    if !calendar.is_business_day(date) {
        return Vec::new();
    }
    schedule.windows_for_weekday(date.weekday())
}

/// Validate one proposed booking slot against the full constraint set.
///
/// Checks run in a fixed order, first violation wins: slot shape (span must
/// equal the configured duration), busy conflict (buffer footprint included),
/// minimum notice, future horizon, then booking limits in
/// [`LimitPeriod::CHECK_ORDER`]. A counter at its configured limit already
/// rejects: `count == limit` fails, `count == limit - 1` passes.
pub fn validate_booking_slot(
    event_type: &EventTypeConfig,
    candidate: Slot,
    busy: &[BusyInterval],
    load: &PeriodLoad,
    now: DateTime<Utc>,
) -> Result<()> {
    if candidate.start >= candidate.end || candidate.end - candidate.start != event_type.duration()
    {
        return Err(ValidationError::InvalidInterval {
            start: candidate.start,
            end: candidate.end,
        });
    }

    let blocked = blocked_intervals(event_type, busy);
    if let Some(block) = blocked
        .iter()
        .find(|b| b.overlaps_span(candidate.start, candidate.end))
    {
        return Err(ValidationError::SlotConflict {
            slot: candidate,
            busy: *block,
        });
    }

    let earliest = event_type.earliest_start(now);
    if candidate.start < earliest {
        return Err(ValidationError::NoticeViolation {
            slot_start: candidate.start,
            earliest,
        });
    }

    if let Some(latest) = event_type.latest_start(now) {
        if candidate.start > latest {
            return Err(ValidationError::HorizonViolation {
                slot_start: candidate.start,
                latest,
            });
        }
    }

    for period in LimitPeriod::CHECK_ORDER {
        if let Some(limit) = event_type.booking_limits.limit_for(period) {
            let count = load.count_for(period);
            if count >= limit {
                return Err(ValidationError::BookingLimitExceeded {
                    period,
                    count,
                    limit,
                });
            }
        }
    }

    Ok(())
}
