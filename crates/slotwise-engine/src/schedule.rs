//! Working-hours rules, date overrides, and timezone day windows.
//!
//! Schedules are validated once (overlap and range checks), not at use time.
//! Window-endpoint resolution is the only place local time enters the
//! engine: a calendar date, a wall-clock time, and an IANA timezone resolve
//! to one UTC instant, so the interval arithmetic downstream never
//! double-counts DST shifts.

use chrono::{
    DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc, Weekday,
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{Result, ValidationError};

/// A wall-clock time of day, construction-checked (`hour < 24`,
/// `minute < 60`). Serializes as `"HH:MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid time of day {0:?}, expected HH:MM")]
pub struct ParseTimeOfDayError(String);

impl TimeOfDay {
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(TimeOfDay { hour, minute })
        } else {
            None
        }
    }

    pub fn hour(self) -> u8 {
        self.hour
    }

    pub fn minute(self) -> u8 {
        self.minute
    }

    pub fn minutes_from_midnight(self) -> i64 {
        i64::from(self.hour) * 60 + i64::from(self.minute)
    }

    fn to_naive_time(self) -> NaiveTime {
        // Construction-checked fields make this infallible.
        NaiveTime::from_hms_opt(u32::from(self.hour), u32::from(self.minute), 0)
            .unwrap_or(NaiveTime::MIN)
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl std::str::FromStr for TimeOfDay {
    type Err = ParseTimeOfDayError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let err = || ParseTimeOfDayError(s.to_string());
        let (h, m) = s.split_once(':').ok_or_else(err)?;
        let hour: u8 = h.parse().map_err(|_| err())?;
        let minute: u8 = m.parse().map_err(|_| err())?;
        TimeOfDay::new(hour, minute).ok_or_else(err)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = ParseTimeOfDayError;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(tod: TimeOfDay) -> String {
        tod.to_string()
    }
}

/// One working-hours window applied to a set of weekdays. Multiple rules may
/// target the same weekday (split shifts) as long as their windows do not
/// overlap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHoursRule {
    pub weekdays: Vec<Weekday>,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

/// Per-date exception: replaces the weekday rules for its date entirely.
/// `is_unavailable` blocks the whole date regardless of `ranges`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateOverride {
    pub date: NaiveDate,
    #[serde(default)]
    pub ranges: Vec<(TimeOfDay, TimeOfDay)>,
    #[serde(default)]
    pub is_unavailable: bool,
}

/// Weekly working-hours rules plus date overrides, anchored to an IANA
/// timezone for day-boundary computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklySchedule {
    pub timezone: Tz,
    #[serde(default)]
    pub rules: Vec<WorkingHoursRule>,
    #[serde(default)]
    pub overrides: Vec<DateOverride>,
}

const ALL_WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

impl WeeklySchedule {
    pub fn new(timezone: Tz) -> Self {
        WeeklySchedule {
            timezone,
            rules: Vec::new(),
            overrides: Vec::new(),
        }
    }

    /// Check every rule window is non-empty and that no two rules overlap on
    /// the same weekday. Override ranges get the same checks per date.
    pub fn validate(&self) -> Result<()> {
        for rule in &self.rules {
            if rule.start >= rule.end {
                return Err(ValidationError::InvalidScheduleRange {
                    start: rule.start,
                    end: rule.end,
                });
            }
        }

        for weekday in ALL_WEEKDAYS {
            let mut windows: Vec<(TimeOfDay, TimeOfDay)> = self
                .rules
                .iter()
                .filter(|r| r.weekdays.contains(&weekday))
                .map(|r| (r.start, r.end))
                .collect();
            windows.sort();
            for pair in windows.windows(2) {
                if pair[1].0 < pair[0].1 {
                    return Err(ValidationError::InvalidScheduleOverlap { weekday });
                }
            }
        }

        for ov in &self.overrides {
            let mut ranges = ov.ranges.clone();
            ranges.sort();
            for (start, end) in &ranges {
                if start >= end {
                    return Err(ValidationError::InvalidScheduleRange {
                        start: *start,
                        end: *end,
                    });
                }
            }
            for pair in ranges.windows(2) {
                if pair[1].0 < pair[0].1 {
                    return Err(ValidationError::InvalidScheduleOverlap {
                        weekday: ov.date.weekday(),
                    });
                }
            }
        }

        Ok(())
    }

    /// The override for `date`, if one exists. Overrides take precedence over
    /// weekday rules.
    pub fn override_for(&self, date: NaiveDate) -> Option<&DateOverride> {
        self.overrides.iter().find(|o| o.date == date)
    }

    /// The working windows that apply to `date` from the weekday rules,
    /// sorted by start. Overrides are not consulted here.
    pub fn windows_for_weekday(&self, weekday: Weekday) -> Vec<(TimeOfDay, TimeOfDay)> {
        let mut windows: Vec<(TimeOfDay, TimeOfDay)> = self
            .rules
            .iter()
            .filter(|r| r.weekdays.contains(&weekday))
            .map(|r| (r.start, r.end))
            .collect();
        windows.sort();
        windows
    }

    /// A local wall-clock time on `date`, as a UTC instant.
    pub fn local_instant(&self, date: NaiveDate, time: TimeOfDay) -> DateTime<Utc> {
        resolve_local(self.timezone, date.and_time(time.to_naive_time()))
    }
}

/// Resolve a local wall-clock time to UTC. Ambiguous times (DST fall-back)
/// take the earlier instant; times inside a DST gap resolve to the first
/// valid wall-clock instant after the jump. Transition offsets are multiples
/// of 15 minutes, so the scan probes on that grid; if a full day of probes
/// finds nothing the time is read as UTC.
fn resolve_local(tz: Tz, naive: NaiveDateTime) -> DateTime<Utc> {
    let mut probe = naive;
    for _ in 0..96 {
        if let Some(dt) = tz.from_local_datetime(&probe).earliest() {
            return dt.with_timezone(&Utc);
        }
        probe = probe + Duration::minutes(15);
    }
    Utc.from_utc_datetime(&naive)
}
