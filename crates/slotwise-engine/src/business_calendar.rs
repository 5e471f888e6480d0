//! Holiday and business-day arithmetic over an explicit, immutable config.
//!
//! The configuration is a plain value passed into every call — never process
//! state — so concurrent requests and test ordering cannot interfere.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

fn default_working_weekdays() -> Vec<Weekday> {
    vec![
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
    ]
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

/// Working-weekday set, holiday list, and additional-working-day overrides.
///
/// Holiday and additional-working-day entries are matched by formatting the
/// candidate date with the configured format string and comparing for exact
/// string equality — not a calendar-aware comparison. An entry written in a
/// different format than the configured one silently never matches. This is
/// a deliberate simplicity tradeoff carried over from the source behavior;
/// keep list entries and format in sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessCalendarConfig {
    pub working_weekdays: Vec<Weekday>,
    pub holidays: Vec<String>,
    /// chrono format string for holiday matching, default `%Y-%m-%d`.
    pub holiday_format: String,
    pub additional_working_days: Vec<String>,
    /// chrono format string for additional-working-day matching.
    pub additional_working_day_format: String,
}

impl Default for BusinessCalendarConfig {
    fn default() -> Self {
        BusinessCalendarConfig {
            working_weekdays: default_working_weekdays(),
            holidays: Vec::new(),
            holiday_format: default_date_format(),
            additional_working_days: Vec::new(),
            additional_working_day_format: default_date_format(),
        }
    }
}

impl BusinessCalendarConfig {
    /// `date` appears in the holiday list under the configured format.
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        let formatted = date.format(&self.holiday_format).to_string();
        self.holidays.iter().any(|h| *h == formatted)
    }

    /// `date` appears in the additional-working-day list under the
    /// configured format.
    pub fn is_additional_working_day(&self, date: NaiveDate) -> bool {
        let formatted = date
            .format(&self.additional_working_day_format)
            .to_string();
        self.additional_working_days.iter().any(|d| *d == formatted)
    }

    /// A date is a business day iff it is an additional working day, or its
    /// weekday is in the working set and it is not a holiday. Additional
    /// working days override holiday exclusion.
    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        self.is_additional_working_day(date)
            || (self.working_weekdays.contains(&date.weekday()) && !self.is_holiday(date))
    }

    /// Walk forward (`n > 0`) or backward (`n < 0`) one calendar day at a
    /// time, skipping non-business days, until `|n|` business days have been
    /// crossed. `n == 0` returns the input unchanged, even if it is not
    /// itself a business day. A calendar whose business days can run out in
    /// the walk direction returns the input rather than walking forever.
    pub fn add_business_days(&self, date: NaiveDate, n: i32) -> NaiveDate {
        if n == 0 {
            return date;
        }
        // With working weekdays configured every week has a business day and
        // the walk below always terminates. Without them, business days come
        // only from the additional list and the walk must be bounded.
        if self.working_weekdays.is_empty() {
            return self.walk_additional_only(date, n);
        }

        let step = Duration::days(if n > 0 { 1 } else { -1 });
        let mut remaining = n.unsigned_abs();
        let mut cursor = date;
        while remaining > 0 {
            cursor = cursor + step;
            if self.is_business_day(cursor) {
                remaining -= 1;
            }
        }
        cursor
    }

    /// The empty-working-weekday walk. An additional-working-day entry
    /// either pins an absolute date (it parses with the configured format)
    /// or, with a year-less format, recurs within any one-year window. Once
    /// the cursor is past every parseable entry and a further year of days
    /// has matched nothing, no business day remains in the walk direction
    /// and the input is returned.
    fn walk_additional_only(&self, date: NaiveDate, n: i32) -> NaiveDate {
        let forward = n > 0;
        let step = Duration::days(if forward { 1 } else { -1 });
        let parseable = self.additional_working_days.iter().filter_map(|entry| {
            NaiveDate::parse_from_str(entry, &self.additional_working_day_format).ok()
        });
        let bound = if forward {
            parseable.max()
        } else {
            parseable.min()
        };

        let mut remaining = n.unsigned_abs();
        let mut cursor = date;
        let mut barren = 0u32;
        while remaining > 0 {
            cursor = cursor + step;
            if self.is_business_day(cursor) {
                remaining -= 1;
                barren = 0;
                continue;
            }
            let past_bound = match bound {
                Some(b) => {
                    if forward {
                        cursor > b
                    } else {
                        cursor < b
                    }
                }
                None => true,
            };
            if past_bound {
                barren += 1;
                if barren > 366 {
                    return date;
                }
            }
        }
        cursor
    }

    /// Signed count of business-day steps from `b` to `a`: positive when `a`
    /// is later, negative when earlier, zero for the same day.
    pub fn business_diff(&self, a: NaiveDate, b: NaiveDate) -> i64 {
        if a == b {
            return 0;
        }
        let (earlier, later) = if a < b { (a, b) } else { (b, a) };
        let mut count = 0i64;
        let mut cursor = earlier + Duration::days(1);
        while cursor <= later {
            if self.is_business_day(cursor) {
                count += 1;
            }
            cursor = cursor + Duration::days(1);
        }
        if a > b {
            count
        } else {
            -count
        }
    }

    /// The first business day strictly after `date`.
    pub fn next_business_day(&self, date: NaiveDate) -> NaiveDate {
        self.add_business_days(date, 1)
    }

    /// The last business day strictly before `date`.
    pub fn prev_business_day(&self, date: NaiveDate) -> NaiveDate {
        self.add_business_days(date, -1)
    }

    /// All business days in the calendar month containing `date`, ascending.
    /// Days that cannot be represented yield nothing rather than an error.
    pub fn business_days_in_month(&self, date: NaiveDate) -> Vec<NaiveDate> {
        (1..=31)
            .filter_map(|day| NaiveDate::from_ymd_opt(date.year(), date.month(), day))
            .filter(|d| self.is_business_day(*d))
            .collect()
    }

    /// The last business day of the month containing `date`, if any.
    pub fn last_business_day_of_month(&self, date: NaiveDate) -> Option<NaiveDate> {
        self.business_days_in_month(date).into_iter().last()
    }

    /// Business days of the month grouped into ISO weeks, ascending.
    pub fn business_weeks_in_month(&self, date: NaiveDate) -> Vec<Vec<NaiveDate>> {
        let mut weeks: Vec<Vec<NaiveDate>> = Vec::new();
        for day in self.business_days_in_month(date) {
            match weeks.last_mut() {
                Some(week) if week.last().is_some_and(|d| d.iso_week() == day.iso_week()) => {
                    week.push(day);
                }
                _ => weeks.push(vec![day]),
            }
        }
        weeks
    }
}
