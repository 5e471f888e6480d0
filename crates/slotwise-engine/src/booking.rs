//! Booking status lifecycle and recurring-series configuration checks.
//!
//! The transition table below is the single source of truth for status
//! writes; every write path must go through [`BookingStatus::transition_to`]
//! rather than ad hoc checks at call sites.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};

/// Booking lifecycle states.
///
/// ```text
/// PENDING       -> {ACCEPTED, REJECTED, CANCELLED}
/// AWAITING_HOST -> {ACCEPTED, REJECTED, CANCELLED}
/// ACCEPTED      -> {CANCELLED}
/// REJECTED      -> {}         (terminal)
/// CANCELLED     -> {}         (terminal)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    AwaitingHost,
    Accepted,
    Rejected,
    Cancelled,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 5] = [
        BookingStatus::Pending,
        BookingStatus::AwaitingHost,
        BookingStatus::Accepted,
        BookingStatus::Rejected,
        BookingStatus::Cancelled,
    ];

    /// Whether the transition table permits `self -> to`.
    pub fn can_transition_to(self, to: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, to),
            (Pending | AwaitingHost, Accepted | Rejected | Cancelled) | (Accepted, Cancelled)
        )
    }

    /// Consult the transition table and return the new status, or
    /// `InvalidStatusTransition` for any pair not in the table.
    pub fn transition_to(self, to: BookingStatus) -> Result<BookingStatus> {
        if self.can_transition_to(to) {
            Ok(to)
        } else {
            Err(ValidationError::InvalidStatusTransition { from: self, to })
        }
    }

    /// Terminal states have no outgoing transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Rejected | BookingStatus::Cancelled)
    }

    /// Wire representation, matching the serde form.
    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::AwaitingHost => "AWAITING_HOST",
            BookingStatus::Accepted => "ACCEPTED",
            BookingStatus::Rejected => "REJECTED",
            BookingStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reschedule is modeled as "create new booking + transition the old one",
/// and a cancelled original is rejected here, before the state machine is
/// consulted, with its own error code.
pub fn validate_reschedule(current: BookingStatus) -> Result<()> {
    if current == BookingStatus::Cancelled {
        return Err(ValidationError::CancelledBookingsCannotBeRescheduled);
    }
    Ok(())
}

/// Recurrence frequency for a booking series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecurringFrequency {
    Daily,
    Weekly,
    Monthly,
}

impl RecurringFrequency {
    /// Maximum number of occurrences allowed per frequency.
    pub fn max_count(self) -> u32 {
        match self {
            RecurringFrequency::Daily => 365,
            RecurringFrequency::Weekly => 52,
            RecurringFrequency::Monthly => 12,
        }
    }
}

/// Configuration of a recurring booking series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringConfig {
    pub frequency: RecurringFrequency,
    pub interval: u32,
    pub count: u32,
}

impl RecurringConfig {
    /// `interval` must be in `1..=12` and `count` in
    /// `1..=frequency.max_count()`.
    pub fn validate(&self) -> Result<()> {
        if self.interval == 0 || self.interval > 12 {
            return Err(ValidationError::InvalidRecurrence(format!(
                "interval {} is out of range 1..=12",
                self.interval
            )));
        }
        let max = self.frequency.max_count();
        if self.count == 0 || self.count > max {
            return Err(ValidationError::InvalidRecurrence(format!(
                "count {} is out of range 1..={max}",
                self.count
            )));
        }
        Ok(())
    }
}
