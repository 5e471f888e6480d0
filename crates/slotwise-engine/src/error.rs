//! Validation error taxonomy and the wire error codes surfaced to callers.
//!
//! Expected validation outcomes are typed failures, never panics: a false
//! negative in slot validation would allow a double-booking, so every rule
//! violation is an explicit [`ValidationError`]. The HTTP layer (outside this
//! crate) maps each [`ErrorCode`] to a status and puts the code verbatim into
//! the response's `message` field.

use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::availability::LimitPeriod;
use crate::booking::BookingStatus;
use crate::interval::{Slot, TimeInterval};
use crate::schedule::TimeOfDay;

/// A rule violation detected by the engine, with enough context for
/// caller-side messaging.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Malformed interval: `start` must be strictly before `end`, and a
    /// candidate slot's span must equal the event type's duration.
    #[error("invalid interval: start {start} must be before end {end}")]
    InvalidInterval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// Two working-hours rules overlap on the same weekday.
    #[error("working-hours rules overlap on {weekday}")]
    InvalidScheduleOverlap { weekday: Weekday },

    /// A working-hours range ends at or before its start.
    #[error("working-hours range {start} to {end} is empty or inverted")]
    InvalidScheduleRange { start: TimeOfDay, end: TimeOfDay },

    /// The candidate slot overlaps a busy interval, buffer footprint included.
    #[error("slot {slot:?} conflicts with busy interval {busy:?}")]
    SlotConflict { slot: Slot, busy: TimeInterval },

    /// The candidate starts before `now + minimum_notice_minutes`.
    #[error("slot start {slot_start} is before the earliest bookable time {earliest}")]
    NoticeViolation {
        slot_start: DateTime<Utc>,
        earliest: DateTime<Utc>,
    },

    /// The candidate starts beyond the future-booking horizon.
    #[error("slot start {slot_start} is beyond the booking horizon {latest}")]
    HorizonViolation {
        slot_start: DateTime<Utc>,
        latest: DateTime<Utc>,
    },

    /// A per-period booking counter has reached its configured maximum.
    /// The limit is the first count that is *not* allowed: count == limit
    /// already rejects.
    #[error("booking limit reached for {period}: {count} of {limit}")]
    BookingLimitExceeded {
        period: LimitPeriod,
        count: u32,
        limit: u32,
    },

    /// The requested status transition is not in the transition table.
    #[error("invalid booking status transition: {from} -> {to}")]
    InvalidStatusTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    /// Reschedule was requested for a booking that is already cancelled.
    /// Checked before the state machine is consulted.
    #[error("cancelled bookings cannot be rescheduled")]
    CancelledBookingsCannotBeRescheduled,

    /// A recurring-series configuration is out of bounds.
    #[error("invalid recurring configuration: {0}")]
    InvalidRecurrence(String),
}

impl ValidationError {
    /// The wire error code this validation failure surfaces as.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            ValidationError::SlotConflict { .. } => ErrorCode::BookingConflict,
            ValidationError::NoticeViolation { .. } | ValidationError::HorizonViolation { .. } => {
                ErrorCode::BookingTimeOutOfBounds
            }
            ValidationError::BookingLimitExceeded { .. } => ErrorCode::BookerLimitExceeded,
            ValidationError::CancelledBookingsCannotBeRescheduled => {
                ErrorCode::CancelledBookingsCannotBeRescheduled
            }
            ValidationError::InvalidInterval { .. }
            | ValidationError::InvalidScheduleOverlap { .. }
            | ValidationError::InvalidScheduleRange { .. }
            | ValidationError::InvalidStatusTransition { .. }
            | ValidationError::InvalidRecurrence(_) => ErrorCode::RequestBodyInvalid,
        }
    }
}

pub type Result<T> = std::result::Result<T, ValidationError>;

/// Machine-readable error codes consumed by the HTTP boundary.
///
/// Each code maps to exactly one HTTP status via [`ErrorCode::http_status`]
/// and is carried verbatim as the response's `message` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    RequestBodyInvalid,
    EventTypeNotFound,
    BookingNotFound,
    NoAvailableUsersFound,
    BookerLimitExceeded,
    BookingTimeOutOfBounds,
    CancelledBookingsCannotBeRescheduled,
    BookingConflict,
    BookerEmailBlocked,
    InvalidVerificationCode,
}

impl ErrorCode {
    /// The code as it appears in the response `message` field.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::RequestBodyInvalid => "RequestBodyInvalid",
            ErrorCode::EventTypeNotFound => "EventTypeNotFound",
            ErrorCode::BookingNotFound => "BookingNotFound",
            ErrorCode::NoAvailableUsersFound => "NoAvailableUsersFound",
            ErrorCode::BookerLimitExceeded => "BookerLimitExceeded",
            ErrorCode::BookingTimeOutOfBounds => "BookingTimeOutOfBounds",
            ErrorCode::CancelledBookingsCannotBeRescheduled => {
                "CancelledBookingsCannotBeRescheduled"
            }
            ErrorCode::BookingConflict => "BookingConflict",
            ErrorCode::BookerEmailBlocked => "BookerEmailBlocked",
            ErrorCode::InvalidVerificationCode => "InvalidVerificationCode",
        }
    }

    /// HTTP status the boundary responds with for this code.
    ///
    /// `BookerEmailBlocked` and `InvalidVerificationCode` have no explicit
    /// mapping in the handler and fall through to 500. Whether that is
    /// intentional is an open question upstream; the behavior is preserved
    /// here rather than silently folded into 4xx.
    pub fn http_status(self) -> u16 {
        match self {
            ErrorCode::RequestBodyInvalid
            | ErrorCode::EventTypeNotFound
            | ErrorCode::NoAvailableUsersFound
            | ErrorCode::BookerLimitExceeded
            | ErrorCode::BookingTimeOutOfBounds
            | ErrorCode::CancelledBookingsCannotBeRescheduled => 400,
            ErrorCode::BookingNotFound => 404,
            ErrorCode::BookingConflict => 409,
            ErrorCode::BookerEmailBlocked | ErrorCode::InvalidVerificationCode => 500,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
