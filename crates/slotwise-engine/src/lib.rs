//! # slotwise-engine
//!
//! Deterministic availability and booking validation for calendar scheduling.
//!
//! The engine answers two questions given an event type's configuration, a
//! weekly schedule, a business calendar, and a snapshot of busy intervals:
//! which slots are bookable over a date range, and whether one proposed slot
//! passes every temporal constraint (conflicts, buffers, notice, horizon,
//! booking limits). Every function is a pure computation over its inputs —
//! the caller supplies `now`, the engine never reads the system clock, holds
//! no state, and is safely callable from concurrent requests.
//!
//! ## Modules
//!
//! - [`business_calendar`] — holiday/business-day arithmetic
//! - [`interval`] — UTC time intervals, busy sources, and the merge sweep
//! - [`schedule`] — working-hours rules, date overrides, timezone windows
//! - [`slots`] — stride-based candidate slot generation for one working window
//! - [`availability`] — the composition root: list slots, validate one slot
//! - [`booking`] — booking status state machine and recurrence validation
//! - [`error`] — validation error taxonomy and wire error codes

pub mod availability;
pub mod booking;
pub mod business_calendar;
pub mod error;
pub mod interval;
pub mod schedule;
pub mod slots;

pub use availability::{
    list_available_slots, validate_booking_slot, BookingLimits, EventTypeConfig, LimitPeriod,
    PeriodLoad,
};
pub use booking::{validate_reschedule, BookingStatus, RecurringConfig, RecurringFrequency};
pub use business_calendar::BusinessCalendarConfig;
pub use error::{ErrorCode, Result, ValidationError};
pub use interval::{merge_busy_intervals, BusyInterval, BusySource, Slot, TimeInterval};
pub use schedule::{DateOverride, TimeOfDay, WeeklySchedule, WorkingHoursRule};
pub use slots::generate_slots;
