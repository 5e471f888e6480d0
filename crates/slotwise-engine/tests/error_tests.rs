//! Tests for error-code mapping and HTTP statuses at the wire boundary.

use chrono::{TimeZone, Utc};
use slotwise_engine::{
    BookingStatus, ErrorCode, LimitPeriod, Slot, TimeInterval, ValidationError,
};

#[test]
fn each_code_maps_to_its_http_status() {
    assert_eq!(ErrorCode::RequestBodyInvalid.http_status(), 400);
    assert_eq!(ErrorCode::EventTypeNotFound.http_status(), 400);
    assert_eq!(ErrorCode::NoAvailableUsersFound.http_status(), 400);
    assert_eq!(ErrorCode::BookerLimitExceeded.http_status(), 400);
    assert_eq!(ErrorCode::BookingTimeOutOfBounds.http_status(), 400);
    assert_eq!(
        ErrorCode::CancelledBookingsCannotBeRescheduled.http_status(),
        400
    );
    assert_eq!(ErrorCode::BookingNotFound.http_status(), 404);
    assert_eq!(ErrorCode::BookingConflict.http_status(), 409);

    // These two have no explicit handler mapping and fall through to 500.
    assert_eq!(ErrorCode::BookerEmailBlocked.http_status(), 500);
    assert_eq!(ErrorCode::InvalidVerificationCode.http_status(), 500);
}

#[test]
fn codes_render_verbatim_in_the_message_field() {
    assert_eq!(ErrorCode::BookingConflict.to_string(), "BookingConflict");
    assert_eq!(
        ErrorCode::BookingTimeOutOfBounds.as_str(),
        "BookingTimeOutOfBounds"
    );
    assert_eq!(
        ErrorCode::CancelledBookingsCannotBeRescheduled.to_string(),
        "CancelledBookingsCannotBeRescheduled"
    );
    assert_eq!(
        serde_json::to_string(&ErrorCode::BookerLimitExceeded).unwrap(),
        r#""BookerLimitExceeded""#
    );
}

#[test]
fn validation_failures_surface_the_expected_codes() {
    let start = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2024, 1, 15, 11, 0, 0).unwrap();
    let busy = TimeInterval::new(start, end).unwrap();

    let conflict = ValidationError::SlotConflict {
        slot: Slot { start, end },
        busy,
    };
    assert_eq!(conflict.error_code(), ErrorCode::BookingConflict);

    let notice = ValidationError::NoticeViolation {
        slot_start: start,
        earliest: end,
    };
    assert_eq!(notice.error_code(), ErrorCode::BookingTimeOutOfBounds);

    let horizon = ValidationError::HorizonViolation {
        slot_start: end,
        latest: start,
    };
    assert_eq!(horizon.error_code(), ErrorCode::BookingTimeOutOfBounds);

    let limit = ValidationError::BookingLimitExceeded {
        period: LimitPeriod::PerDay,
        count: 5,
        limit: 5,
    };
    assert_eq!(limit.error_code(), ErrorCode::BookerLimitExceeded);

    assert_eq!(
        ValidationError::CancelledBookingsCannotBeRescheduled.error_code(),
        ErrorCode::CancelledBookingsCannotBeRescheduled
    );

    let shape = ValidationError::InvalidInterval { start: end, end: start };
    assert_eq!(shape.error_code(), ErrorCode::RequestBodyInvalid);

    let transition = ValidationError::InvalidStatusTransition {
        from: BookingStatus::Accepted,
        to: BookingStatus::Pending,
    };
    assert_eq!(transition.error_code(), ErrorCode::RequestBodyInvalid);

    let recurrence = ValidationError::InvalidRecurrence("count 0 is out of range".into());
    assert_eq!(recurrence.error_code(), ErrorCode::RequestBodyInvalid);
}

#[test]
fn messages_carry_enough_context_for_callers() {
    let limit = ValidationError::BookingLimitExceeded {
        period: LimitPeriod::PerWeek,
        count: 15,
        limit: 15,
    };
    let text = limit.to_string();
    assert!(text.contains("PER_WEEK"), "got: {text}");
    assert!(text.contains("15"), "got: {text}");
}
