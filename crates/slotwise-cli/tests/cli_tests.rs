//! Integration tests for the `slotwise` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the slots,
//! validate, and business-days subcommands through the actual binary,
//! including stdin/stdout piping, file I/O, and exit codes.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: path to the slots_request.json fixture.
fn slots_request_path() -> &'static str {
    concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/slots_request.json"
    )
}

/// Helper: path to the validate_ok.json fixture.
fn validate_ok_path() -> &'static str {
    concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/validate_ok.json"
    )
}

/// Helper: path to the validate_conflict.json fixture.
fn validate_conflict_path() -> &'static str {
    concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/validate_conflict.json"
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Slots subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn slots_from_file_to_stdout() {
    // A full open Monday with 30-minute slots: 09:00 through 16:30.
    Command::cargo_bin("slotwise")
        .unwrap()
        .args(["slots", "-i", slots_request_path()])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-01-15T09:00:00Z"))
        .stdout(predicate::str::contains("2024-01-15T16:30:00Z"));
}

#[test]
fn slots_from_stdin() {
    let request = std::fs::read_to_string(slots_request_path()).expect("fixture must exist");

    Command::cargo_bin("slotwise")
        .unwrap()
        .arg("slots")
        .write_stdin(request)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"slots\""))
        .stdout(predicate::str::contains("2024-01-15T09:00:00Z"));
}

#[test]
fn slots_to_output_file() {
    let output_path = "/tmp/slotwise-test-slots-output.json";
    let _ = std::fs::remove_file(output_path);

    Command::cargo_bin("slotwise")
        .unwrap()
        .args(["slots", "-i", slots_request_path(), "-o", output_path])
        .assert()
        .success();

    let content = std::fs::read_to_string(output_path).expect("output file must exist");
    let value: serde_json::Value = serde_json::from_str(&content).expect("output is valid JSON");
    let slots = value["slots"].as_array().expect("slots is an array");
    assert_eq!(slots.len(), 16, "full Monday yields 16 half-hour slots");

    let _ = std::fs::remove_file(output_path);
}

#[test]
fn slots_result_is_structured_json() {
    let output = Command::cargo_bin("slotwise")
        .unwrap()
        .args(["slots", "-i", slots_request_path()])
        .output()
        .expect("slots should succeed");
    assert!(output.status.success());

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is valid JSON");
    let slots = value["slots"].as_array().expect("slots is an array");
    assert_eq!(slots[0]["start"], "2024-01-15T09:00:00Z");
    assert_eq!(slots[0]["end"], "2024-01-15T09:30:00Z");
}

#[test]
fn slots_with_invalid_json_fails() {
    Command::cargo_bin("slotwise")
        .unwrap()
        .arg("slots")
        .write_stdin("this is not valid json {{{")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse"));
}

#[test]
fn slots_rejects_an_overlapping_schedule() {
    // Two Monday rules overlap 12:00-13:00: schedule validation fails
    // before any slot is computed.
    let request = r#"{
        "event_type": { "duration_minutes": 30 },
        "schedule": {
            "timezone": "UTC",
            "rules": [
                { "weekdays": ["Mon"], "start": "09:00", "end": "13:00" },
                { "weekdays": ["Mon"], "start": "12:00", "end": "17:00" }
            ]
        },
        "range_start": "2024-01-15",
        "range_end": "2024-01-15",
        "now": "2024-01-01T00:00:00Z"
    }"#;

    Command::cargo_bin("slotwise")
        .unwrap()
        .arg("slots")
        .write_stdin(request)
        .assert()
        .failure()
        .stdout(predicate::str::contains("RequestBodyInvalid"))
        .stdout(predicate::str::contains("400"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Validate subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn validate_accepts_a_clear_slot() {
    Command::cargo_bin("slotwise")
        .unwrap()
        .args(["validate", "-i", validate_ok_path()])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"ok\": true"));
}

#[test]
fn validate_rejects_a_buffered_conflict() {
    // The candidate touches only the 15-minute buffer after an existing
    // booking, which is still a conflict.
    Command::cargo_bin("slotwise")
        .unwrap()
        .args(["validate", "-i", validate_conflict_path()])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"ok\": false"))
        .stdout(predicate::str::contains("BookingConflict"))
        .stdout(predicate::str::contains("409"));
}

#[test]
fn validate_reports_limit_violations_with_status_400() {
    let request = r#"{
        "event_type": {
            "duration_minutes": 30,
            "booking_limits": { "PER_DAY": 2 }
        },
        "slot": {
            "start": "2024-01-15T09:00:00Z",
            "end": "2024-01-15T09:30:00Z"
        },
        "load": { "per_day": 2 },
        "now": "2024-01-01T00:00:00Z"
    }"#;

    Command::cargo_bin("slotwise")
        .unwrap()
        .arg("validate")
        .write_stdin(request)
        .assert()
        .failure()
        .stdout(predicate::str::contains("BookerLimitExceeded"))
        .stdout(predicate::str::contains("400"));
}

#[test]
fn validate_with_invalid_json_fails() {
    Command::cargo_bin("slotwise")
        .unwrap()
        .arg("validate")
        .write_stdin("{ not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse"));
}

#[test]
fn validate_rejects_an_inverted_busy_interval() {
    // The interval invariant is enforced at deserialization.
    let request = r#"{
        "event_type": { "duration_minutes": 30 },
        "slot": {
            "start": "2024-01-15T09:00:00Z",
            "end": "2024-01-15T09:30:00Z"
        },
        "busy": [
            {
                "start": "2024-01-15T11:00:00Z",
                "end": "2024-01-15T10:00:00Z",
                "source": "calendar-sync"
            }
        ],
        "now": "2024-01-01T00:00:00Z"
    }"#;

    Command::cargo_bin("slotwise")
        .unwrap()
        .arg("validate")
        .write_stdin(request)
        .assert()
        .failure();
}

// ─────────────────────────────────────────────────────────────────────────────
// Business-days subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn business_days_add_skips_the_weekend() {
    // Friday 2024-12-06 + 1 business day lands on Monday.
    Command::cargo_bin("slotwise")
        .unwrap()
        .args(["business-days", "--date", "2024-12-06", "--add", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-12-09"));
}

#[test]
fn business_days_add_negative_walks_backward() {
    Command::cargo_bin("slotwise")
        .unwrap()
        .args(["business-days", "--date", "2024-12-09", "--add", "-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-12-06"));
}

#[test]
fn business_days_diff_counts_working_days() {
    // Friday 2024-12-13 is four business days after Monday 2024-12-09.
    Command::cargo_bin("slotwise")
        .unwrap()
        .args(["business-days", "--date", "2024-12-13", "--diff", "2024-12-09"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^4\n$").unwrap());
}

#[test]
fn business_days_month_lists_the_working_days() {
    Command::cargo_bin("slotwise")
        .unwrap()
        .args(["business-days", "--date", "2024-12-01", "--month"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-12-02"))
        .stdout(predicate::str::contains("2024-12-31"))
        .stdout(predicate::str::contains("2024-12-07").not());
}

#[test]
fn business_days_default_reports_membership() {
    Command::cargo_bin("slotwise")
        .unwrap()
        .args(["business-days", "--date", "2024-12-09"])
        .assert()
        .success()
        .stdout(predicate::str::contains("true"));

    // Saturday.
    Command::cargo_bin("slotwise")
        .unwrap()
        .args(["business-days", "--date", "2024-12-07"])
        .assert()
        .success()
        .stdout(predicate::str::contains("false"));
}

#[test]
fn business_days_honors_holidays() {
    Command::cargo_bin("slotwise")
        .unwrap()
        .args([
            "business-days",
            "--date",
            "2024-12-25",
            "--holiday",
            "2024-12-25",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("false"));
}

#[test]
fn business_days_workday_overrides_holiday() {
    Command::cargo_bin("slotwise")
        .unwrap()
        .args([
            "business-days",
            "--date",
            "2024-12-25",
            "--holiday",
            "2024-12-25",
            "--workday",
            "2024-12-25",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("true"));
}

#[test]
fn business_days_accepts_a_custom_weekday_set() {
    // Saturday is a working day for a Tue-Sat operation.
    Command::cargo_bin("slotwise")
        .unwrap()
        .args([
            "business-days",
            "--date",
            "2024-12-07",
            "--weekdays",
            "Tue,Wed,Thu,Fri,Sat",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("true"));
}

#[test]
fn business_days_rejects_an_unknown_weekday() {
    Command::cargo_bin("slotwise")
        .unwrap()
        .args([
            "business-days",
            "--date",
            "2024-12-09",
            "--weekdays",
            "Mon,Funday",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown weekday"));
}

// ─────────────────────────────────────────────────────────────────────────────
// General CLI behavior
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn help_flag_shows_usage() {
    Command::cargo_bin("slotwise")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("slots"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("business-days"));
}

#[test]
fn unknown_subcommand_fails() {
    Command::cargo_bin("slotwise")
        .unwrap()
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error").or(predicate::str::contains("unrecognized")));
}
