//! `slotwise` CLI — list bookable slots, validate a proposed booking, and
//! run business-day arithmetic from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # List available slots from a JSON request (stdin → stdout)
//! slotwise slots < request.json
//!
//! # From file to file
//! slotwise slots -i request.json -o slots.json
//!
//! # Validate one proposed slot; exits non-zero on a rule violation
//! slotwise validate -i booking.json
//!
//! # Business-day arithmetic
//! slotwise business-days --date 2024-12-06 --add 1
//! slotwise business-days --date 2024-12-13 --diff 2024-12-09
//! slotwise business-days --date 2024-12-01 --month --holiday 2024-12-25
//! ```

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc, Weekday};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use slotwise_engine::{
    list_available_slots, validate_booking_slot, BusinessCalendarConfig, BusyInterval,
    EventTypeConfig, PeriodLoad, Slot, ValidationError, WeeklySchedule,
};
use std::io::{self, Read};
use std::process;

#[derive(Parser)]
#[command(
    name = "slotwise",
    version,
    about = "Availability and booking-validation engine CLI"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available slots for a JSON availability request
    Slots {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Validate one proposed booking slot from a JSON request
    Validate {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Business-day arithmetic over a configurable working calendar
    BusinessDays {
        /// Reference date
        #[arg(long)]
        date: NaiveDate,
        /// Comma-separated working weekdays (default: Mon,Tue,Wed,Thu,Fri)
        #[arg(long)]
        weekdays: Option<String>,
        /// Holiday date in the configured format (repeatable)
        #[arg(long = "holiday")]
        holidays: Vec<String>,
        /// Additional working day in the configured format (repeatable)
        #[arg(long = "workday")]
        workdays: Vec<String>,
        /// chrono format string for holiday/workday matching
        #[arg(long, default_value = "%Y-%m-%d")]
        format: String,
        /// Add (or with a negative value, subtract) business days
        #[arg(long, allow_hyphen_values = true)]
        add: Option<i32>,
        /// Count business days from this date to --date
        #[arg(long)]
        diff: Option<NaiveDate>,
        /// List the business days of the month containing --date
        #[arg(long)]
        month: bool,
    },
}

/// Everything `slots` needs: the event type, the host's schedule and
/// calendar, and a snapshot of busy intervals.
#[derive(Deserialize)]
struct SlotsRequest {
    event_type: EventTypeConfig,
    schedule: WeeklySchedule,
    #[serde(default)]
    calendar: BusinessCalendarConfig,
    #[serde(default)]
    busy: Vec<BusyInterval>,
    range_start: NaiveDate,
    range_end: NaiveDate,
    now: DateTime<Utc>,
}

/// Everything `validate` needs: the event type, the candidate slot, busy
/// intervals, and the booker's current per-period counts.
#[derive(Deserialize)]
struct ValidateRequest {
    event_type: EventTypeConfig,
    slot: Slot,
    #[serde(default)]
    busy: Vec<BusyInterval>,
    #[serde(default)]
    load: PeriodLoad,
    now: DateTime<Utc>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Slots { input, output } => {
            let raw = read_input(input.as_deref())?;
            let request: SlotsRequest =
                serde_json::from_str(&raw).context("Failed to parse slots request")?;

            if let Err(err) = request.schedule.validate() {
                emit_failure(output.as_deref(), &err)?;
            }

            let slots = list_available_slots(
                &request.event_type,
                &request.schedule,
                &request.calendar,
                &request.busy,
                request.range_start,
                request.range_end,
                request.now,
            );
            let body = serde_json::to_string_pretty(&serde_json::json!({ "slots": slots }))?;
            write_output(output.as_deref(), &body)?;
        }
        Commands::Validate { input, output } => {
            let raw = read_input(input.as_deref())?;
            let request: ValidateRequest =
                serde_json::from_str(&raw).context("Failed to parse validate request")?;

            match validate_booking_slot(
                &request.event_type,
                request.slot,
                &request.busy,
                &request.load,
                request.now,
            ) {
                Ok(()) => {
                    let body = serde_json::to_string_pretty(&serde_json::json!({ "ok": true }))?;
                    write_output(output.as_deref(), &body)?;
                }
                Err(err) => emit_failure(output.as_deref(), &err)?,
            }
        }
        Commands::BusinessDays {
            date,
            weekdays,
            holidays,
            workdays,
            format,
            add,
            diff,
            month,
        } => {
            let mut calendar = BusinessCalendarConfig {
                holidays,
                holiday_format: format.clone(),
                additional_working_days: workdays,
                additional_working_day_format: format,
                ..BusinessCalendarConfig::default()
            };
            if let Some(raw) = weekdays {
                calendar.working_weekdays = parse_weekdays(&raw)?;
            }

            if let Some(n) = add {
                println!("{}", calendar.add_business_days(date, n));
            } else if let Some(other) = diff {
                println!("{}", calendar.business_diff(date, other));
            } else if month {
                for day in calendar.business_days_in_month(date) {
                    println!("{day}");
                }
            } else {
                println!("{}", calendar.is_business_day(date));
            }
        }
    }

    Ok(())
}

/// Print the wire error envelope a rule violation maps to, then exit 1.
/// The `message` field carries the error code verbatim; `status` is the
/// HTTP status the serving boundary would respond with.
fn emit_failure(output: Option<&str>, err: &ValidationError) -> Result<()> {
    let code = err.error_code();
    let body = serde_json::to_string_pretty(&serde_json::json!({
        "ok": false,
        "message": code.as_str(),
        "status": code.http_status(),
        "detail": err.to_string(),
    }))?;
    write_output(output, &body)?;
    process::exit(1);
}

/// Parse `Mon,Tue,Wed` style weekday lists. Empty segments are skipped, so a
/// trailing comma is harmless.
fn parse_weekdays(raw: &str) -> Result<Vec<Weekday>> {
    let mut out = Vec::new();
    for part in raw.split(',') {
        let trimmed = part.trim();
        if trimmed.is_empty() {
            continue;
        }
        let day: Weekday = trimmed
            .parse()
            .map_err(|_| anyhow::anyhow!("Unknown weekday: '{}'", trimmed))?;
        out.push(day);
    }
    Ok(out)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
