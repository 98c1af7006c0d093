//! Parsing helpers for dates, times, weekday sets and windows.
//!
//! Every failure is a [`CliError::InvalidInput`] so it exits with the
//! invalid-input code.

use chrono::NaiveDate;
use chrono_tz::Tz;
use pillbox_core::{AvailabilityWindow, TimeOfDay, Weekdays};

use crate::errors::CliError;

/// Parse a calendar date (YYYY-MM-DD).
pub fn parse_date(value: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        CliError::invalid_input(format!("Invalid date (expected YYYY-MM-DD): {}", value)).into()
    })
}

/// Parse a time of day (H:MM or HH:MM).
pub fn parse_time(value: &str) -> anyhow::Result<TimeOfDay> {
    value.trim().parse::<TimeOfDay>().map_err(|_| {
        CliError::invalid_input(format!("Invalid time (expected HH:MM): {}", value)).into()
    })
}

/// Parse a weekday set ("1,3,5" with 0 = Sunday, or "mon,wed,fri").
pub fn parse_days(value: &str) -> anyhow::Result<Weekdays> {
    let days: Weekdays = value.parse().map_err(|_| {
        CliError::invalid_input(format!(
            "Invalid weekdays: {} (use 0-6 with 0 = Sunday, or names like mon,wed)",
            value
        ))
    })?;
    if days.is_empty() {
        return Err(CliError::invalid_input("--days needs at least one weekday").into());
    }
    Ok(days)
}

/// Parse an availability window as "START,END" minute offsets (e.g. "-15,30").
pub fn parse_window(value: &str) -> anyhow::Result<AvailabilityWindow> {
    let invalid = || {
        CliError::invalid_input(format!(
            "Invalid window: {} (expected START,END minutes, e.g. -15,15)",
            value
        ))
    };
    let (start, end) = value.split_once(',').ok_or_else(invalid)?;
    let start: i32 = start.trim().parse().map_err(|_| invalid())?;
    let end: i32 = end.trim().parse().map_err(|_| invalid())?;
    let window = AvailabilityWindow::new(start, end);
    if window.is_misconfigured() {
        return Err(CliError::invalid_input(format!(
            "Window end ({}) is before its start ({})",
            end, start
        ))
        .into());
    }
    Ok(window)
}

/// Parse an IANA timezone name.
pub fn parse_timezone(value: &str) -> anyhow::Result<Tz> {
    value.trim().parse::<Tz>().map_err(|_| {
        CliError::invalid_input(format!("Unknown timezone: {} (use an IANA name)", value)).into()
    })
}
