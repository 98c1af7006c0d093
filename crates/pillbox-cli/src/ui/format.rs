//! String formatting utilities for UI rendering.

use chrono::{Duration, NaiveDateTime};
use pillbox_core::{Schedule, Weekdays};

const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Truncate a string to max length, adding ellipsis if needed.
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        return s.to_string();
    }
    if max_len <= 3 {
        return s.chars().take(max_len).collect();
    }
    let truncated: String = s.chars().take(max_len - 3).collect();
    format!("{}...", truncated)
}

/// Sanitize a string for single-line output (replace newlines with spaces).
pub fn single_line(s: &str) -> String {
    s.replace('\n', " ").replace('\r', "")
}

/// Format a local timestamp for display.
pub fn format_timestamp(dt: &NaiveDateTime, pretty: bool) -> String {
    if pretty {
        dt.format("%Y-%m-%d %H:%M").to_string()
    } else {
        dt.format("%Y-%m-%dT%H:%M:%S").to_string()
    }
}

/// Compact duration: "45m", "2h 05m", "1d 3h".
pub fn format_duration(duration: Duration) -> String {
    let total = duration.num_minutes().max(0);
    let (days, hours, mins) = (total / 1440, (total % 1440) / 60, total % 60);
    if days > 0 {
        format!("{}d {}h", days, hours)
    } else if hours > 0 {
        format!("{}h {:02}m", hours, mins)
    } else {
        format!("{}m", mins)
    }
}

/// Weekday set as "Mon, Wed, Fri", "daily", or "never".
pub fn format_weekdays(days: &Weekdays) -> String {
    match days.len() {
        0 => "never".to_string(),
        7 => "daily".to_string(),
        _ => days
            .indices()
            .into_iter()
            .map(|d| DAY_NAMES[usize::from(d)])
            .collect::<Vec<_>>()
            .join(", "),
    }
}

/// Human description of when a schedule fires.
pub fn format_recurrence(schedule: &Schedule) -> String {
    match schedule.trigger_days() {
        Some(days) => format_weekdays(&days),
        None => "daily".to_string(),
    }
}

/// "in 5 days", "today", "2 days ago".
pub fn format_days_left(days: i64) -> String {
    match days {
        0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        -1 => "yesterday".to_string(),
        d if d > 1 => format!("in {} days", d),
        d => format!("{} days ago", -d),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short() {
        assert_eq!(truncate("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_long() {
        assert_eq!(truncate("hello world", 8), "hello...");
    }

    #[test]
    fn test_truncate_very_short_max() {
        assert_eq!(truncate("hello", 2), "he");
    }

    #[test]
    fn test_single_line() {
        assert_eq!(single_line("take\r\nwith food"), "take with food");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::minutes(45)), "45m");
        assert_eq!(format_duration(Duration::minutes(125)), "2h 05m");
        assert_eq!(format_duration(Duration::minutes(1440 + 190)), "1d 3h");
        assert_eq!(format_duration(Duration::minutes(-5)), "0m");
    }

    #[test]
    fn test_format_weekdays() {
        assert_eq!(format_weekdays(&"1,3,5".parse().unwrap()), "Mon, Wed, Fri");
        assert_eq!(format_weekdays(&Weekdays::EVERY_DAY), "daily");
        assert_eq!(format_weekdays(&Weekdays::empty()), "never");
    }

    #[test]
    fn test_format_days_left() {
        assert_eq!(format_days_left(0), "today");
        assert_eq!(format_days_left(1), "tomorrow");
        assert_eq!(format_days_left(15), "in 15 days");
        assert_eq!(format_days_left(-3), "3 days ago");
    }
}
