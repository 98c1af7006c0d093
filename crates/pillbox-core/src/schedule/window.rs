//! Dose status evaluation against an availability window.
//!
//! Everything here is a pure function of the instants involved. Human
//! phrasing ("available in 10m") is left to the presentation layer; this
//! module only exposes the status and the raw durations behind it.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::model::{AvailabilityWindow, TimeOfDay};

/// Status of one dose occurrence at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoseStatus {
    Taken,
    Available,
    Upcoming,
    Overdue,
}

impl DoseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DoseStatus::Taken => "taken",
            DoseStatus::Available => "available",
            DoseStatus::Upcoming => "upcoming",
            DoseStatus::Overdue => "overdue",
        }
    }
}

impl std::fmt::Display for DoseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a dose scheduled at `scheduled_at` with window `[window_start, window_end]`.
///
/// A set taken bit dominates. Otherwise the window is inclusive at both ends.
/// An inverted window (`window_end < window_start`) is never available; the
/// dose is then overdue once `now` passes `scheduled_at` and upcoming before.
pub fn status(
    now: NaiveDateTime,
    scheduled_at: NaiveDateTime,
    window_start: NaiveDateTime,
    window_end: NaiveDateTime,
    taken: bool,
) -> DoseStatus {
    if taken {
        return DoseStatus::Taken;
    }
    if window_end < window_start {
        return if now > scheduled_at {
            DoseStatus::Overdue
        } else {
            DoseStatus::Upcoming
        };
    }
    if now < window_start {
        DoseStatus::Upcoming
    } else if now <= window_end {
        DoseStatus::Available
    } else {
        DoseStatus::Overdue
    }
}

/// The concrete instants of one occurrence's availability window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoseWindow {
    pub scheduled_at: NaiveDateTime,
    pub opens_at: NaiveDateTime,
    pub closes_at: NaiveDateTime,
}

impl DoseWindow {
    /// Apply window offsets to a scheduled instant. Windows may cross midnight.
    pub fn resolve(scheduled_at: NaiveDateTime, window: AvailabilityWindow) -> Self {
        Self {
            scheduled_at,
            opens_at: scheduled_at + Duration::minutes(i64::from(window.start_offset)),
            closes_at: scheduled_at + Duration::minutes(i64::from(window.end_offset)),
        }
    }

    /// The window of the occurrence at `time_of_day` on `date`.
    pub fn on(date: NaiveDate, time_of_day: TimeOfDay, window: AvailabilityWindow) -> Self {
        Self::resolve(time_of_day.on(date), window)
    }

    pub fn is_misconfigured(&self) -> bool {
        self.closes_at < self.opens_at
    }

    pub fn status(&self, now: NaiveDateTime, taken: bool) -> DoseStatus {
        status(now, self.scheduled_at, self.opens_at, self.closes_at, taken)
    }

    /// Time left until the dose becomes available (`now → opens_at`).
    ///
    /// For an inverted window this measures to the scheduled instant instead.
    pub fn until_available(&self, now: NaiveDateTime) -> Option<Duration> {
        let target = if self.is_misconfigured() {
            self.scheduled_at
        } else {
            self.opens_at
        };
        (now < target).then(|| target - now)
    }

    /// Time left before the window closes (`now → closes_at`), while available.
    pub fn until_closed(&self, now: NaiveDateTime) -> Option<Duration> {
        (self.status(now, false) == DoseStatus::Available).then(|| self.closes_at - now)
    }

    /// How long ago the window closed, once overdue.
    pub fn overdue_by(&self, now: NaiveDateTime) -> Option<Duration> {
        let closed = if self.is_misconfigured() {
            self.scheduled_at
        } else {
            self.closes_at
        };
        (now > closed).then(|| now - closed)
    }

    /// The duration a status line would render for `status`.
    pub fn remaining(&self, now: NaiveDateTime, taken: bool) -> Option<Duration> {
        match self.status(now, taken) {
            DoseStatus::Taken => None,
            DoseStatus::Upcoming => self.until_available(now),
            DoseStatus::Available => self.until_closed(now),
            DoseStatus::Overdue => self.overdue_by(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn aspirin_window() -> DoseWindow {
        DoseWindow::on(
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            "08:00".parse().unwrap(),
            AvailabilityWindow::DEFAULT,
        )
    }

    #[test]
    fn test_aspirin_scenario() {
        let window = aspirin_window();
        assert_eq!(window.opens_at, at(7, 45, 0));
        assert_eq!(window.closes_at, at(8, 15, 0));
        assert_eq!(window.status(at(8, 0, 0), false), DoseStatus::Available);
        assert_eq!(window.status(at(8, 20, 0), false), DoseStatus::Overdue);
        assert_eq!(window.status(at(8, 20, 0), true), DoseStatus::Taken);
    }

    #[test]
    fn test_taken_dominates_everywhere() {
        let window = aspirin_window();
        for now in [at(0, 0, 0), at(7, 45, 0), at(8, 0, 0), at(8, 15, 1), at(23, 59, 59)] {
            assert_eq!(window.status(now, true), DoseStatus::Taken);
        }
    }

    #[test]
    fn test_partition_boundaries_inclusive() {
        let window = aspirin_window();
        assert_eq!(window.status(at(7, 44, 59), false), DoseStatus::Upcoming);
        assert_eq!(window.status(at(7, 45, 0), false), DoseStatus::Available);
        assert_eq!(window.status(at(8, 15, 0), false), DoseStatus::Available);
        assert_eq!(window.status(at(8, 15, 1), false), DoseStatus::Overdue);
    }

    #[test]
    fn test_partition_exactly_one_state() {
        let window = aspirin_window();
        let start = at(6, 0, 0);
        for step in 0..(4 * 60) {
            let now = start + Duration::minutes(step);
            let s = window.status(now, false);
            let expected = if now < window.opens_at {
                DoseStatus::Upcoming
            } else if now <= window.closes_at {
                DoseStatus::Available
            } else {
                DoseStatus::Overdue
            };
            assert_eq!(s, expected, "at {}", now);
        }
    }

    #[test]
    fn test_inverted_window_falls_back_to_scheduled_time() {
        let window = DoseWindow::on(
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            "08:00".parse().unwrap(),
            AvailabilityWindow::new(10, -10),
        );
        assert!(window.is_misconfigured());
        assert_eq!(window.status(at(7, 55, 0), false), DoseStatus::Upcoming);
        assert_eq!(window.status(at(8, 0, 0), false), DoseStatus::Upcoming);
        assert_eq!(window.status(at(8, 0, 1), false), DoseStatus::Overdue);
        assert_eq!(window.until_available(at(7, 50, 0)), Some(Duration::minutes(10)));
        assert_eq!(window.until_closed(at(8, 0, 0)), None);
    }

    #[test]
    fn test_window_crosses_midnight() {
        let window = DoseWindow::on(
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            "00:05".parse().unwrap(),
            AvailabilityWindow::DEFAULT,
        );
        assert_eq!(window.opens_at, at(23, 50, 0));
        assert_eq!(window.status(at(23, 55, 0), false), DoseStatus::Available);
    }

    #[test]
    fn test_durations() {
        let window = aspirin_window();
        assert_eq!(window.remaining(at(7, 30, 0), false), Some(Duration::minutes(15)));
        assert_eq!(window.remaining(at(8, 10, 0), false), Some(Duration::minutes(5)));
        assert_eq!(window.remaining(at(8, 45, 0), false), Some(Duration::minutes(30)));
        assert_eq!(window.remaining(at(8, 10, 0), true), None);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&DoseStatus::Overdue).unwrap(),
            "\"overdue\""
        );
    }
}
