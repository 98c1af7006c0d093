//! Expansion of recurring schedules into concrete daily occurrences.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use super::window::{DoseStatus, DoseWindow};
use crate::model::{Medication, Schedule, TimeOfDay};

/// One calendar-day instance of a recurring schedule.
///
/// Derived on demand and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleOccurrence {
    pub medication_id: String,
    pub schedule_id: String,
    pub medication_name: String,
    pub dosage: String,
    pub color: String,
    pub date: NaiveDate,
    pub time_of_day: TimeOfDay,
    pub window: DoseWindow,
    pub taken: bool,
}

impl ScheduleOccurrence {
    fn project(medication: &Medication, schedule: &Schedule, date: NaiveDate) -> Self {
        Self {
            medication_id: medication.id.clone(),
            schedule_id: schedule.id.clone(),
            medication_name: medication.name.clone(),
            dosage: medication.dosage.clone(),
            color: medication.color.clone(),
            date,
            time_of_day: schedule.time_of_day,
            window: DoseWindow::on(date, schedule.time_of_day, schedule.window()),
            taken: schedule.is_taken_on(date),
        }
    }

    pub fn scheduled_at(&self) -> NaiveDateTime {
        self.window.scheduled_at
    }

    pub fn status(&self, now: NaiveDateTime) -> DoseStatus {
        self.window.status(now, self.taken)
    }
}

/// All occurrences on `date`, ascending by time of day.
///
/// Ties are broken by medication id, then schedule id. Inactive medications
/// and disabled schedules contribute nothing.
pub fn occurrences_on(date: NaiveDate, medications: &[Medication]) -> Vec<ScheduleOccurrence> {
    let mut occurrences: Vec<ScheduleOccurrence> = medications
        .iter()
        .filter(|m| m.active)
        .flat_map(|m| {
            m.schedules
                .iter()
                .filter(move |s| s.fires_on(date))
                .map(move |s| ScheduleOccurrence::project(m, s, date))
        })
        .collect();
    occurrences.sort_by(|a, b| {
        a.time_of_day
            .cmp(&b.time_of_day)
            .then_with(|| a.medication_id.cmp(&b.medication_id))
            .then_with(|| a.schedule_id.cmp(&b.schedule_id))
    });
    occurrences
}

/// The closest not-yet-taken occurrence later today.
///
/// Only today's occurrences are considered; once everything is done or past
/// this returns `None` rather than rolling over to tomorrow.
pub fn next_occurrence(
    now: NaiveDateTime,
    medications: &[Medication],
) -> Option<ScheduleOccurrence> {
    occurrences_on(now.date(), medications)
        .into_iter()
        .find(|o| !o.taken && o.scheduled_at() > now)
}

/// Calendar day of the dose that "take it now" refers to.
///
/// The occurrence whose availability window contains `now` wins, checking
/// today before tomorrow and yesterday. A window that opens before midnight
/// thus credits the next day's dose. Otherwise it is `now`'s date.
pub fn dose_date(schedule: &Schedule, now: NaiveDateTime) -> NaiveDate {
    let today = now.date();
    [Some(today), today.succ_opt(), today.pred_opt()]
        .into_iter()
        .flatten()
        .filter(|date| schedule.fires_on(*date))
        .find(|date| {
            let window = DoseWindow::on(*date, schedule.time_of_day, schedule.window());
            window.status(now, false) == DoseStatus::Available
        })
        .unwrap_or(today)
}

/// Occurrences sharing one display bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeGroup {
    /// Start of the bucket (the exact minute, or the top of the hour)
    pub time: TimeOfDay,
    pub occurrences: Vec<ScheduleOccurrence>,
}

/// Group occurrences by exact minute, buckets ascending.
pub fn group_by_time(occurrences: &[ScheduleOccurrence]) -> Vec<TimeGroup> {
    group_by(occurrences, |o| o.time_of_day)
}

/// Group occurrences by hour, buckets ascending.
pub fn group_by_hour(occurrences: &[ScheduleOccurrence]) -> Vec<TimeGroup> {
    group_by(occurrences, |o| o.time_of_day.truncate_to_hour())
}

fn group_by(
    occurrences: &[ScheduleOccurrence],
    bucket: impl Fn(&ScheduleOccurrence) -> TimeOfDay,
) -> Vec<TimeGroup> {
    let mut buckets: BTreeMap<TimeOfDay, Vec<ScheduleOccurrence>> = BTreeMap::new();
    for occurrence in occurrences {
        buckets
            .entry(bucket(occurrence))
            .or_default()
            .push(occurrence.clone());
    }
    buckets
        .into_iter()
        .map(|(time, occurrences)| TimeGroup { time, occurrences })
        .collect()
}

/// Home-screen statistics for one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DaySummary {
    pub total: usize,
    pub taken: usize,
    pub available: usize,
    pub upcoming: usize,
    pub overdue: usize,
}

pub fn summarize(occurrences: &[ScheduleOccurrence], now: NaiveDateTime) -> DaySummary {
    let mut summary = DaySummary {
        total: occurrences.len(),
        ..DaySummary::default()
    };
    for occurrence in occurrences {
        match occurrence.status(now) {
            DoseStatus::Taken => summary.taken += 1,
            DoseStatus::Available => summary.available += 1,
            DoseStatus::Upcoming => summary.upcoming += 1,
            DoseStatus::Overdue => summary.overdue += 1,
        }
    }
    summary
}
