//! Medication and schedule records.
//!
//! These are the persisted shapes stored under the `"medications"` key. Field
//! names are camelCase on the wire.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::time::{weekday_index, TimeOfDay, Weekdays};
use crate::error::{PillboxError, Result};

/// Default half-width of an availability window, in minutes.
pub const DEFAULT_WINDOW_MINUTES: i32 = 15;

/// Default display color for new medications.
pub const DEFAULT_COLOR: &str = "#4caf50";

fn default_true() -> bool {
    true
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

/// Availability window as signed minute offsets around a schedule's time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityWindow {
    pub start_offset: i32,
    pub end_offset: i32,
}

impl AvailabilityWindow {
    pub const DEFAULT: AvailabilityWindow = AvailabilityWindow {
        start_offset: -DEFAULT_WINDOW_MINUTES,
        end_offset: DEFAULT_WINDOW_MINUTES,
    };

    pub fn new(start_offset: i32, end_offset: i32) -> Self {
        Self {
            start_offset,
            end_offset,
        }
    }

    /// A window that closes before it opens can never be available.
    pub fn is_misconfigured(&self) -> bool {
        self.end_offset < self.start_offset
    }
}

impl Default for AvailabilityWindow {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Per-occurrence taken state.
///
/// `Single` schedules fire every day and keep one bit plus the day it was set
/// for. `Weekly` schedules fire on their selected weekdays and keep one bit
/// per weekday plus the history of dates the dose was taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Adherence {
    Single {
        #[serde(default)]
        taken: bool,
        #[serde(rename = "takenOn", default, skip_serializing_if = "Option::is_none")]
        taken_on: Option<NaiveDate>,
    },
    Weekly {
        #[serde(rename = "taken", default)]
        taken_by_day: [bool; 7],
        #[serde(rename = "takenDates", default)]
        taken_dates: Vec<NaiveDate>,
    },
}

impl Adherence {
    pub fn single() -> Self {
        Adherence::Single {
            taken: false,
            taken_on: None,
        }
    }

    pub fn weekly() -> Self {
        Adherence::Weekly {
            taken_by_day: [false; 7],
            taken_dates: Vec::new(),
        }
    }
}

/// A recurring dosing time owned by a medication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: String,

    /// Back-reference to the owning medication
    pub medication_id: String,

    pub time_of_day: TimeOfDay,

    /// Only consulted by weekly schedules
    #[serde(default)]
    pub days_of_week: Weekdays,

    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Minutes relative to `time_of_day` (usually negative)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_start: Option<i32>,

    /// Minutes relative to `time_of_day`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_end: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_taken_date: Option<NaiveDateTime>,

    #[serde(flatten)]
    pub adherence: Adherence,
}

impl Schedule {
    /// The explicit window when one is stored, otherwise the ±15 minute default.
    pub fn window(&self) -> AvailabilityWindow {
        let default = AvailabilityWindow::DEFAULT;
        AvailabilityWindow {
            start_offset: self.window_start.unwrap_or(default.start_offset),
            end_offset: self.window_end.unwrap_or(default.end_offset),
        }
    }

    pub fn is_weekly(&self) -> bool {
        matches!(self.adherence, Adherence::Weekly { .. })
    }

    /// Weekdays a trigger must be bound to, or `None` for a daily trigger.
    pub fn trigger_days(&self) -> Option<Weekdays> {
        match self.adherence {
            Adherence::Single { .. } => None,
            Adherence::Weekly { .. } => Some(self.days_of_week),
        }
    }

    /// Whether this schedule has any day it could fire on.
    pub fn fires_at_all(&self) -> bool {
        self.enabled && self.trigger_days().map_or(true, |days| !days.is_empty())
    }

    /// Whether this schedule produces an occurrence on `date`.
    pub fn fires_on(&self, date: NaiveDate) -> bool {
        self.enabled
            && self
                .trigger_days()
                .map_or(true, |days| days.contains(date.weekday()))
    }

    /// The single taken bit for `date`.
    ///
    /// A set bit only counts for the calendar day it was recorded for.
    pub fn is_taken_on(&self, date: NaiveDate) -> bool {
        match &self.adherence {
            Adherence::Single { taken, taken_on } => {
                *taken && self.single_taken_on(*taken_on) == Some(date)
            }
            Adherence::Weekly {
                taken_by_day,
                taken_dates,
            } => {
                taken_by_day[weekday_index(date.weekday()) as usize]
                    && taken_dates.contains(&date)
            }
        }
    }

    /// Day a single bit belongs to. Records without `takenOn` fall back to
    /// the `lastTakenDate` stamp.
    pub(crate) fn single_taken_on(&self, taken_on: Option<NaiveDate>) -> Option<NaiveDate> {
        taken_on.or_else(|| self.last_taken_date.map(|at| at.date()))
    }

    /// Dates this dose is recorded as taken.
    ///
    /// Weekly schedules keep a full history; single schedules only know the
    /// last one.
    pub fn taken_history(&self) -> Vec<NaiveDate> {
        match &self.adherence {
            Adherence::Weekly { taken_dates, .. } => taken_dates.clone(),
            Adherence::Single { .. } => self
                .last_taken_date
                .map(|at| vec![at.date()])
                .unwrap_or_default(),
        }
    }

    fn validate(&self, medication_id: &str) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(PillboxError::Validation(
                "Schedule id must not be empty".to_string(),
            ));
        }
        if self.medication_id != medication_id {
            return Err(PillboxError::Validation(format!(
                "Schedule {} belongs to medication {}, not {}",
                self.id, self.medication_id, medication_id
            )));
        }
        if self.window().is_misconfigured() {
            return Err(PillboxError::Validation(format!(
                "Schedule {} window closes before it opens",
                self.id
            )));
        }
        Ok(())
    }
}

/// A medication with its schedules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub id: String,
    pub name: String,
    pub dosage: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Inactive medications keep their history but are never scheduled
    #[serde(default = "default_true")]
    pub active: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,

    #[serde(default)]
    pub refill_reminder: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refill_date: Option<NaiveDate>,

    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,

    pub schedules: Vec<Schedule>,
}

impl Medication {
    pub fn schedule(&self, schedule_id: &str) -> Option<&Schedule> {
        self.schedules.iter().find(|s| s.id == schedule_id)
    }

    /// Check the invariants a stored medication must satisfy.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(PillboxError::Validation(
                "Medication id must not be empty".to_string(),
            ));
        }
        validate_label("name", &self.name)?;
        validate_label("dosage", &self.dosage)?;
        if self.schedules.is_empty() {
            return Err(PillboxError::Validation(format!(
                "Medication \"{}\" needs at least one schedule",
                self.name
            )));
        }
        let mut seen = HashSet::new();
        for schedule in &self.schedules {
            schedule.validate(&self.id)?;
            if !seen.insert(schedule.id.as_str()) {
                return Err(PillboxError::Validation(format!(
                    "Duplicate schedule id: {}",
                    schedule.id
                )));
            }
        }
        Ok(())
    }
}

fn validate_label(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PillboxError::Validation(format!(
            "Medication {} must not be empty",
            field
        )));
    }
    Ok(())
}

/// Builder for a schedule that does not exist yet.
#[derive(Debug, Clone)]
pub struct NewSchedule {
    pub time_of_day: TimeOfDay,

    /// `None` builds a single (every-day) schedule
    pub days_of_week: Option<Weekdays>,

    /// Explicit window; the default is filled in at creation time
    pub window: Option<AvailabilityWindow>,

    pub enabled: bool,
}

impl NewSchedule {
    /// A schedule that fires every day with a single taken bit.
    pub fn daily(time_of_day: TimeOfDay) -> Self {
        Self {
            time_of_day,
            days_of_week: None,
            window: None,
            enabled: true,
        }
    }

    /// A schedule that fires on the selected weekdays.
    pub fn weekly(time_of_day: TimeOfDay, days_of_week: Weekdays) -> Self {
        Self {
            time_of_day,
            days_of_week: Some(days_of_week),
            window: None,
            enabled: true,
        }
    }

    pub fn with_window(mut self, window: AvailabilityWindow) -> Self {
        self.window = Some(window);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    fn build(self, id: String, medication_id: &str) -> Schedule {
        let window = self.window.unwrap_or_default();
        let (days_of_week, adherence) = match self.days_of_week {
            Some(days) => (days, Adherence::weekly()),
            None => (Weekdays::EVERY_DAY, Adherence::single()),
        };
        Schedule {
            id,
            medication_id: medication_id.to_string(),
            time_of_day: self.time_of_day,
            days_of_week,
            enabled: self.enabled,
            window_start: Some(window.start_offset),
            window_end: Some(window.end_offset),
            last_taken_date: None,
            adherence,
        }
    }
}

/// Builder for a medication that does not exist yet.
#[derive(Debug, Clone)]
pub struct NewMedication {
    pub name: String,
    pub dosage: String,
    pub color: String,
    pub instructions: Option<String>,
    pub refill_reminder: bool,
    pub refill_date: Option<NaiveDate>,
    pub active: bool,
    pub schedules: Vec<NewSchedule>,
}

impl NewMedication {
    pub fn new(name: impl Into<String>, dosage: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dosage: dosage.into(),
            color: default_color(),
            instructions: None,
            refill_reminder: false,
            refill_date: None,
            active: true,
            schedules: Vec::new(),
        }
    }

    pub fn with_schedule(mut self, schedule: NewSchedule) -> Self {
        self.schedules.push(schedule);
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    pub fn with_refill_date(mut self, date: NaiveDate) -> Self {
        self.refill_reminder = true;
        self.refill_date = Some(date);
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Reject empty labels, missing schedules and inverted windows.
    pub fn validate(&self) -> Result<()> {
        validate_label("name", &self.name)?;
        validate_label("dosage", &self.dosage)?;
        if self.schedules.is_empty() {
            return Err(PillboxError::Validation(format!(
                "Medication \"{}\" needs at least one schedule",
                self.name
            )));
        }
        if self
            .schedules
            .iter()
            .filter_map(|s| s.window)
            .any(|w| w.is_misconfigured())
        {
            return Err(PillboxError::Validation(
                "Availability window closes before it opens".to_string(),
            ));
        }
        Ok(())
    }

    /// Materialize into a stored medication.
    ///
    /// `next_id` is called once per schedule.
    pub fn build(
        self,
        id: String,
        now: NaiveDateTime,
        mut next_id: impl FnMut() -> String,
    ) -> Result<Medication> {
        self.validate()?;
        let schedules = self
            .schedules
            .into_iter()
            .map(|s| s.build(next_id(), &id))
            .collect();
        Ok(Medication {
            id,
            name: self.name.trim().to_string(),
            dosage: self.dosage.trim().to_string(),
            color: self.color,
            active: self.active,
            instructions: self.instructions.filter(|i| !i.trim().is_empty()),
            refill_reminder: self.refill_reminder,
            refill_date: self.refill_date,
            created_at: now,
            updated_at: now,
            schedules,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn counter() -> impl FnMut() -> String {
        let mut n = 0;
        move || {
            n += 1;
            format!("s{}", n)
        }
    }

    fn aspirin() -> Medication {
        NewMedication::new("Aspirin", "100mg")
            .with_schedule(NewSchedule::weekly(
                "08:00".parse().unwrap(),
                "1,3,5".parse().unwrap(),
            ))
            .with_schedule(NewSchedule::daily("20:00".parse().unwrap()))
            .build("m1".to_string(), now(), counter())
            .unwrap()
    }

    #[test]
    fn test_build_fills_default_window_and_back_refs() {
        let med = aspirin();
        assert_eq!(med.schedules.len(), 2);
        for schedule in &med.schedules {
            assert_eq!(schedule.medication_id, "m1");
            assert_eq!(schedule.window_start, Some(-15));
            assert_eq!(schedule.window_end, Some(15));
        }
        assert!(med.schedules[0].is_weekly());
        assert!(!med.schedules[1].is_weekly());
        assert_eq!(med.schedules[1].days_of_week, Weekdays::EVERY_DAY);
        assert_eq!(med.created_at, now());
    }

    #[test]
    fn test_validation_rejects_empty_fields() {
        let no_name = NewMedication::new("  ", "1mg")
            .with_schedule(NewSchedule::daily("08:00".parse().unwrap()));
        assert!(matches!(no_name.validate(), Err(PillboxError::Validation(_))));

        let no_dosage = NewMedication::new("A", "")
            .with_schedule(NewSchedule::daily("08:00".parse().unwrap()));
        assert!(no_dosage.validate().is_err());

        let no_schedules = NewMedication::new("A", "1mg");
        assert!(no_schedules.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_inverted_window() {
        let med = NewMedication::new("A", "1mg").with_schedule(
            NewSchedule::daily("08:00".parse().unwrap())
                .with_window(AvailabilityWindow::new(10, -10)),
        );
        assert!(med.validate().is_err());
    }

    #[test]
    fn test_stored_validation_checks_back_refs_and_duplicates() {
        let mut med = aspirin();
        assert!(med.validate().is_ok());

        med.schedules[1].id = med.schedules[0].id.clone();
        assert!(med.validate().is_err());

        let mut med = aspirin();
        med.schedules[0].medication_id = "other".to_string();
        assert!(med.validate().is_err());
    }

    #[test]
    fn test_fires_on_weekly_and_single() {
        let med = aspirin();
        let monday = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let tuesday = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert!(med.schedules[0].fires_on(monday));
        assert!(!med.schedules[0].fires_on(tuesday));
        assert!(med.schedules[1].fires_on(tuesday));
    }

    #[test]
    fn test_empty_weekday_set_never_fires() {
        let mut med = aspirin();
        med.schedules[0].days_of_week = Weekdays::empty();
        assert!(!med.schedules[0].fires_at_all());
        assert!(med.schedules[1].fires_at_all());
    }

    #[test]
    fn test_missing_window_falls_back_to_default() {
        let mut med = aspirin();
        med.schedules[0].window_start = None;
        med.schedules[0].window_end = Some(30);
        assert_eq!(med.schedules[0].window(), AvailabilityWindow::new(-15, 30));
    }

    #[test]
    fn test_schedule_serde_shapes() {
        let med = aspirin();
        let weekly = serde_json::to_value(&med.schedules[0]).unwrap();
        assert_eq!(weekly["kind"], "weekly");
        assert_eq!(weekly["timeOfDay"], "08:00");
        assert_eq!(weekly["daysOfWeek"], serde_json::json!([1, 3, 5]));
        assert_eq!(weekly["taken"].as_array().unwrap().len(), 7);
        assert!(weekly["takenDates"].as_array().unwrap().is_empty());

        let single = serde_json::to_value(&med.schedules[1]).unwrap();
        assert_eq!(single["kind"], "single");
        assert_eq!(single["taken"], false);

        let back: Medication =
            serde_json::from_str(&serde_json::to_string(&med).unwrap()).unwrap();
        assert_eq!(back, med);
    }

    #[test]
    fn test_taken_bit_belongs_to_one_date() {
        let monday = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let next_monday = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
        let mut med = aspirin();

        med.schedules[1].adherence = Adherence::Single {
            taken: true,
            taken_on: Some(monday),
        };
        assert!(med.schedules[1].is_taken_on(monday));
        assert!(!med.schedules[1].is_taken_on(monday.succ_opt().unwrap()));

        med.schedules[0].adherence = Adherence::Weekly {
            taken_by_day: [false, true, false, false, false, false, false],
            taken_dates: vec![monday],
        };
        assert!(med.schedules[0].is_taken_on(monday));
        assert!(!med.schedules[0].is_taken_on(next_monday));
    }

    #[test]
    fn test_single_without_taken_on_uses_last_taken_stamp() {
        let json = r#"{"id": "7-1", "medicationId": "7", "timeOfDay": "07:30",
            "kind": "single", "taken": true, "lastTakenDate": "2024-03-04T07:31:00"}"#;
        let schedule: Schedule = serde_json::from_str(json).unwrap();
        assert!(schedule.is_taken_on(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()));
        assert!(!schedule.is_taken_on(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()));
    }

    #[test]
    fn test_deserialize_minimal_record_uses_defaults() {
        let json = r#"{
            "id": "7", "name": "Zinc", "dosage": "10mg",
            "createdAt": "2024-03-01T08:00:00", "updatedAt": "2024-03-01T08:00:00",
            "schedules": [{"id": "7-1", "medicationId": "7", "timeOfDay": "07:30", "kind": "single"}]
        }"#;
        let med: Medication = serde_json::from_str(json).unwrap();
        assert!(med.active);
        assert_eq!(med.color, DEFAULT_COLOR);
        assert!(med.schedules[0].enabled);
        assert_eq!(med.schedules[0].adherence, Adherence::single());
        assert_eq!(med.schedules[0].window(), AvailabilityWindow::DEFAULT);
    }
}
