//! Compilation of schedules and settings into notification specs.
//!
//! The compiled list is the complete set of notifications that should be
//! pending at this moment. It is a pure function of its inputs: the same
//! medications and settings always produce the same list, in the same order,
//! with the same ids.

use serde::{Deserialize, Serialize};

use crate::model::{Medication, NotificationSettings, Schedule, TimeOfDay, Weekdays};

pub const PRIMARY_TITLE: &str = "Time for your medication";
pub const REMINDER_TITLE: &str = "Upcoming Medication";

/// When a notification fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trigger {
    pub hour: u32,
    pub minute: u32,

    /// Weekday indices (Sunday = 0); absent for a daily trigger
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_of_week: Option<Vec<u8>>,

    pub repeats: bool,
}

impl Trigger {
    fn at(time: TimeOfDay, days: Option<Weekdays>) -> Self {
        Self {
            hour: time.hour(),
            minute: time.minute(),
            days_of_week: days.map(|d| d.indices()),
            repeats: true,
        }
    }

    pub fn time_of_day(&self) -> Option<TimeOfDay> {
        TimeOfDay::new(self.hour, self.minute).ok()
    }
}

/// One notification as handed to a dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSpec {
    pub id: String,
    pub title: String,
    pub body: String,
    pub trigger: Trigger,
    pub sound: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound_name: Option<String>,

    #[serde(default)]
    pub vibrate: bool,
}

/// How weekday-bound triggers are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerExpansion {
    /// One spec per schedule carrying the full weekday set
    #[default]
    WeekdaySets,

    /// One spec per selected weekday, ids suffixed `-w{day}`
    PerWeekday,
}

/// Compile with weekday sets expressed natively.
pub fn compile(
    medications: &[Medication],
    settings: &NotificationSettings,
) -> Vec<NotificationSpec> {
    compile_with(medications, settings, TriggerExpansion::WeekdaySets)
}

/// Compile the full notification set.
///
/// Returns nothing when notifications are disabled. Inactive medications,
/// disabled schedules and schedules with an empty weekday set contribute
/// nothing. Per schedule the primary spec precedes its reminder.
pub fn compile_with(
    medications: &[Medication],
    settings: &NotificationSettings,
    expansion: TriggerExpansion,
) -> Vec<NotificationSpec> {
    if !settings.enabled {
        return Vec::new();
    }

    let mut specs = Vec::new();
    for medication in medications.iter().filter(|m| m.active) {
        for schedule in medication.schedules.iter().filter(|s| s.fires_at_all()) {
            let base_id = format!("{}-{}", medication.id, schedule.id);
            let primary = SpecTemplate {
                id: base_id.clone(),
                title: PRIMARY_TITLE,
                body: format!("It's time to take {} - {}", medication.name, medication.dosage),
                time: schedule.time_of_day,
                days: schedule.trigger_days(),
            };
            primary.emit(settings, expansion, &mut specs);

            if settings.reminder_minutes_before > 0 {
                let (time, days) = reminder_trigger(schedule, settings.reminder_minutes_before);
                let reminder = SpecTemplate {
                    id: format!("{}-reminder", base_id),
                    title: REMINDER_TITLE,
                    body: format!(
                        "Reminder: {} is scheduled in {} minutes",
                        medication.name, settings.reminder_minutes_before
                    ),
                    time,
                    days,
                };
                reminder.emit(settings, expansion, &mut specs);
            }
        }
    }
    specs
}

/// Trigger time and weekdays of the pre-dose reminder.
///
/// When the lead time crosses midnight the weekday set moves back by the
/// number of days borrowed.
pub fn reminder_trigger(
    schedule: &Schedule,
    minutes_before: u32,
) -> (TimeOfDay, Option<Weekdays>) {
    let (time, borrowed) = schedule.time_of_day.minus_minutes(minutes_before);
    let days = schedule.trigger_days().map(|d| d.shift_back(borrowed));
    (time, days)
}

struct SpecTemplate {
    id: String,
    title: &'static str,
    body: String,
    time: TimeOfDay,
    days: Option<Weekdays>,
}

impl SpecTemplate {
    fn emit(
        self,
        settings: &NotificationSettings,
        expansion: TriggerExpansion,
        out: &mut Vec<NotificationSpec>,
    ) {
        match (self.days, expansion) {
            (Some(days), TriggerExpansion::PerWeekday) => {
                for day in days.indices() {
                    let single = Weekdays::from_indices([day]).unwrap_or(days);
                    out.push(self.spec(format!("{}-w{}", self.id, day), Some(single), settings));
                }
            }
            (days, _) => out.push(self.spec(self.id.clone(), days, settings)),
        }
    }

    fn spec(
        &self,
        id: String,
        days: Option<Weekdays>,
        settings: &NotificationSettings,
    ) -> NotificationSpec {
        NotificationSpec {
            id,
            title: self.title.to_string(),
            body: self.body.clone(),
            trigger: Trigger::at(self.time, days),
            sound: settings.sound_enabled,
            sound_name: settings
                .sound_enabled
                .then(|| settings.selected_sound_name.clone()),
            vibrate: settings.vibration_enabled,
        }
    }
}
