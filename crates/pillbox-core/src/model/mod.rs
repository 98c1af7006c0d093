//! Data model: medications, schedules, settings and wall-clock primitives.

pub mod medication;
pub mod settings;
pub mod time;

pub use medication::{
    Adherence, AvailabilityWindow, Medication, NewMedication, NewSchedule, Schedule,
    DEFAULT_COLOR, DEFAULT_WINDOW_MINUTES,
};
pub use settings::NotificationSettings;
pub use time::{weekday_from_index, weekday_index, TimeOfDay, Weekdays, MINUTES_PER_DAY};
