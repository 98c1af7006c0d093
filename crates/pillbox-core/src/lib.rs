//! # Pillbox Core
//!
//! Core library for Pillbox - a medication schedule and reminder engine.
//!
//! This crate provides the scheduling logic, state ownership and collaborator
//! interfaces independent of any host (CLI, mobile shell, background timer).
//!
//! ## Architecture
//!
//! - **model**: Medications, schedules, settings, time-of-day and weekday sets
//! - **schedule**: Dose window evaluation, daily occurrences, adherence, refills
//! - **reminder**: Notification compilation and the dispatcher interface
//! - **storage**: Persistent store trait, state layout, memory and JSON backends
//! - **schedule_store**: The façade that owns state and runs every mutation
//! - **device**: Companion lock/dispenser connection state machine
//!
//! ## Example
//!
//! ```
//! use pillbox_core::{FixedClock, InMemoryDispatcher, InMemoryStore, ScheduleStore};
//!
//! let now = chrono::NaiveDate::from_ymd_opt(2024, 3, 4)
//!     .unwrap()
//!     .and_hms_opt(8, 0, 0)
//!     .unwrap();
//! let (store, outcome) = ScheduleStore::open(
//!     InMemoryStore::new(),
//!     InMemoryDispatcher::new(),
//!     Box::new(FixedClock(now)),
//! );
//! assert!(outcome.is_clean());
//! assert!(!store.today().is_empty());
//! ```

pub mod clock;
pub mod device;
pub mod error;
pub mod fs;
pub mod model;
pub mod reminder;
pub mod sample;
pub mod schedule;
pub mod schedule_store;
pub mod storage;

pub use clock::{Clock, FixedClock, SystemClock};
pub use device::{ConnectionState, DeviceLink};
pub use error::{PillboxError, Result};
pub use model::{
    AvailabilityWindow, Medication, NewMedication, NewSchedule, NotificationSettings, Schedule,
    TimeOfDay, Weekdays,
};
pub use reminder::{
    DispatchFailure, InMemoryDispatcher, NotificationDispatcher, NotificationSpec,
};
pub use schedule::{DaySummary, DoseStatus, DoseWindow, RefillDue, ScheduleOccurrence};
pub use schedule_store::{Outcome, ScheduleStore};
pub use storage::{InMemoryStore, JsonFileStore, PersistentStore, State};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
