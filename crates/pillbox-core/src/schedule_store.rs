//! The schedule store: single owner of engine state.
//!
//! Every mutation runs the same pipeline:
//!
//! 1. apply a pure transformation to the current state
//! 2. swap the new state in
//! 3. persist both blobs
//! 4. recompile the notification set and replace everything pending
//!
//! Steps 3 and 4 never roll back step 2. Their failures are reported in the
//! returned [`Outcome`] and retried implicitly by the next mutation, which
//! re-persists and re-dispatches the full state.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::{PillboxError, Result};
use crate::model::{Medication, NewMedication, NotificationSettings};
use crate::reminder::{
    compile_with, replace_all, DispatchFailure, NotificationDispatcher, NotificationSpec,
    TriggerExpansion,
};
use crate::sample::sample_medications;
use crate::schedule::{self, DaySummary, RefillDue, ScheduleOccurrence};
use crate::storage::types::{
    decode_medications, decode_settings, encode_medications, encode_settings,
};
use crate::storage::{PersistentStore, State, MEDICATIONS_KEY, SETTINGS_KEY};

/// Recoverable failures of an applied mutation.
#[derive(Debug, Default)]
pub struct Outcome {
    /// The state could not be written; it is still held in memory
    pub persistence_error: Option<PillboxError>,

    /// Notifications that could not be (re)scheduled
    pub dispatch_failures: Vec<DispatchFailure>,

    /// Number of notifications accepted by the dispatcher
    pub scheduled: usize,
}

impl Outcome {
    /// Whether the mutation was both saved and fully dispatched.
    pub fn is_clean(&self) -> bool {
        self.persistence_error.is_none() && self.dispatch_failures.is_empty()
    }
}

/// Owns the medication list and settings, their persistence, and the
/// notifications derived from them.
pub struct ScheduleStore<S: PersistentStore, D: NotificationDispatcher> {
    store: S,
    dispatcher: D,
    clock: Box<dyn Clock>,
    state: Arc<State>,
}

impl<S: PersistentStore, D: NotificationDispatcher> ScheduleStore<S, D> {
    /// Load state and reconcile the dispatcher with it.
    ///
    /// With nothing stored under `"medications"` the sample set is seeded and
    /// persisted. An unreadable or corrupt medication blob loads as an empty
    /// list and is left on disk untouched until the next mutation. Missing or
    /// corrupt settings fall back to defaults.
    pub fn open(store: S, dispatcher: D, clock: Box<dyn Clock>) -> (Self, Outcome) {
        let now = clock.now();
        let mut load_error = None;

        let (medications, seeded) = match store.get(MEDICATIONS_KEY) {
            Ok(None) => match sample_medications(now) {
                Ok(sample) => {
                    info!(count = sample.len(), "No stored medications, seeding sample set");
                    (sample, true)
                }
                Err(err) => {
                    warn!(error = %err, "Failed to build sample medications");
                    (Vec::new(), false)
                }
            },
            Ok(Some(bytes)) => match decode_medications(&bytes) {
                Ok(medications) => (medications, false),
                Err(err) => {
                    warn!(error = %err, "Stored medications are corrupt, starting empty");
                    (Vec::new(), false)
                }
            },
            Err(err) => {
                warn!(error = %err, "Failed to read stored medications, starting empty");
                load_error = Some(err);
                (Vec::new(), false)
            }
        };

        let settings = match store.get(SETTINGS_KEY) {
            Ok(Some(bytes)) => decode_settings(&bytes).unwrap_or_else(|err| {
                warn!(error = %err, "Stored notification settings are corrupt, using defaults");
                NotificationSettings::default()
            }),
            Ok(None) => NotificationSettings::default(),
            Err(err) => {
                warn!(error = %err, "Failed to read notification settings, using defaults");
                load_error.get_or_insert(err);
                NotificationSettings::default()
            }
        };

        let mut facade = Self {
            store,
            dispatcher,
            clock,
            state: Arc::new(State::new(medications, settings)),
        };
        debug!(
            medications = facade.state.medications.len(),
            seeded, "Loaded schedule state"
        );

        let persistence_error = if seeded {
            facade.persist().err()
        } else {
            load_error
        };
        let (dispatch_failures, scheduled) = facade.reconcile();
        let outcome = Outcome {
            persistence_error,
            dispatch_failures,
            scheduled,
        };
        (facade, outcome)
    }

    // --- Reads ---

    /// A consistent view of the current state.
    ///
    /// The snapshot is immutable; later mutations swap in a new state and
    /// never change one already handed out.
    pub fn snapshot(&self) -> Arc<State> {
        Arc::clone(&self.state)
    }

    pub fn medications(&self) -> &[Medication] {
        &self.state.medications
    }

    pub fn settings(&self) -> &NotificationSettings {
        &self.state.settings
    }

    pub fn medication(&self, id: &str) -> Option<&Medication> {
        self.state.medication(id)
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    pub fn occurrences_on(&self, date: NaiveDate) -> Vec<ScheduleOccurrence> {
        schedule::occurrences_on(date, &self.state.medications)
    }

    /// Occurrences for the clock's current date.
    pub fn today(&self) -> Vec<ScheduleOccurrence> {
        self.occurrences_on(self.now().date())
    }

    pub fn next_occurrence(&self) -> Option<ScheduleOccurrence> {
        schedule::next_occurrence(self.now(), &self.state.medications)
    }

    pub fn summary(&self) -> DaySummary {
        schedule::summarize(&self.today(), self.now())
    }

    pub fn refills_due(&self, within_days: i64) -> Vec<RefillDue> {
        schedule::refills_due(&self.state.medications, self.now().date(), within_days)
    }

    /// The notification set the current state compiles to.
    pub fn compiled_notifications(&self) -> Vec<NotificationSpec> {
        compile_with(
            &self.state.medications,
            &self.state.settings,
            self.expansion(),
        )
    }

    /// What the dispatcher currently holds.
    pub fn pending_notifications(&self) -> Result<Vec<NotificationSpec>> {
        self.dispatcher.list_pending()
    }

    /// Whether a daily reset on `today` would clear anything.
    pub fn reset_due(&self, today: NaiveDate) -> bool {
        schedule::reset_daily(&self.state.medications, today) != self.state.medications
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut D {
        &mut self.dispatcher
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn set_clock(&mut self, clock: Box<dyn Clock>) {
        self.clock = clock;
    }

    // --- Mutations ---

    /// Create a medication with fresh ids.
    ///
    /// # Errors
    ///
    /// Returns `PillboxError::Validation` if the name or dosage is empty, no
    /// schedule is given, or a window closes before it opens.
    pub fn add_medication(&mut self, medication: NewMedication) -> Result<(String, Outcome)> {
        let id = Uuid::now_v7().to_string();
        let medication = medication.build(id.clone(), self.now(), || {
            Uuid::now_v7().to_string()
        })?;
        info!(medication_id = %id, schedules = medication.schedules.len(), "Adding medication");

        let mut medications = self.state.medications.clone();
        medications.push(medication);
        Ok((id, self.commit(medications, self.state.settings.clone())))
    }

    /// Replace a stored medication, keeping its creation time.
    ///
    /// # Errors
    ///
    /// Returns `PillboxError::NotFound` if no medication has this id and
    /// `PillboxError::Validation` if the record is invalid.
    pub fn update_medication(&mut self, medication: Medication) -> Result<Outcome> {
        let existing = self
            .medication(&medication.id)
            .ok_or_else(|| PillboxError::NotFound(format!("Medication {}", medication.id)))?;
        let mut medication = medication;
        medication.created_at = existing.created_at;
        medication.updated_at = self.now();
        medication.validate()?;
        info!(medication_id = %medication.id, "Updating medication");

        let medications = self
            .state
            .medications
            .iter()
            .map(|m| {
                if m.id == medication.id {
                    medication.clone()
                } else {
                    m.clone()
                }
            })
            .collect();
        Ok(self.commit(medications, self.state.settings.clone()))
    }

    /// Activate or deactivate a medication. History is kept either way.
    pub fn set_active(&mut self, medication_id: &str, active: bool) -> Result<Outcome> {
        let mut medication = self
            .medication(medication_id)
            .cloned()
            .ok_or_else(|| PillboxError::NotFound(format!("Medication {}", medication_id)))?;
        medication.active = active;
        self.update_medication(medication)
    }

    /// Delete a medication together with its schedules.
    pub fn delete_medication(&mut self, medication_id: &str) -> Result<Outcome> {
        if self.medication(medication_id).is_none() {
            return Err(PillboxError::NotFound(format!(
                "Medication {}",
                medication_id
            )));
        }
        info!(medication_id, "Deleting medication");
        let medications = self
            .state
            .medications
            .iter()
            .filter(|m| m.id != medication_id)
            .cloned()
            .collect();
        Ok(self.commit(medications, self.state.settings.clone()))
    }

    /// Mark the current dose of a schedule as taken.
    ///
    /// The dose is the occurrence whose window contains now, so a dose taken
    /// just before midnight is credited to the day it belongs to.
    pub fn mark_taken(&mut self, medication_id: &str, schedule_id: &str) -> Outcome {
        let date = self.current_dose_date(medication_id, schedule_id);
        self.mark_taken_on(medication_id, schedule_id, date)
    }

    /// Day of the dose `mark_taken` / `unmark_taken` act on; today for unknown ids.
    pub fn current_dose_date(&self, medication_id: &str, schedule_id: &str) -> NaiveDate {
        let now = self.now();
        self.medication(medication_id)
            .and_then(|m| m.schedule(schedule_id))
            .map_or(now.date(), |s| schedule::dose_date(s, now))
    }

    /// Mark the dose on `date` as taken.
    ///
    /// Ids that do not resolve make this a no-op: nothing is persisted or
    /// dispatched.
    pub fn mark_taken_on(
        &mut self,
        medication_id: &str,
        schedule_id: &str,
        date: NaiveDate,
    ) -> Outcome {
        if schedule::locate(&self.state.medications, medication_id, schedule_id).is_none() {
            debug!(medication_id, schedule_id, "Mark taken ignored, unknown schedule");
            return Outcome::default();
        }
        let medications = schedule::mark_taken(
            &self.state.medications,
            medication_id,
            schedule_id,
            date,
            self.now(),
        );
        self.commit(medications, self.state.settings.clone())
    }

    pub fn unmark_taken(&mut self, medication_id: &str, schedule_id: &str) -> Outcome {
        let date = self.current_dose_date(medication_id, schedule_id);
        self.unmark_taken_on(medication_id, schedule_id, date)
    }

    /// Clear the taken bit for `date`. Unknown ids are a no-op.
    pub fn unmark_taken_on(
        &mut self,
        medication_id: &str,
        schedule_id: &str,
        date: NaiveDate,
    ) -> Outcome {
        if schedule::locate(&self.state.medications, medication_id, schedule_id).is_none() {
            debug!(medication_id, schedule_id, "Unmark taken ignored, unknown schedule");
            return Outcome::default();
        }
        let medications = schedule::unmark_taken(
            &self.state.medications,
            medication_id,
            schedule_id,
            date,
            self.now(),
        );
        self.commit(medications, self.state.settings.clone())
    }

    /// Day-rollover reset for the clock's current date.
    pub fn reset_daily(&mut self) -> Outcome {
        let today = self.now().date();
        self.reset_daily_on(today)
    }

    /// Clear taken bits from days before `today`. Safe to repeat.
    pub fn reset_daily_on(&mut self, today: NaiveDate) -> Outcome {
        let before = schedule::taken_bit_count(&self.state.medications);
        let medications = schedule::reset_daily(&self.state.medications, today);
        info!(
            %today,
            cleared = before - schedule::taken_bit_count(&medications),
            "Daily reset"
        );
        self.commit(medications, self.state.settings.clone())
    }

    pub fn update_settings(&mut self, settings: NotificationSettings) -> Outcome {
        info!(
            enabled = settings.enabled,
            reminder_minutes_before = settings.reminder_minutes_before,
            "Updating notification settings"
        );
        self.commit(self.state.medications.clone(), settings)
    }

    /// Remove all stored data and cancel every notification.
    ///
    /// Settings return to their defaults. Nothing is re-seeded until the
    /// store is opened again with no medications key.
    pub fn clear_all(&mut self) -> Outcome {
        info!("Clearing all data");
        self.state = Arc::new(State::default());

        let mut persistence_error = None;
        for key in [MEDICATIONS_KEY, SETTINGS_KEY] {
            if let Err(err) = self.store.remove(key) {
                warn!(key, error = %err, "Failed to remove stored data");
                persistence_error.get_or_insert(err);
            }
        }
        let (dispatch_failures, scheduled) = replace_all(&mut self.dispatcher, &[]);
        Outcome {
            persistence_error,
            dispatch_failures,
            scheduled,
        }
    }

    /// Recompile and replace all notifications without changing state.
    pub fn reschedule(&mut self) -> Outcome {
        let (dispatch_failures, scheduled) = self.reconcile();
        Outcome {
            persistence_error: None,
            dispatch_failures,
            scheduled,
        }
    }

    // --- Pipeline ---

    fn commit(&mut self, medications: Vec<Medication>, settings: NotificationSettings) -> Outcome {
        self.state = Arc::new(State::new(medications, settings));
        let persistence_error = self.persist().err();
        let (dispatch_failures, scheduled) = self.reconcile();
        Outcome {
            persistence_error,
            dispatch_failures,
            scheduled,
        }
    }

    /// Write both blobs. Both writes are attempted; the first error is returned.
    fn persist(&mut self) -> Result<()> {
        let medications = encode_medications(&self.state.medications)?;
        let settings = encode_settings(&self.state.settings)?;

        let mut first_error = None;
        for (key, bytes) in [(MEDICATIONS_KEY, medications), (SETTINGS_KEY, settings)] {
            if let Err(err) = self.store.set(key, &bytes) {
                warn!(key, error = %err, "Failed to persist state");
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn expansion(&self) -> TriggerExpansion {
        if self.dispatcher.supports_weekday_sets() {
            TriggerExpansion::WeekdaySets
        } else {
            TriggerExpansion::PerWeekday
        }
    }

    fn reconcile(&mut self) -> (Vec<DispatchFailure>, usize) {
        let specs = self.compiled_notifications();
        let (failures, scheduled) = replace_all(&mut self.dispatcher, &specs);
        info!(
            compiled = specs.len(),
            scheduled,
            failed = failures.len(),
            "Reconciled notifications"
        );
        (failures, scheduled)
    }
}
