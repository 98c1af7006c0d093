//! Command handlers, one module per command family.

pub mod clear;
pub mod doses;
pub mod init;
pub mod medications;
pub mod misc;
pub mod refills;
pub mod reminders;
pub mod today;

use pillbox_core::{Medication, Schedule};

use crate::app::Store;
use crate::errors::CliError;

/// Look up a medication, or fail with a not-found hint.
pub(crate) fn require_medication<'s>(store: &'s Store, id: &str) -> anyhow::Result<&'s Medication> {
    store.medication(id).ok_or_else(|| {
        CliError::not_found(
            format!("Medication not found: {}", id),
            "Run `pillbox list --all` to see medication IDs.",
        )
        .into()
    })
}

/// Look up a schedule of a medication, or fail with a not-found hint.
pub(crate) fn require_schedule<'s>(
    store: &'s Store,
    medication_id: &str,
    schedule_id: &str,
) -> anyhow::Result<&'s Schedule> {
    let medication = require_medication(store, medication_id)?;
    medication.schedule(schedule_id).ok_or_else(|| {
        CliError::not_found(
            format!(
                "Schedule {} not found on medication {}",
                schedule_id, medication_id
            ),
            format!("Run `pillbox show {}` to see its schedules.", medication_id),
        )
        .into()
    })
}
