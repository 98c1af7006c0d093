//! Surfacing recoverable mutation failures.

use pillbox_core::Outcome;

use crate::ui::{print_warning, UiContext};

/// Warn on stderr about anything an applied mutation could not finish.
///
/// The change itself stands; the next mutation retries both steps.
pub fn report_outcome(ui: &UiContext, outcome: &Outcome) {
    if let Some(err) = &outcome.persistence_error {
        print_warning(ui, &format!("Changes are not saved: {}", err));
    }
    for failure in &outcome.dispatch_failures {
        let message = match &failure.spec_id {
            Some(id) => format!("Reminder {} was not scheduled: {}", id, failure.error),
            None => format!("Pending reminders were not cleared: {}", failure.error),
        };
        print_warning(ui, &message);
    }
}
