//! Notification dispatcher interface.
//!
//! A dispatcher is the host facility that actually fires notifications. The
//! engine never diffs against it: every reconciliation cancels everything and
//! resubmits the freshly compiled set.

use std::collections::HashSet;

use serde::Serialize;
use tracing::warn;

use super::compiler::NotificationSpec;
use crate::error::{PillboxError, Result};

/// Host notification facility.
pub trait NotificationDispatcher: Send + Sync {
    /// Register one notification. A spec with an already-pending id replaces it.
    fn schedule(&mut self, spec: &NotificationSpec) -> Result<()>;

    /// Drop every pending notification.
    fn cancel_all(&mut self) -> Result<()>;

    /// Currently pending notifications.
    fn list_pending(&self) -> Result<Vec<NotificationSpec>>;

    /// Whether one trigger can carry a set of weekdays.
    ///
    /// Dispatchers returning `false` receive one spec per weekday.
    fn supports_weekday_sets(&self) -> bool {
        true
    }
}

/// A dispatcher operation that failed during reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchFailure {
    /// The spec that could not be scheduled; `None` when cancel-all failed
    pub spec_id: Option<String>,
    pub error: String,
}

/// Cancel everything, then schedule every spec.
///
/// Failures are collected rather than aborting, so one bad spec never keeps
/// the rest from being scheduled. Returns the failures and the number of
/// specs accepted.
pub fn replace_all<D: NotificationDispatcher + ?Sized>(
    dispatcher: &mut D,
    specs: &[NotificationSpec],
) -> (Vec<DispatchFailure>, usize) {
    let mut failures = Vec::new();
    if let Err(err) = dispatcher.cancel_all() {
        warn!(error = %err, "Failed to cancel pending notifications");
        failures.push(DispatchFailure {
            spec_id: None,
            error: err.to_string(),
        });
    }

    let mut scheduled = 0;
    for spec in specs {
        match dispatcher.schedule(spec) {
            Ok(()) => scheduled += 1,
            Err(err) => {
                warn!(spec_id = %spec.id, error = %err, "Failed to schedule notification");
                failures.push(DispatchFailure {
                    spec_id: Some(spec.id.clone()),
                    error: err.to_string(),
                });
            }
        }
    }
    (failures, scheduled)
}

/// Dispatcher that keeps pending specs in memory.
///
/// Used by tests and by hosts without a notification facility. Specific ids
/// can be made to fail to exercise the recoverable error paths.
#[derive(Debug, Clone)]
pub struct InMemoryDispatcher {
    pending: Vec<NotificationSpec>,
    weekday_sets: bool,
    failing_ids: HashSet<String>,
    fail_cancel: bool,
    cancel_calls: usize,
}

impl Default for InMemoryDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDispatcher {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            weekday_sets: true,
            failing_ids: HashSet::new(),
            fail_cancel: false,
            cancel_calls: 0,
        }
    }

    /// Behave like a facility that needs one trigger per weekday.
    pub fn without_weekday_sets(mut self) -> Self {
        self.weekday_sets = false;
        self
    }

    /// Reject every `schedule` call for `id`.
    pub fn fail_on(&mut self, id: impl Into<String>) {
        self.failing_ids.insert(id.into());
    }

    pub fn fail_cancel(&mut self, fail: bool) {
        self.fail_cancel = fail;
    }

    pub fn heal(&mut self) {
        self.failing_ids.clear();
        self.fail_cancel = false;
    }

    pub fn pending(&self) -> &[NotificationSpec] {
        &self.pending
    }

    pub fn cancel_calls(&self) -> usize {
        self.cancel_calls
    }
}

impl NotificationDispatcher for InMemoryDispatcher {
    fn schedule(&mut self, spec: &NotificationSpec) -> Result<()> {
        if self.failing_ids.contains(&spec.id) {
            return Err(PillboxError::Dispatcher(format!(
                "Rejected notification {}",
                spec.id
            )));
        }
        self.pending.retain(|p| p.id != spec.id);
        self.pending.push(spec.clone());
        Ok(())
    }

    fn cancel_all(&mut self) -> Result<()> {
        self.cancel_calls += 1;
        if self.fail_cancel {
            return Err(PillboxError::Dispatcher("Cancel rejected".to_string()));
        }
        self.pending.clear();
        Ok(())
    }

    fn list_pending(&self) -> Result<Vec<NotificationSpec>> {
        Ok(self.pending.clone())
    }

    fn supports_weekday_sets(&self) -> bool {
        self.weekday_sets
    }
}
