//! File-backed notification dispatcher.
//!
//! A terminal has no notification center, so pending notifications are
//! written to `pending.json` in the data directory where an external timer
//! (cron, systemd, a status bar) can pick them up.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use pillbox_core::fs::write_atomic;
use pillbox_core::{NotificationDispatcher, NotificationSpec, PillboxError, Result};
use tracing::warn;

use crate::constants::PENDING_FILE;

#[derive(Debug)]
pub struct FileDispatcher {
    path: PathBuf,
    pending: Vec<NotificationSpec>,
}

impl FileDispatcher {
    /// Load the pending set from `dir`. A missing or unreadable file starts empty.
    pub fn open(dir: &Path) -> Self {
        let path = dir.join(PENDING_FILE);
        let pending = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|err| {
                warn!(path = %path.display(), error = %err, "Ignoring unreadable pending notifications");
                Vec::new()
            }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Failed to read pending notifications");
                Vec::new()
            }
        };
        Self { path, pending }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, pending: &[NotificationSpec]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                PillboxError::Dispatcher(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
        let bytes = serde_json::to_vec_pretty(pending)
            .map_err(|e| PillboxError::Dispatcher(e.to_string()))?;
        write_atomic(&self.path, &bytes).map_err(|e| {
            PillboxError::Dispatcher(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }
}

impl NotificationDispatcher for FileDispatcher {
    /// The in-memory set only changes once the file write succeeds.
    fn schedule(&mut self, spec: &NotificationSpec) -> Result<()> {
        let mut next = self.pending.clone();
        match next.iter_mut().find(|p| p.id == spec.id) {
            Some(existing) => *existing = spec.clone(),
            None => next.push(spec.clone()),
        }
        self.flush(&next)?;
        self.pending = next;
        Ok(())
    }

    fn cancel_all(&mut self) -> Result<()> {
        self.flush(&[])?;
        self.pending.clear();
        Ok(())
    }

    fn list_pending(&self) -> Result<Vec<NotificationSpec>> {
        Ok(self.pending.clone())
    }
}
