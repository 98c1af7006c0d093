//! Engine state and its persisted layout.
//!
//! State is stored as two independent blobs so a corrupt settings record
//! never takes the medication list down with it.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{Medication, NotificationSettings};

/// Key of the medication list blob.
pub const MEDICATIONS_KEY: &str = "medications";

/// Key of the notification settings blob.
pub const SETTINGS_KEY: &str = "notificationSettings";

/// Everything the schedule store owns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    pub medications: Vec<Medication>,
    pub settings: NotificationSettings,
}

impl State {
    pub fn new(medications: Vec<Medication>, settings: NotificationSettings) -> Self {
        Self {
            medications,
            settings,
        }
    }

    pub fn medication(&self, id: &str) -> Option<&Medication> {
        self.medications.iter().find(|m| m.id == id)
    }

    pub fn active_medications(&self) -> impl Iterator<Item = &Medication> {
        self.medications.iter().filter(|m| m.active)
    }
}

pub fn encode_medications(medications: &[Medication]) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(medications)?)
}

pub fn decode_medications(bytes: &[u8]) -> Result<Vec<Medication>> {
    Ok(serde_json::from_slice(bytes)?)
}

pub fn encode_settings(settings: &NotificationSettings) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(settings)?)
}

pub fn decode_settings(bytes: &[u8]) -> Result<NotificationSettings> {
    Ok(serde_json::from_slice(bytes)?)
}
