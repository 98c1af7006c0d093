//! Process-wide notification settings.

use serde::{Deserialize, Serialize};

/// Notification preferences, persisted under `"notificationSettings"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationSettings {
    /// Master switch; when off no notification is dispatched at all
    pub enabled: bool,
    pub sound_enabled: bool,
    pub vibration_enabled: bool,

    /// Lead time of the pre-dose reminder; 0 disables it
    pub reminder_minutes_before: u32,
    pub selected_sound_name: String,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            sound_enabled: true,
            vibration_enabled: true,
            reminder_minutes_before: 15,
            selected_sound_name: "default".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = NotificationSettings::default();
        assert!(settings.enabled);
        assert_eq!(settings.reminder_minutes_before, 15);
        assert_eq!(settings.selected_sound_name, "default");
    }

    #[test]
    fn test_partial_record_fills_defaults() {
        let settings: NotificationSettings =
            serde_json::from_str(r#"{"enabled": false, "reminderMinutesBefore": 0}"#).unwrap();
        assert!(!settings.enabled);
        assert_eq!(settings.reminder_minutes_before, 0);
        assert!(settings.sound_enabled);
    }

    #[test]
    fn test_negative_lead_time_is_rejected() {
        let result =
            serde_json::from_str::<NotificationSettings>(r#"{"reminderMinutesBefore": -5}"#);
        assert!(result.is_err());
    }
}
