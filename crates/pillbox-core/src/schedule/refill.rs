//! Refill tracking.

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::Medication;

/// A medication whose refill date falls inside the requested horizon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefillDue {
    pub medication_id: String,
    pub name: String,
    pub refill_date: NaiveDate,
    /// Negative once the refill date has passed
    pub days_left: i64,
}

/// Active medications with refill reminders due within `within_days` of `today`.
///
/// Overdue refills are included. Ordered by refill date, then medication id.
pub fn refills_due(
    medications: &[Medication],
    today: NaiveDate,
    within_days: i64,
) -> Vec<RefillDue> {
    let mut due: Vec<RefillDue> = medications
        .iter()
        .filter(|m| m.active && m.refill_reminder)
        .filter_map(|m| {
            let refill_date = m.refill_date?;
            let days_left = (refill_date - today).num_days();
            (days_left <= within_days).then(|| RefillDue {
                medication_id: m.id.clone(),
                name: m.name.clone(),
                refill_date,
                days_left,
            })
        })
        .collect();
    due.sort_by(|a, b| {
        a.refill_date
            .cmp(&b.refill_date)
            .then_with(|| a.medication_id.cmp(&b.medication_id))
    });
    due
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NewMedication, NewSchedule};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    fn med(id: &str, refill_in: Option<i64>) -> Medication {
        let mut new = NewMedication::new(id, "1mg")
            .with_schedule(NewSchedule::daily("08:00".parse().unwrap()));
        if let Some(days) = refill_in {
            new = new.with_refill_date(today() + chrono::Duration::days(days));
        }
        new.build(id.to_string(), today().and_hms_opt(0, 0, 0).unwrap(), || {
            format!("{}-1", id)
        })
        .unwrap()
    }

    #[test]
    fn test_horizon_and_order() {
        let meds = vec![
            med("far", Some(45)),
            med("soon", Some(5)),
            med("late", Some(-2)),
            med("none", None),
        ];
        let due = refills_due(&meds, today(), 7);
        let ids: Vec<_> = due.iter().map(|d| d.medication_id.as_str()).collect();
        assert_eq!(ids, vec!["late", "soon"]);
        assert_eq!(due[0].days_left, -2);
        assert_eq!(due[1].days_left, 5);
    }

    #[test]
    fn test_inactive_and_disabled_reminders_skipped() {
        let mut inactive = med("a", Some(1));
        inactive.active = false;
        let mut silenced = med("b", Some(1));
        silenced.refill_reminder = false;
        assert!(refills_due(&[inactive, silenced], today(), 30).is_empty());
    }
}
