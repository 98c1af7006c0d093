//! JSON output for `--json` commands.
//!
//! Core records already serialize in camelCase; these helpers add the
//! derived fields (status, remaining minutes) a script would otherwise have
//! to recompute.

use chrono::NaiveDateTime;
use pillbox_core::{DaySummary, ScheduleOccurrence};
use serde::Serialize;

/// Print any serializable value as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// An occurrence plus its status at `now`.
pub fn occurrence_json(
    occurrence: &ScheduleOccurrence,
    now: NaiveDateTime,
) -> anyhow::Result<serde_json::Value> {
    let mut value = serde_json::to_value(occurrence)?;
    if let Some(map) = value.as_object_mut() {
        map.insert(
            "status".to_string(),
            serde_json::to_value(occurrence.status(now))?,
        );
        let remaining = occurrence
            .window
            .remaining(now, occurrence.taken)
            .map(|d| d.num_minutes());
        map.insert("remainingMinutes".to_string(), serde_json::json!(remaining));
    }
    Ok(value)
}

/// The `today` document: the evaluation instant, the summary and every occurrence.
pub fn day_json(
    now: NaiveDateTime,
    occurrences: &[ScheduleOccurrence],
    summary: &DaySummary,
) -> anyhow::Result<serde_json::Value> {
    let items = occurrences
        .iter()
        .map(|o| occurrence_json(o, now))
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(serde_json::json!({
        "now": now,
        "summary": summary,
        "occurrences": items,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pillbox_core::sample::sample_medications;
    use pillbox_core::schedule::occurrences_on;

    fn now() -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2024, 3, 4)
            .and_then(|d| d.and_hms_opt(8, 5, 0))
            .expect("valid timestamp")
    }

    #[test]
    fn test_occurrence_json_adds_status() {
        let meds = sample_medications(now()).expect("sample should build");
        let occurrences = occurrences_on(now().date(), &meds);
        let value = occurrence_json(&occurrences[0], now()).expect("json should build");
        assert_eq!(value["status"], "available");
        assert_eq!(value["remainingMinutes"], 10);
        assert_eq!(value["timeOfDay"], "08:00");
    }

    #[test]
    fn test_day_json_shape() {
        let meds = sample_medications(now()).expect("sample should build");
        let occurrences = occurrences_on(now().date(), &meds);
        let summary = pillbox_core::schedule::summarize(&occurrences, now());
        let value = day_json(now(), &occurrences, &summary).expect("json should build");
        assert_eq!(value["summary"]["total"], occurrences.len());
        assert_eq!(
            value["occurrences"].as_array().map(Vec::len),
            Some(occurrences.len())
        );
    }
}
