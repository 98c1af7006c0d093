//! Text and table output for medications and occurrences.

use chrono::NaiveDateTime;
use pillbox_core::{Medication, ScheduleOccurrence};

use crate::ui::format::{
    format_duration, format_recurrence, format_timestamp, single_line, truncate,
};
use crate::ui::{kv, simple_table, status_label, table, Column, UiContext};

const NAME_MAX: usize = 32;

const MEDICATION_COLUMNS: [Column; 5] = [
    Column::new("ID"),
    Column::new("Name"),
    Column::new("Dosage"),
    Column::new("Doses"),
    Column::new("Active"),
];

const SCHEDULE_COLUMNS: [Column; 5] = [
    Column::new("Schedule"),
    Column::new("Time"),
    Column::new("Days"),
    Column::new("Window"),
    Column::new("Enabled"),
];

const OCCURRENCE_COLUMNS: [Column; 6] = [
    Column::new("Time"),
    Column::new("Medication"),
    Column::new("Dosage"),
    Column::new("Status"),
    Column::new("Remaining"),
    Column::new("Dose"),
];

fn yes_no(value: bool) -> String {
    let text = if value { "yes" } else { "no" };
    text.to_string()
}

/// One row per medication.
pub fn medication_table(ui: &UiContext, medications: &[Medication]) -> String {
    let rows: Vec<Vec<String>> = medications
        .iter()
        .map(|m| {
            let times = m
                .schedules
                .iter()
                .map(|s| s.time_of_day.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            vec![
                m.id.clone(),
                truncate(&m.name, NAME_MAX),
                m.dosage.clone(),
                times,
                yes_no(m.active),
            ]
        })
        .collect();
    table(ui, &MEDICATION_COLUMNS, &rows)
}

/// Full detail of one medication, schedules included.
pub fn medication_detail(ui: &UiContext, medication: &Medication) -> String {
    let mut lines = vec![
        kv(ui, "ID", &medication.id),
        kv(ui, "Name", &medication.name),
        kv(ui, "Dosage", &medication.dosage),
        kv(ui, "Color", &medication.color),
        kv(ui, "Active", &yes_no(medication.active)),
    ];
    if let Some(instructions) = &medication.instructions {
        lines.push(kv(ui, "Instructions", &single_line(instructions)));
    }
    if let Some(date) = medication.refill_date {
        let reminder = if medication.refill_reminder { "" } else { " (no reminder)" };
        lines.push(kv(ui, "Refill Date", &format!("{}{}", date, reminder)));
    }
    let pretty = ui.mode.is_pretty();
    lines.push(kv(ui, "Created", &format_timestamp(&medication.created_at, pretty)));
    lines.push(kv(ui, "Updated", &format_timestamp(&medication.updated_at, pretty)));

    let rows: Vec<Vec<String>> = medication
        .schedules
        .iter()
        .map(|s| {
            let window = s.window();
            vec![
                s.id.clone(),
                s.time_of_day.to_string(),
                format_recurrence(s),
                format!("{:+},{:+}", window.start_offset, window.end_offset),
                yes_no(s.enabled),
            ]
        })
        .collect();
    if ui.mode.is_pretty() {
        lines.push(String::new());
    }
    lines.push(simple_table(ui, &SCHEDULE_COLUMNS, &rows));
    lines.join("\n")
}

/// Occurrences with their status at `now`.
pub fn occurrence_table(
    ui: &UiContext,
    occurrences: &[ScheduleOccurrence],
    now: NaiveDateTime,
) -> String {
    let rows: Vec<Vec<String>> = occurrences
        .iter()
        .map(|o| occurrence_row(ui, o, now))
        .collect();
    simple_table(ui, &OCCURRENCE_COLUMNS, &rows)
}

fn occurrence_row(ui: &UiContext, o: &ScheduleOccurrence, now: NaiveDateTime) -> Vec<String> {
    let remaining = o
        .window
        .remaining(now, o.taken)
        .map(format_duration)
        .unwrap_or_else(|| "-".to_string());
    vec![
        o.time_of_day.to_string(),
        truncate(&o.medication_name, NAME_MAX),
        o.dosage.clone(),
        status_label(ui, o.status(now)),
        remaining,
        format!("{} {}", o.medication_id, o.schedule_id),
    ]
}
