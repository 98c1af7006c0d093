//! Reminder inspection and notification settings.

use pillbox_core::reminder::REMINDER_TITLE;
use pillbox_core::{NotificationSettings, NotificationSpec, Weekdays};

use crate::app::{report_outcome, AppContext};
use crate::cli::{RemindersArgs, SettingsArgs};
use crate::output::print_json;
use crate::ui::format::format_weekdays;
use crate::ui::{blank_line, header, hint, kv, print, table, Column, UiContext};

const REMINDER_COLUMNS: [Column; 5] = [
    Column::new("ID"),
    Column::new("Time"),
    Column::new("Days"),
    Column::new("Kind"),
    Column::new("Body"),
];

fn reminder_row(spec: &NotificationSpec) -> anyhow::Result<Vec<String>> {
    let days = match &spec.trigger.days_of_week {
        Some(days) => format_weekdays(&Weekdays::from_indices(days.iter().copied())?),
        None => "daily".to_string(),
    };
    let kind = if spec.title == REMINDER_TITLE {
        "heads-up"
    } else {
        "dose"
    };
    Ok(vec![
        spec.id.clone(),
        spec.trigger
            .time_of_day()
            .map(|t| t.to_string())
            .unwrap_or_else(|| format!("{:02}:{:02}", spec.trigger.hour, spec.trigger.minute)),
        days,
        kind.to_string(),
        spec.body.clone(),
    ])
}

pub fn handle_reminders(ctx: &AppContext, args: &RemindersArgs) -> anyhow::Result<()> {
    let ui = ctx.ui(args.json);
    let store = ctx.open_store(&ui)?;
    let specs = if args.compiled {
        store.compiled_notifications()
    } else {
        store.pending_notifications()?
    };

    if ui.mode.is_json() {
        return print_json(&specs);
    }
    if !ctx.quiet() {
        let context = if args.compiled { "compiled" } else { "pending" };
        print(&ui, &header(&ui, "reminders", Some(context)));
        blank_line(&ui);
    }
    if specs.is_empty() {
        print(&ui, "No reminders.");
        if !store.settings().enabled {
            print(&ui, &hint(&ui, "Reminders are off: pillbox settings --enabled true"));
        }
        return Ok(());
    }

    let rows = specs
        .iter()
        .map(reminder_row)
        .collect::<anyhow::Result<Vec<_>>>()?;
    print(&ui, &table(&ui, &REMINDER_COLUMNS, &rows));
    Ok(())
}

/// Apply the flags that were given on top of `current`.
fn apply_settings(current: &NotificationSettings, args: &SettingsArgs) -> NotificationSettings {
    let mut settings = current.clone();
    if let Some(enabled) = args.enabled {
        settings.enabled = enabled;
    }
    if let Some(sound) = args.sound {
        settings.sound_enabled = sound;
    }
    if let Some(vibration) = args.vibration {
        settings.vibration_enabled = vibration;
    }
    if let Some(minutes) = args.reminder_minutes {
        settings.reminder_minutes_before = minutes;
    }
    if let Some(name) = &args.sound_name {
        settings.selected_sound_name = name.clone();
    }
    settings
}

fn print_settings(ui: &UiContext, settings: &NotificationSettings, pending: usize) {
    let on_off = |value: bool| if value { "on" } else { "off" };
    print(ui, &kv(ui, "Enabled", on_off(settings.enabled)));
    print(ui, &kv(ui, "Sound", on_off(settings.sound_enabled)));
    print(ui, &kv(ui, "Sound Name", &settings.selected_sound_name));
    print(ui, &kv(ui, "Vibration", on_off(settings.vibration_enabled)));
    print(
        ui,
        &kv(
            ui,
            "Reminder Minutes",
            &settings.reminder_minutes_before.to_string(),
        ),
    );
    print(ui, &kv(ui, "Pending", &pending.to_string()));
}

pub fn handle_settings(ctx: &AppContext, args: &SettingsArgs) -> anyhow::Result<()> {
    let ui = ctx.ui(args.json);
    let mut store = ctx.open_store(&ui)?;

    let updated = apply_settings(store.settings(), args);
    if &updated != store.settings() {
        let outcome = store.update_settings(updated);
        report_outcome(&ui, &outcome);
    }
    let pending = store.pending_notifications()?.len();

    if ui.mode.is_json() {
        return print_json(store.settings());
    }
    if !ctx.quiet() {
        print(&ui, &header(&ui, "settings", None));
        blank_line(&ui);
    }
    print_settings(&ui, store.settings(), pending);
    Ok(())
}
