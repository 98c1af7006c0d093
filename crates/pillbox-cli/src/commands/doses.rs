//! Adherence commands: take, untake, reset.

use chrono::NaiveDate;
use pillbox_core::schedule::taken_bit_count;

use crate::app::{report_outcome, AppContext, Store};
use crate::cli::{ResetArgs, TakeArgs};
use crate::commands::require_schedule;
use crate::helpers::parse_date;
use crate::output::print_json;
use crate::ui::{print, print_warning, receipt};

fn reset_date(store: &Store, date: Option<&str>) -> anyhow::Result<NaiveDate> {
    match date {
        Some(value) => parse_date(value),
        None => Ok(store.now().date()),
    }
}

pub fn handle_take(ctx: &AppContext, args: &TakeArgs) -> anyhow::Result<()> {
    set_taken(ctx, args, true)
}

pub fn handle_untake(ctx: &AppContext, args: &TakeArgs) -> anyhow::Result<()> {
    set_taken(ctx, args, false)
}

fn set_taken(ctx: &AppContext, args: &TakeArgs, taken: bool) -> anyhow::Result<()> {
    let ui = ctx.ui(args.json);
    let mut store = ctx.open_store(&ui)?;
    let date = match args.date.as_deref() {
        Some(value) => parse_date(value)?,
        None => store.current_dose_date(&args.medication_id, &args.schedule_id),
    };

    let schedule = require_schedule(&store, &args.medication_id, &args.schedule_id)?;
    if taken && !schedule.fires_on(date) {
        print_warning(
            &ui,
            &format!("Schedule {} has no dose on {}", schedule.id, date),
        );
    }

    let outcome = if taken {
        store.mark_taken_on(&args.medication_id, &args.schedule_id, date)
    } else {
        store.unmark_taken_on(&args.medication_id, &args.schedule_id, date)
    };
    report_outcome(&ui, &outcome);

    if ui.mode.is_json() {
        return print_json(&serde_json::json!({
            "medicationId": args.medication_id,
            "scheduleId": args.schedule_id,
            "date": date,
            "taken": taken,
        }));
    }
    if !ctx.quiet() {
        let title = if taken {
            "Marked taken"
        } else {
            "Marked not taken"
        };
        let date_display = date.to_string();
        print(
            &ui,
            &receipt(
                &ui,
                title,
                &[
                    ("Medication", args.medication_id.as_str()),
                    ("Schedule", args.schedule_id.as_str()),
                    ("Date", date_display.as_str()),
                ],
            ),
        );
    }
    Ok(())
}

pub fn handle_reset(ctx: &AppContext, args: &ResetArgs) -> anyhow::Result<()> {
    let ui = ctx.ui(args.json);
    let mut store = ctx.open_store(&ui)?;
    let today = reset_date(&store, args.date.as_deref())?;

    let before = taken_bit_count(store.medications());
    let outcome = store.reset_daily_on(today);
    report_outcome(&ui, &outcome);
    let cleared = before - taken_bit_count(store.medications());

    if ui.mode.is_json() {
        return print_json(&serde_json::json!({
            "date": today,
            "cleared": cleared,
        }));
    }
    if !ctx.quiet() {
        let today_display = today.to_string();
        let cleared_display = cleared.to_string();
        print(
            &ui,
            &receipt(
                &ui,
                "Daily reset",
                &[
                    ("Date", today_display.as_str()),
                    ("Cleared", cleared_display.as_str()),
                ],
            ),
        );
    }
    Ok(())
}
