use pillbox_core::{NewMedication, NewSchedule};

use crate::app::{report_outcome, AppContext};
use crate::cli::AddArgs;
use crate::helpers::{parse_date, parse_days, parse_time, parse_window};
use crate::output::print_json;
use crate::ui::{hint, print, receipt};

/// Build the new medication from flags: one schedule per `--time`, all
/// sharing the same weekdays and window.
fn new_medication(args: &AddArgs) -> anyhow::Result<NewMedication> {
    let days = args.days.as_deref().map(parse_days).transpose()?;
    let window = args.window.as_deref().map(parse_window).transpose()?;

    let mut medication = NewMedication::new(args.name.as_str(), args.dosage.as_str());
    for time in &args.times {
        let time_of_day = parse_time(time)?;
        let mut schedule = match days {
            Some(days) => NewSchedule::weekly(time_of_day, days),
            None => NewSchedule::daily(time_of_day),
        };
        if let Some(window) = window {
            schedule = schedule.with_window(window);
        }
        medication = medication.with_schedule(schedule);
    }
    if let Some(color) = &args.color {
        medication = medication.with_color(color.as_str());
    }
    if let Some(instructions) = &args.instructions {
        medication = medication.with_instructions(instructions.as_str());
    }
    if let Some(date) = &args.refill_date {
        medication = medication.with_refill_date(parse_date(date)?);
    }
    Ok(medication)
}

pub fn handle_add(ctx: &AppContext, args: &AddArgs) -> anyhow::Result<()> {
    let ui = ctx.ui(args.json);
    let new = new_medication(args)?;
    let mut store = ctx.open_store(&ui)?;

    let (id, outcome) = store.add_medication(new)?;
    report_outcome(&ui, &outcome);
    let medication = crate::commands::require_medication(&store, &id)?;

    if ui.mode.is_json() {
        return print_json(medication);
    }
    if ctx.quiet() {
        println!("{}", id);
        return Ok(());
    }

    let schedules = medication
        .schedules
        .iter()
        .map(|s| format!("{} at {}", s.id, s.time_of_day))
        .collect::<Vec<_>>()
        .join(", ");
    print(
        &ui,
        &receipt(
            &ui,
            "Added medication",
            &[
                ("ID", id.as_str()),
                ("Name", medication.name.as_str()),
                ("Schedules", schedules.as_str()),
            ],
        ),
    );
    print(&ui, &hint(&ui, &format!("pillbox show {}", id)));
    Ok(())
}
