use crate::app::{report_outcome, AppContext};
use crate::cli::MedicationArgs;
use crate::commands::require_medication;
use crate::output::print_json;
use crate::ui::{print, receipt};

pub fn handle_activate(ctx: &AppContext, args: &MedicationArgs) -> anyhow::Result<()> {
    set_active(ctx, args, true)
}

pub fn handle_deactivate(ctx: &AppContext, args: &MedicationArgs) -> anyhow::Result<()> {
    set_active(ctx, args, false)
}

fn set_active(ctx: &AppContext, args: &MedicationArgs, active: bool) -> anyhow::Result<()> {
    let ui = ctx.ui(args.json);
    let mut store = ctx.open_store(&ui)?;
    let name = require_medication(&store, &args.id)?.name.clone();

    let outcome = store.set_active(&args.id, active)?;
    report_outcome(&ui, &outcome);

    if ui.mode.is_json() {
        return print_json(&serde_json::json!({
            "id": args.id,
            "active": active,
            "scheduled": outcome.scheduled,
        }));
    }
    if !ctx.quiet() {
        let title = if active {
            "Activated medication"
        } else {
            "Deactivated medication"
        };
        let reminders = outcome.scheduled.to_string();
        print(
            &ui,
            &receipt(
                &ui,
                title,
                &[
                    ("ID", args.id.as_str()),
                    ("Name", name.as_str()),
                    ("Reminders", reminders.as_str()),
                ],
            ),
        );
    }
    Ok(())
}
