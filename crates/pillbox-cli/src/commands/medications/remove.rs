use crate::app::{report_outcome, AppContext};
use crate::cli::MedicationArgs;
use crate::commands::require_medication;
use crate::output::print_json;
use crate::ui::{print, receipt};

pub fn handle_remove(ctx: &AppContext, args: &MedicationArgs) -> anyhow::Result<()> {
    let ui = ctx.ui(args.json);
    let mut store = ctx.open_store(&ui)?;
    let name = require_medication(&store, &args.id)?.name.clone();

    let outcome = store.delete_medication(&args.id)?;
    report_outcome(&ui, &outcome);

    if ui.mode.is_json() {
        return print_json(&serde_json::json!({
            "id": args.id,
            "removed": true,
            "scheduled": outcome.scheduled,
        }));
    }
    if !ctx.quiet() {
        print(
            &ui,
            &receipt(
                &ui,
                "Removed medication",
                &[("ID", args.id.as_str()), ("Name", name.as_str())],
            ),
        );
    }
    Ok(())
}
