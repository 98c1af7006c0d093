use crate::app::AppContext;
use crate::cli::MedicationArgs;
use crate::commands::require_medication;
use crate::output::{medication_detail, print_json};
use crate::ui::{blank_line, header, print};

pub fn handle_show(ctx: &AppContext, args: &MedicationArgs) -> anyhow::Result<()> {
    let ui = ctx.ui(args.json);
    let store = ctx.open_store(&ui)?;
    let medication = require_medication(&store, &args.id)?;

    if ui.mode.is_json() {
        return print_json(medication);
    }
    if !ctx.quiet() {
        print(&ui, &header(&ui, "show", Some(&medication.name)));
        blank_line(&ui);
    }
    print(&ui, &medication_detail(&ui, medication));
    Ok(())
}
