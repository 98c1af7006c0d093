use pillbox_core::Medication;

use crate::app::AppContext;
use crate::cli::ListArgs;
use crate::output::{medication_table, print_json};
use crate::ui::{blank_line, header, hint, print};

pub fn handle_list(ctx: &AppContext, args: &ListArgs) -> anyhow::Result<()> {
    let ui = ctx.ui(args.json);
    let store = ctx.open_store(&ui)?;
    let medications: Vec<Medication> = store
        .medications()
        .iter()
        .filter(|m| args.all || m.active)
        .cloned()
        .collect();

    if ui.mode.is_json() {
        return print_json(&medications);
    }
    if ctx.quiet() {
        for medication in &medications {
            println!("{}", medication.id);
        }
        return Ok(());
    }

    let context = if args.all { Some("all") } else { None };
    print(&ui, &header(&ui, "list", context));
    blank_line(&ui);
    if medications.is_empty() {
        print(&ui, "No medications.");
        print(
            &ui,
            &hint(&ui, "pillbox add --name <NAME> --dosage <DOSE> --time HH:MM"),
        );
        return Ok(());
    }
    print(&ui, &medication_table(&ui, &medications));
    Ok(())
}
