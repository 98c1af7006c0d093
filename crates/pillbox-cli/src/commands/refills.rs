use crate::app::AppContext;
use crate::cli::RefillsArgs;
use crate::constants::DEFAULT_REFILL_DAYS;
use crate::errors::CliError;
use crate::output::print_json;
use crate::ui::format::format_days_left;
use crate::ui::{blank_line, header, print, table, Column};

const REFILL_COLUMNS: [Column; 4] = [
    Column::new("ID"),
    Column::new("Name"),
    Column::new("Refill Date"),
    Column::new("Due"),
];

pub fn handle_refills(ctx: &AppContext, args: &RefillsArgs) -> anyhow::Result<()> {
    let ui = ctx.ui(args.json);
    let within = args.within.unwrap_or(DEFAULT_REFILL_DAYS);
    if within < 0 {
        return Err(CliError::invalid_input("--within must not be negative").into());
    }

    let store = ctx.open_store(&ui)?;
    let due = store.refills_due(within);

    if ui.mode.is_json() {
        return print_json(&due);
    }
    if !ctx.quiet() {
        print(
            &ui,
            &header(&ui, "refills", Some(&format!("next {} days", within))),
        );
        blank_line(&ui);
    }
    if due.is_empty() {
        print(&ui, &format!("No refills due in the next {} days.", within));
        return Ok(());
    }

    let rows: Vec<Vec<String>> = due
        .iter()
        .map(|r| {
            vec![
                r.medication_id.clone(),
                r.name.clone(),
                r.refill_date.to_string(),
                format_days_left(r.days_left),
            ]
        })
        .collect();
    print(&ui, &table(&ui, &REFILL_COLUMNS, &rows));
    Ok(())
}
