use crate::app::{report_outcome, AppContext};
use crate::cli::ClearArgs;
use crate::errors::CliError;
use crate::ui::{hint, print, receipt};

pub fn handle_clear(ctx: &AppContext, args: &ClearArgs) -> anyhow::Result<()> {
    if !args.yes {
        return Err(CliError::invalid_input(
            "Refusing to delete all medications and settings\nRe-run with --yes to confirm.",
        )
        .into());
    }

    let ui = ctx.ui(false);
    let mut store = ctx.open_store(&ui)?;
    let removed = store.medications().len();
    let outcome = store.clear_all();
    report_outcome(&ui, &outcome);

    if !ctx.quiet() {
        let removed_display = removed.to_string();
        print(
            &ui,
            &receipt(
                &ui,
                "Cleared all data",
                &[("Medications", removed_display.as_str())],
            ),
        );
        print(
            &ui,
            &hint(&ui, "The sample medications are seeded again on next use."),
        );
    }
    Ok(())
}
