use std::path::PathBuf;

use crate::app::{resolve_config_path, AppContext};
use crate::cli::InitArgs;
use crate::config::{default_data_dir, write_config, PillboxConfig};
use crate::errors::CliError;
use crate::helpers::parse_timezone;
use crate::output::print_json;
use crate::ui::{hint, print, receipt};

pub fn handle_init(ctx: &AppContext, args: &InitArgs) -> anyhow::Result<()> {
    let ui = ctx.ui(args.json);
    let config_path = resolve_config_path()?;
    if config_path.exists() && !args.force {
        return Err(CliError::invalid_input(format!(
            "Pillbox is already initialized ({})\nUse --force to overwrite the config file.",
            config_path.display()
        ))
        .into());
    }

    // Normalized so the config holds the canonical zone name
    let timezone = args
        .timezone
        .as_deref()
        .map(parse_timezone)
        .transpose()?
        .map(|tz| tz.name().to_string());

    let data_dir = match args.path.as_deref().or(ctx.cli().data.as_deref()) {
        Some(path) => PathBuf::from(path),
        None => default_data_dir()?,
    };

    write_config(&config_path, &PillboxConfig::new(&data_dir, timezone.clone()))?;
    let store = ctx.open_store_at(&ui, &data_dir, timezone.as_deref())?;
    let medications = store.medications().len();
    let scheduled = store.pending_notifications()?.len();

    if ui.mode.is_json() {
        return print_json(&serde_json::json!({
            "configPath": config_path,
            "dataDir": data_dir,
            "timezone": timezone,
            "medications": medications,
            "scheduled": scheduled,
        }));
    }
    if ctx.quiet() {
        return Ok(());
    }

    let config_display = config_path.display().to_string();
    let data_display = data_dir.display().to_string();
    let medications_display = medications.to_string();
    let scheduled_display = scheduled.to_string();
    print(
        &ui,
        &receipt(
            &ui,
            "Initialized pillbox",
            &[
                ("Config", config_display.as_str()),
                ("Data", data_display.as_str()),
                ("Timezone", timezone.as_deref().unwrap_or("local")),
                ("Medications", medications_display.as_str()),
                ("Reminders", scheduled_display.as_str()),
            ],
        ),
    );
    print(&ui, &hint(&ui, "pillbox today"));
    Ok(())
}
