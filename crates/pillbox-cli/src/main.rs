//! Pillbox CLI - medication schedules, dose windows and reminders from the terminal
//!
//! This is the command-line interface for Pillbox. It wires the core schedule
//! store to a JSON data directory and a file-backed reminder queue.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod dispatcher;
mod errors;
mod helpers;
mod output;
mod ui;

use clap::Parser;
use pillbox_core::VERSION;
use tracing_subscriber::EnvFilter;

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::commands::{clear, doses, init, medications, misc, refills, reminders, today};
use crate::constants::LOG_ENV;
use crate::errors::{exit_code_for, message_and_hint};
use crate::ui::render::print_error;
use crate::ui::UiContext;

fn init_tracing() {
    let filter = std::env::var(LOG_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .and_then(|value| EnvFilter::try_new(value).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let ctx = AppContext::new(&cli);

    if let Err(e) = run(&ctx, &cli) {
        let ui_ctx = UiContext::from_env(false, cli.no_color, cli.ascii);
        let (message, hint) = message_and_hint(&e);
        print_error(&ui_ctx, &message, hint.as_deref());
        std::process::exit(exit_code_for(&e));
    }
}

fn run(ctx: &AppContext, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Init(args)) => {
            init::handle_init(ctx, args)?;
        }
        Some(Commands::List(args)) => {
            medications::handle_list(ctx, args)?;
        }
        Some(Commands::Show(args)) => {
            medications::handle_show(ctx, args)?;
        }
        Some(Commands::Add(args)) => {
            medications::handle_add(ctx, args)?;
        }
        Some(Commands::Remove(args)) => {
            medications::handle_remove(ctx, args)?;
        }
        Some(Commands::Activate(args)) => {
            medications::handle_activate(ctx, args)?;
        }
        Some(Commands::Deactivate(args)) => {
            medications::handle_deactivate(ctx, args)?;
        }
        Some(Commands::Today(args)) => {
            today::handle_today(ctx, args)?;
        }
        Some(Commands::Next(args)) => {
            today::handle_next(ctx, args)?;
        }
        Some(Commands::Take(args)) => {
            doses::handle_take(ctx, args)?;
        }
        Some(Commands::Untake(args)) => {
            doses::handle_untake(ctx, args)?;
        }
        Some(Commands::Reset(args)) => {
            doses::handle_reset(ctx, args)?;
        }
        Some(Commands::Reminders(args)) => {
            reminders::handle_reminders(ctx, args)?;
        }
        Some(Commands::Settings(args)) => {
            reminders::handle_settings(ctx, args)?;
        }
        Some(Commands::Refills(args)) => {
            refills::handle_refills(ctx, args)?;
        }
        Some(Commands::Clear(args)) => {
            clear::handle_clear(ctx, args)?;
        }
        Some(Commands::Completions(args)) => {
            misc::handle_completions(args)?;
        }
        None => {
            println!("Pillbox v{}", VERSION);
            println!("\nQuickstart:");
            println!("  pillbox today");
            println!("  pillbox add Aspirin --dosage 81mg --time 08:00 --daily");
            println!("  pillbox take <MEDICATION> <SCHEDULE>");
            println!("  pillbox reminders");
            println!("\nRun `pillbox --help` for full usage.");
        }
    }

    Ok(())
}
