use clap::builder::BoolishValueParser;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use pillbox_core::VERSION;

use crate::constants::DATA_ENV;

/// Pillbox - medication schedules, dose windows and reminders from the terminal
#[derive(Parser)]
#[command(name = "pillbox")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Data directory holding medications, settings and pending reminders
    #[arg(short, long, global = true, env = DATA_ENV, value_name = "DIR")]
    pub data: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Use ASCII symbols only
    #[arg(long, global = true)]
    pub ascii: bool,
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Data directory to record in the config file
    #[arg(value_name = "DIR")]
    pub path: Option<String>,

    /// IANA timezone used for "now" (local time when omitted)
    #[arg(long)]
    pub timezone: Option<String>,

    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `list` command
#[derive(Args)]
pub struct ListArgs {
    /// Include inactive medications
    #[arg(long)]
    pub all: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for commands taking one medication id
#[derive(Args)]
pub struct MedicationArgs {
    /// Medication ID
    #[arg(value_name = "ID")]
    pub id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `add` command
#[derive(Args)]
pub struct AddArgs {
    /// Medication name
    #[arg(long)]
    pub name: String,

    /// Dosage label (e.g. "100mg", "2 tablets")
    #[arg(long)]
    pub dosage: String,

    /// Dose time, HH:MM (repeat for several doses a day)
    #[arg(long = "time", value_name = "HH:MM", required = true)]
    pub times: Vec<String>,

    /// Weekdays the doses fire on: 0-6 with 0 = Sunday, or names (mon,wed,fri)
    #[arg(long, conflicts_with = "daily")]
    pub days: Option<String>,

    /// Fire every day (the default when --days is omitted)
    #[arg(long)]
    pub daily: bool,

    /// Availability window as START,END minute offsets around the dose time
    #[arg(long, allow_hyphen_values = true, value_name = "START,END")]
    pub window: Option<String>,

    /// Display color (hex)
    #[arg(long)]
    pub color: Option<String>,

    /// Free-text instructions
    #[arg(long)]
    pub instructions: Option<String>,

    /// Date the supply runs out (YYYY-MM-DD)
    #[arg(long)]
    pub refill_date: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// How `today` groups its occurrences
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum GroupBy {
    Time,
    Hour,
}

/// Arguments for the `today` command
#[derive(Args)]
pub struct TodayArgs {
    /// Day to show (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub date: Option<String>,

    /// Evaluate statuses at this time instead of now (HH:MM)
    #[arg(long, value_name = "HH:MM")]
    pub at: Option<String>,

    /// Group occurrences by exact time or by hour
    #[arg(long, value_enum)]
    pub group: Option<GroupBy>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `next` command
#[derive(Args)]
pub struct NextArgs {
    /// Look from this time instead of now (HH:MM)
    #[arg(long, value_name = "HH:MM")]
    pub at: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `take` and `untake` commands
#[derive(Args)]
pub struct TakeArgs {
    /// Medication ID
    #[arg(value_name = "MEDICATION")]
    pub medication_id: String,

    /// Schedule ID
    #[arg(value_name = "SCHEDULE")]
    pub schedule_id: String,

    /// Day the dose belongs to (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub date: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `reset` command
#[derive(Args)]
pub struct ResetArgs {
    /// Treat this day as today (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `reminders` command
#[derive(Args)]
pub struct RemindersArgs {
    /// Show the freshly compiled set instead of what is pending
    #[arg(long)]
    pub compiled: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `settings` command
#[derive(Args)]
pub struct SettingsArgs {
    /// Turn all reminders on or off
    #[arg(long, value_parser = BoolishValueParser::new(), value_name = "BOOL")]
    pub enabled: Option<bool>,

    /// Play a sound with reminders
    #[arg(long, value_parser = BoolishValueParser::new(), value_name = "BOOL")]
    pub sound: Option<bool>,

    /// Vibrate with reminders
    #[arg(long, value_parser = BoolishValueParser::new(), value_name = "BOOL")]
    pub vibration: Option<bool>,

    /// Minutes before a dose to send the heads-up (0 disables it)
    #[arg(long, value_name = "N")]
    pub reminder_minutes: Option<u32>,

    /// Sound to play
    #[arg(long)]
    pub sound_name: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `refills` command
#[derive(Args)]
pub struct RefillsArgs {
    /// Horizon in days (overdue refills are always shown)
    #[arg(long, value_name = "DAYS")]
    pub within: Option<i64>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `clear` command
#[derive(Args)]
pub struct ClearArgs {
    /// Confirm deleting every medication and setting
    #[arg(long)]
    pub yes: bool,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the config file and create the data store (seeds sample medications)
    Init(InitArgs),

    /// List medications
    List(ListArgs),

    /// Show one medication with its schedules
    Show(MedicationArgs),

    /// Add a medication
    Add(AddArgs),

    /// Delete a medication and its reminders
    Remove(MedicationArgs),

    /// Resume reminders for a medication
    Activate(MedicationArgs),

    /// Pause a medication without deleting it
    Deactivate(MedicationArgs),

    /// Show today's doses and their status
    Today(TodayArgs),

    /// Show the next dose due today
    Next(NextArgs),

    /// Mark a dose as taken
    Take(TakeArgs),

    /// Undo a taken mark
    Untake(TakeArgs),

    /// Clear taken marks from previous days
    Reset(ResetArgs),

    /// Show pending reminders
    Reminders(RemindersArgs),

    /// Show or change notification settings
    Settings(SettingsArgs),

    /// Show medications due for a refill
    Refills(RefillsArgs),

    /// Delete all medications and settings
    Clear(ClearArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
