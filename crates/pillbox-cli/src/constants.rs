//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells, clap usage errors)
/// - 3+: Application-specific errors
pub mod exit_codes {
    pub const GENERAL: i32 = 1;

    /// Medication, schedule, or config not found.
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or a rejected mutation.
    pub const INVALID_INPUT: i32 = 4;
}

/// Env var overriding the config file location.
pub const CONFIG_ENV: &str = "PILLBOX_CONFIG";

/// Env var overriding the data directory (also read by `--data`).
pub const DATA_ENV: &str = "PILLBOX_DATA";

/// Preferred log filter env var; `RUST_LOG` is the fallback.
pub const LOG_ENV: &str = "PILLBOX_LOG";

/// File holding the CLI dispatcher's pending notifications.
pub const PENDING_FILE: &str = "pending.json";

/// Default horizon for `pillbox refills`.
pub const DEFAULT_REFILL_DAYS: i64 = 7;

/// Freezes the wall clock ("YYYY-MM-DDTHH:MM"); used for scripted runs and tests.
pub const NOW_ENV: &str = "PILLBOX_NOW";
