//! Input parsing helpers for the CLI.

mod parsing;

pub use parsing::{parse_date, parse_days, parse_time, parse_timezone, parse_window};
