//! UI primitives for the Pillbox CLI.
//!
//! - **Context**: environment detection (TTY, width, color, unicode)
//! - **Mode**: output mode resolution (json, plain, pretty)
//! - **Theme**: badges, dose-status markers, styles
//! - **Render**: tables, headers, receipts, hints
//! - **Format**: durations, weekday sets, truncation

mod context;
pub mod format;
mod mode;
pub mod render;
pub mod theme;

pub use context::UiContext;
pub use mode::OutputMode;
pub use theme::Badge;

pub use render::{
    badge, blank_line, header, hint, kv, print, print_warning, receipt, simple_table,
    status_label, table, Column,
};
