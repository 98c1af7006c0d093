//! Output formatting helpers for the CLI (JSON documents, tables, detail views).

mod json;
mod text;

pub use json::{day_json, occurrence_json, print_json};
pub use text::{medication_detail, medication_table, occurrence_table};
