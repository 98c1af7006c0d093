//! Medication CRUD commands.

mod active;
mod add;
mod list;
mod remove;
mod show;

pub use active::{handle_activate, handle_deactivate};
pub use add::handle_add;
pub use list::handle_list;
pub use remove::handle_remove;
pub use show::handle_show;
