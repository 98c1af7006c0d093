//! Persistent storage: the store trait, engine state layout and backends.

pub mod json_file;
pub mod memory;
pub mod traits;
pub mod types;

pub use json_file::JsonFileStore;
pub use memory::InMemoryStore;
pub use traits::PersistentStore;
pub use types::{State, MEDICATIONS_KEY, SETTINGS_KEY};
