//! Application-level utilities for the Pillbox CLI.
//!
//! - Application context for unified CLI + config handling
//! - Path resolution for the config file and data directory
//! - Clock selection (fixed, configured timezone, system local)
//! - Reporting of recoverable mutation failures

mod clock;
mod context;
mod outcome;
mod resolver;

pub use context::{AppContext, Store};
pub use outcome::report_outcome;
pub use resolver::resolve_config_path;
