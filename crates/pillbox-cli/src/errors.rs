//! CLI error types for structured error handling.
//!
//! Typed errors map to specific exit codes. Core errors that escape a
//! command are classified in [`exit_code_for`].

use std::fmt;

use pillbox_core::PillboxError;

use crate::constants::exit_codes;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Medication, schedule, or config not found
    NotFound { message: String, hint: String },

    /// Invalid user input
    InvalidInput(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, hint } => write!(f, "{}\n{}", message, hint),
            CliError::InvalidInput(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Create a NotFound error with message and hint.
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
        }
    }
}

/// Exit code for any error escaping a command handler.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        return cli_err.exit_code();
    }
    match err.downcast_ref::<PillboxError>() {
        Some(PillboxError::NotFound(_)) => exit_codes::NOT_FOUND,
        Some(PillboxError::Validation(_) | PillboxError::InvalidInput(_)) => {
            exit_codes::INVALID_INPUT
        }
        _ => exit_codes::GENERAL,
    }
}

/// Split an error into its headline and an optional hint line.
pub fn message_and_hint(err: &anyhow::Error) -> (String, Option<String>) {
    if let Some(CliError::NotFound { message, hint }) = err.downcast_ref::<CliError>() {
        return (message.clone(), Some(hint.clone()));
    }
    let text = format!("{:#}", err);
    match text.split_once('\n') {
        Some((head, rest)) if !rest.trim().is_empty() => {
            (head.to_string(), Some(rest.trim().to_string()))
        }
        _ => (text, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_error_exit_codes() {
        assert_eq!(CliError::not_found("x", "y").exit_code(), exit_codes::NOT_FOUND);
        assert_eq!(CliError::invalid_input("x").exit_code(), exit_codes::INVALID_INPUT);
    }

    #[test]
    fn test_core_errors_map_to_exit_codes() {
        let not_found = anyhow::Error::new(PillboxError::NotFound("medication 9".into()));
        assert_eq!(exit_code_for(&not_found), exit_codes::NOT_FOUND);

        let invalid = anyhow::Error::new(PillboxError::Validation("name is empty".into()));
        assert_eq!(exit_code_for(&invalid), exit_codes::INVALID_INPUT);

        let other = anyhow::anyhow!("disk on fire");
        assert_eq!(exit_code_for(&other), exit_codes::GENERAL);
    }

    #[test]
    fn test_message_and_hint_for_not_found() {
        let err = anyhow::Error::new(CliError::not_found("No medication 9", "pillbox list"));
        let (message, hint) = message_and_hint(&err);
        assert_eq!(message, "No medication 9");
        assert_eq!(hint.as_deref(), Some("pillbox list"));
    }

    #[test]
    fn test_message_and_hint_single_line() {
        let err = anyhow::anyhow!("bad time");
        assert_eq!(message_and_hint(&err), ("bad time".to_string(), None));
    }
}
