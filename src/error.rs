//! Crate error type.
//!
//! The scheduler itself cannot fail; errors come from reading input,
//! loading configuration, and validation.

use std::path::PathBuf;

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors surfaced by I/O, configuration and validation.
#[derive(Debug, Error)]
pub enum Error {
    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed dataset file.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed configuration document.
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    /// Input failed validation.
    #[error("invalid input: {}", join(.0))]
    InvalidInput(Vec<ValidationError>),

    /// A dataset directory lacks a required file.
    #[error("missing dataset file: {}", .0.display())]
    MissingDataset(PathBuf),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<Vec<ValidationError>> for Error {
    fn from(errors: Vec<ValidationError>) -> Self {
        Error::InvalidInput(errors)
    }
}

/// Result alias for fallible operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Flow;
    use crate::validation::validate_input;

    #[test]
    fn test_invalid_input_message() {
        let flows = vec![Flow::new(0, 0, 0, 1), Flow::new(0, 1, 0, 1)];
        let err: Error = validate_input(&flows, &[]).unwrap_err().into();
        let msg = err.to_string();
        assert!(msg.starts_with("invalid input: "));
        assert!(msg.contains("Flow 0 has zero bandwidth; Duplicate flow ID: 0"));
    }

    #[test]
    fn test_config_error_converts() {
        let err: Error = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_missing_dataset_message() {
        let err = Error::MissingDataset(PathBuf::from("data/0/port.txt"));
        assert_eq!(err.to_string(), "missing dataset file: data/0/port.txt");
    }
}
