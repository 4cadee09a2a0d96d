//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate.
//! Only structural failures surface here: unparseable cells, malformed
//! numbers and unattributed punches are recovered locally where they occur.

use thiserror::Error;

/// The main error type for the payroll engine.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/policy.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/policy.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A session snapshot is not in the expected format.
    #[error("Invalid session snapshot: {message}")]
    SessionFormat {
        /// A description of what made the snapshot invalid.
        message: String,
    },

    /// A session snapshot was written by a newer release.
    #[error("Unsupported session version {version} (newest supported is {supported})")]
    UnsupportedSessionVersion {
        /// The version found in the snapshot.
        version: u64,
        /// The newest version this build understands.
        supported: u64,
    },

    /// Extraction found no punches in the input table.
    #[error("No punch data found in the input table")]
    NoPunchesFound,

    /// A month key was not of the form `YYYY-MM`.
    #[error("Invalid month key '{value}': expected YYYY-MM")]
    InvalidMonthKey {
        /// The rejected text.
        value: String,
    },
}

impl EngineError {
    /// Shorthand for a [`EngineError::SessionFormat`] error.
    pub fn session_format(message: impl Into<String>) -> Self {
        Self::SessionFormat {
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
