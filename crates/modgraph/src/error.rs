//! Error types for configuration emission.
//!
//! Resolution itself is infallible: any collection of modules (even an empty
//! one) resolves to a collection of configurations. Only writing those
//! configurations to disk can fail.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for module graph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while emitting resolved configurations.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// I/O error occurred.
    #[error("I/O error during {operation}{}: {source}", path.as_ref().map(|p| format!(" at {}", p.display())).unwrap_or_default())]
    #[diagnostic(
        code(jlsprep::modgraph::io_error),
        help("Check that the module directory exists and that you have permission to write to it")
    )]
    Io {
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
        /// Optional path where the error occurred.
        path: Option<PathBuf>,
        /// Description of the operation being performed.
        operation: String,
    },

    /// JSON serialization error.
    #[error("JSON serialization error{}: {source}", path.as_ref().map(|p| format!(" for {}", p.display())).unwrap_or_default())]
    #[diagnostic(code(jlsprep::modgraph::json_error))]
    Json {
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
        /// Optional path of the file being written.
        path: Option<PathBuf>,
    },
}

impl Error {
    /// Builds an [`Error::Io`] for the given path and operation.
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>, operation: impl Into<String>) -> Self {
        Self::Io {
            source,
            path: Some(path.into()),
            operation: operation.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            source,
            path: None,
            operation: "file operation".to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::Json { source, path: None }
    }
}
