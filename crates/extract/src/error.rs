//! Error types for module extraction.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while discovering descriptors or extracting modules.
///
/// Errors raised for a single descriptor never abort a run: the pipeline
/// logs them and continues with the remaining descriptors.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// I/O error occurred.
    #[error("I/O error during {operation}{}: {source}", path.as_ref().map(|p| format!(" at {}", p.display())).unwrap_or_default())]
    #[diagnostic(code(jlsprep::extract::io_error))]
    Io {
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
        /// Optional path where the error occurred.
        path: Option<PathBuf>,
        /// Description of the operation being performed.
        operation: String,
    },

    /// The build tool could not be started.
    #[error("Failed to run '{program}': {source}")]
    #[diagnostic(
        code(jlsprep::extract::process_spawn),
        help("Install the build tool or add a wrapper script (e.g. gradlew) to the workspace")
    )]
    ProcessSpawn {
        /// Program that was executed.
        program: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The build tool reported a failed build for a descriptor.
    #[error("Build failed for {}", descriptor.display())]
    #[diagnostic(
        code(jlsprep::extract::build_failed),
        help("Run the build manually in the descriptor's directory to see the full error")
    )]
    BuildFailed {
        /// Descriptor whose build failed.
        descriptor: PathBuf,
        /// Build tool output collected up to the failure.
        output: String,
    },

    /// Descriptor discovery failed.
    #[error("Failed to scan {}: {message}", root.display())]
    #[diagnostic(code(jlsprep::extract::scan_failed))]
    Scan {
        /// Directory being scanned.
        root: PathBuf,
        /// Description of the failure.
        message: String,
    },

    /// A project descriptor could not be parsed.
    #[error("Invalid descriptor {}: {message}", descriptor.display())]
    #[diagnostic(code(jlsprep::extract::descriptor))]
    Descriptor {
        /// Descriptor being parsed.
        descriptor: PathBuf,
        /// Description of the problem.
        message: String,
    },

    /// Extraction settings are unusable.
    #[error("Invalid extraction settings: {message}")]
    #[diagnostic(code(jlsprep::extract::config))]
    Config {
        /// Description of what is invalid.
        message: String,
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

    /// Builds an [`Error::Descriptor`].
    pub fn descriptor(descriptor: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Descriptor {
            descriptor: descriptor.into(),
            message: message.into(),
        }
    }

    /// Builds an [`Error::Config`].
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
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
