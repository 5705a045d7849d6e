use crate::commands::{Command, PrepareRequest};
use crate::tracing::{LogLevel, TracingFormat};
use clap::{Parser, Subcommand};
use miette::{Diagnostic, Report};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application
pub const EXIT_OK: i32 = 0;
/// Argument, configuration or startup error exit code
pub const EXIT_CLI: i32 = 1;

/// CLI-specific error types with exit code mapping
#[derive(Error, Debug, Clone, Diagnostic)]
pub enum CliError {
    /// Invalid arguments or settings file
    #[error("Configuration error: {message}")]
    #[diagnostic(code(jlsprep::cli::config))]
    Config {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
    /// The workspace could not be prepared at all
    #[error("Preparation failed: {message}")]
    #[diagnostic(code(jlsprep::cli::prepare))]
    Prepare {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
}

impl CliError {
    /// Create a new configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: None,
        }
    }

    /// Create a new configuration error with help text
    #[must_use]
    pub fn config_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create a new preparation error
    #[must_use]
    pub fn prepare(message: impl Into<String>) -> Self {
        Self::Prepare {
            message: message.into(),
            help: None,
        }
    }

    /// Add help text to an existing error.
    #[must_use]
    pub fn with_help(self, help_text: impl Into<String>) -> Self {
        let help = Some(help_text.into());
        match self {
            Self::Config { message, .. } => Self::Config { message, help },
            Self::Prepare { message, .. } => Self::Prepare { message, help },
        }
    }
}

/// A workspace that is not a directory is a usage problem; anything else
/// stopping the run is reported as a preparation failure.
impl From<jlsprep_extract::Error> for CliError {
    fn from(err: jlsprep_extract::Error) -> Self {
        match err {
            jlsprep_extract::Error::Scan { root, message } => Self::config_with_help(
                format!("{message}: {}", root.display()),
                "Pass an existing directory with --workspace or JLSPREP_WORKSPACE",
            ),
            jlsprep_extract::Error::Config { message } => Self::config(message),
            other => Self::prepare(other.to_string()),
        }
    }
}

/// Map CLI error to exit code
#[must_use]
pub const fn exit_code_for(err: &CliError) -> i32 {
    match err {
        CliError::Config { .. } | CliError::Prepare { .. } => EXIT_CLI,
    }
}

/// Render error appropriately based on JSON flag
pub fn render_error(err: &CliError, json_mode: bool) {
    if json_mode {
        let envelope = ErrorEnvelope::new(serde_json::json!({
            "code": match err {
                CliError::Config { .. } => "config",
                CliError::Prepare { .. } => "prepare",
            },
            "message": err.to_string()
        }));
        match serde_json::to_string(&envelope) {
            Ok(json) => println!("{json}"),
            Err(_) => eprintln!("Error serializing error response"),
        }
    } else {
        let report = Report::new(err.clone());
        eprintln!("{report:?}");
        let _ = io::stderr().flush();
    }
}

/// Success response envelope for JSON output
#[derive(Debug, Clone, Serialize)]
pub struct OkEnvelope<T> {
    /// Always "ok"
    pub status: &'static str,
    /// The payload
    pub data: T,
}

impl<T> OkEnvelope<T> {
    /// Create a new success envelope
    #[must_use]
    pub const fn new(data: T) -> Self {
        Self { status: "ok", data }
    }
}

/// Error response envelope for JSON output
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelope<E> {
    /// Always "error"
    pub status: &'static str,
    /// The error payload
    pub error: E,
}

impl<E> ErrorEnvelope<E> {
    /// Create a new error envelope
    #[must_use]
    pub const fn new(error: E) -> Self {
        Self { status: "error", error }
    }
}

#[derive(Parser, Debug)]
#[command(name = "jlsprep")]
#[command(about = "Prepares per-module Java language server configuration for a workspace")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        short = 'l',
        long,
        global = true,
        help = "Set logging level",
        default_value = "warn",
        value_enum
    )]
    pub level: LogLevel,

    #[arg(long, global = true, help = "Output results and logs in JSON format")]
    pub json: bool,

    #[arg(long, global = true, help = "Log output format", value_enum)]
    pub log_format: Option<TracingFormat>,
}

impl Cli {
    /// Log format chosen by the flags; `--log-format` wins over `--json`.
    #[must_use]
    pub fn tracing_format(&self) -> TracingFormat {
        match self.log_format {
            Some(format) => format,
            None if self.json => TracingFormat::Json,
            None => TracingFormat::Compact,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Show version information")]
    Version,
    #[command(about = "Extract modules and write a configuration file for each")]
    Prepare {
        #[arg(
            long,
            short = 'w',
            env = "JLSPREP_WORKSPACE",
            help = "Workspace root directory",
            default_value = "."
        )]
        workspace: PathBuf,
        #[arg(long, short = 'c', help = "Settings file (defaults to <workspace>/jlsprep.toml)")]
        config: Option<PathBuf>,
        #[arg(long, help = "Report what would be written without writing")]
        dry_run: bool,
        #[arg(long, env = "JLSPREP_GRADLE", help = "Gradle command used when the workspace has no wrapper")]
        gradle: Option<String>,
    },
}

impl From<Commands> for Command {
    fn from(cmd: Commands) -> Self {
        match cmd {
            Commands::Version => Self::Version,
            Commands::Prepare {
                workspace,
                config,
                dry_run,
                gradle,
            } => Self::Prepare(PrepareRequest {
                workspace,
                config,
                dry_run,
                gradle,
            }),
        }
    }
}

#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
