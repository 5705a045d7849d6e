//! Command implementations.

pub mod prepare;
pub mod version;

pub use prepare::PrepareRequest;

use crate::cli::CliError;

/// A parsed command ready to run.
#[derive(Debug, Clone)]
pub enum Command {
    /// Print version information.
    Version,
    /// Prepare a workspace.
    Prepare(PrepareRequest),
}

impl Command {
    /// Name used in spans and logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Version => "version",
            Self::Prepare(_) => "prepare",
        }
    }
}

/// Runs `command` and returns the text to print on stdout.
///
/// # Errors
///
/// Returns a [`CliError`] for argument, settings or workspace problems.
pub fn execute(command: Command, json_mode: bool) -> Result<String, CliError> {
    let span = crate::command_span!(command.name());
    let _guard = span.enter();

    match command {
        Command::Version => Ok(version::get_version_info(json_mode)),
        Command::Prepare(request) => prepare::execute_prepare(request, json_mode),
    }
}
