//! jlsprep CLI Application
//!
//! Writes a `.jls-config` file next to every module of a Java workspace so a
//! language server can resolve sources and classpath per module.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use jlsprep::cli::{self, CliError, EXIT_CLI, EXIT_OK, exit_code_for, render_error};
use jlsprep::commands::{self, Command};
use jlsprep::tracing::{self, TracingConfig};

fn main() {
    // Tracing may be unusable while panicking, so write directly.
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {panic_info}");
        eprintln!("Internal error occurred. Run with RUST_LOG=debug for more information.");
    }));

    std::process::exit(run(cli::parse()));
}

fn run(cli: cli::Cli) -> i32 {
    let tracing_config = TracingConfig {
        format: cli.tracing_format(),
        level: cli.level.into(),
        ..Default::default()
    };
    if let Err(err) = tracing::init_tracing(tracing_config) {
        render_error(
            &CliError::config_with_help(err.to_string(), "Check the RUST_LOG environment variable"),
            cli.json,
        );
        return EXIT_CLI;
    }

    let command: Command = cli.command.into();
    match commands::execute(command, cli.json) {
        Ok(output) => {
            println!("{output}");
            EXIT_OK
        }
        Err(err) => {
            render_error(&err, cli.json);
            exit_code_for(&err)
        }
    }
}
