//! jlsprep - Java language server workspace preparation
//!
//! Library side of the `jlsprep` binary: argument parsing, settings loading,
//! tracing setup and the command implementations. The heavy lifting lives in
//! `jlsprep-extract` (build descriptor extraction) and `jlsprep-modgraph`
//! (closure resolution and configuration files).

// CLI output goes to stdout/stderr directly
#![allow(clippy::print_stdout, clippy::print_stderr)]

/// CLI argument parsing, errors and exit codes.
pub mod cli;
/// Command implementations.
pub mod commands;
/// Settings file loading.
pub mod settings;
/// Tracing subscriber setup.
pub mod tracing;
