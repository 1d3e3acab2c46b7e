//! CLI for talking to a running Pelmet instance.
//!
//! Commands communicate with the desktop process over its IPC socket; they
//! never start one.

mod commands;

use clap::Parser;
pub use commands::Cli;

use crate::error::PanelError;

/// Runs the CLI.
///
/// Parses command-line arguments and executes the appropriate command.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn run() -> Result<(), PanelError> {
    let cli = Cli::parse();
    cli.execute()
}
