//! CLI command definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::PanelError;
use crate::ipc;

/// Pelmet - declarative always-on-top bars and popovers.
#[derive(Debug, Parser)]
#[command(name = "pelmet", version, about)]
pub struct Cli {
    /// Override the IPC socket path.
    #[arg(long, global = true)]
    socket: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Inject an external event into the running app.
    ///
    /// The event is forwarded verbatim to every subscribed child window,
    /// e.g. `pelmet event workspace-changed coding`.
    Event {
        /// Event name, kebab-case by convention.
        name: String,
        /// Positional event arguments.
        args: Vec<String>,
    },

    /// Check whether the app is running.
    Ping,
}

impl Cli {
    /// Executes the parsed command.
    ///
    /// # Errors
    ///
    /// [`PanelError::Ipc`] when the app is not running.
    pub fn execute(self) -> Result<(), PanelError> {
        let socket_path = self.socket.unwrap_or_else(ipc::default_socket_path);

        match self.command {
            Command::Event { name, args } => ipc::send_event(&socket_path, &name, &args),
            Command::Ping => {
                if ipc::is_app_running(&socket_path) {
                    println!("pelmet is running");
                    Ok(())
                } else {
                    Err(PanelError::Ipc("pelmet is not running".to_string()))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_parses() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_event_command_parses_args() {
        let cli = Cli::try_parse_from(["pelmet", "event", "workspace-changed", "coding"]).unwrap();
        match cli.command {
            Command::Event { name, args } => {
                assert_eq!(name, "workspace-changed");
                assert_eq!(args, vec!["coding"]);
            }
            Command::Ping => panic!("expected event command"),
        }
    }

    #[test]
    fn test_socket_override_is_global() {
        let cli = Cli::try_parse_from(["pelmet", "ping", "--socket", "/tmp/x.sock"]).unwrap();
        assert_eq!(cli.socket, Some(PathBuf::from("/tmp/x.sock")));
    }
}
