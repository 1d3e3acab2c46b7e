//! Pelmet - declarative always-on-top bars and popovers for macOS.
//!
//! This binary serves as both the desktop process and the CLI:
//! - When called with no arguments or with `--desktop`: runs the desktop process
//! - When called with subcommands (e.g., `pelmet event workspace-changed`):
//!   runs CLI commands against the already-running desktop process

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let run_desktop = args.len() == 1 || args.get(1).is_some_and(|arg| arg == "--desktop");

    if run_desktop {
        pelmet_lib::run();
    } else if let Err(err) = pelmet_lib::cli::run() {
        eprintln!("pelmet: {err}");
        std::process::exit(1);
    }
}
