//! Unix Domain Socket IPC for external event injection.
//!
//! External tools (window manager hooks, scripts, the bundled CLI) connect to
//! a stream socket and write line-delimited messages of the form
//! `event-name:arg1:arg2`. Each line is forwarded verbatim into the process
//! as an external event; the socket never writes back.
//!
//! If the socket doesn't exist or the connection fails, the app is not
//! running - the client maps those cases to a single "not running" error the
//! CLI can render.

use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crate::constants::APP_NAME;
use crate::error::PanelError;

/// Whether the server is running.
static SERVER_RUNNING: AtomicBool = AtomicBool::new(false);

/// Default socket path, shared by server and client.
#[must_use]
pub fn default_socket_path() -> PathBuf {
    std::env::temp_dir().join(format!("{APP_NAME}.sock"))
}

/// Parses one wire line into an event name and its arguments.
///
/// Empty argument segments are dropped; a line without a name yields `None`.
#[must_use]
pub fn parse_event_line(line: &str) -> Option<(String, Vec<String>)> {
    let mut parts = line.trim().split(':');
    let name = parts.next()?.trim();
    if name.is_empty() {
        return None;
    }
    let args = parts
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(String::from)
        .collect();
    Some((name.to_string(), args))
}

// ============================================================================
// Server (App Side)
// ============================================================================

/// Starts the IPC socket server.
///
/// Called once during app initialization; the server runs in a background
/// thread and invokes `handler` for every well-formed line.
pub fn start_server<F>(socket_path: &Path, handler: F)
where
    F: Fn(String, Vec<String>) + Send + Sync + 'static,
{
    if SERVER_RUNNING.swap(true, Ordering::SeqCst) {
        tracing::warn!("ipc server already running");
        return;
    }

    // Remove any stale socket file
    let _ = std::fs::remove_file(socket_path);

    let listener = match UnixListener::bind(socket_path) {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(path = %socket_path.display(), error = %err, "failed to bind ipc socket");
            SERVER_RUNNING.store(false, Ordering::SeqCst);
            return;
        }
    };

    tracing::info!(path = %socket_path.display(), "ipc server listening");

    let handler = Arc::new(handler);
    thread::Builder::new()
        .name("pelmet-ipc-server".to_string())
        .spawn(move || {
            for stream in listener.incoming() {
                if !SERVER_RUNNING.load(Ordering::SeqCst) {
                    break;
                }
                match stream {
                    Ok(stream) => {
                        let handler = Arc::clone(&handler);
                        thread::spawn(move || handle_connection(stream, handler.as_ref()));
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "ipc connection error");
                    }
                }
            }
        })
        .expect("Failed to spawn IPC server thread");
}

/// Handles a single client connection, which may carry several lines.
fn handle_connection<F>(stream: UnixStream, handler: &F)
where
    F: Fn(String, Vec<String>),
{
    let reader = BufReader::new(stream);
    for line in reader.lines() {
        match line {
            Ok(line) => {
                if let Some((name, args)) = parse_event_line(&line) {
                    tracing::debug!(name = %name, "ipc event received");
                    handler(name, args);
                }
            }
            Err(err) => {
                tracing::debug!(error = %err, "ipc read error");
                break;
            }
        }
    }
}

/// Stops the IPC server and removes the socket file.
pub fn stop_server(socket_path: &Path) {
    SERVER_RUNNING.store(false, Ordering::SeqCst);
    let _ = std::fs::remove_file(socket_path);
}

/// Whether the server is running.
#[must_use]
pub fn is_server_running() -> bool { SERVER_RUNNING.load(Ordering::SeqCst) }

// ============================================================================
// Client (CLI Side)
// ============================================================================

/// Maps connection errors to a single "not running" error.
fn map_connect_error(err: std::io::Error) -> PanelError {
    match err.kind() {
        std::io::ErrorKind::ConnectionRefused
        | std::io::ErrorKind::NotFound
        | std::io::ErrorKind::BrokenPipe
        | std::io::ErrorKind::ConnectionReset => {
            PanelError::Ipc("pelmet is not running".to_string())
        }
        _ => PanelError::Io(err),
    }
}

/// Sends one external event to the running app.
///
/// # Errors
///
/// [`PanelError::Ipc`] when the app is not running, [`PanelError::Io`] for
/// other socket failures.
pub fn send_event(socket_path: &Path, name: &str, args: &[String]) -> Result<(), PanelError> {
    if !socket_path.exists() {
        return Err(PanelError::Ipc("pelmet is not running".to_string()));
    }

    let mut stream = UnixStream::connect(socket_path).map_err(map_connect_error)?;

    let mut line = name.to_string();
    for arg in args {
        line.push(':');
        line.push_str(arg);
    }
    writeln!(stream, "{line}").map_err(map_connect_error)?;
    Ok(())
}

/// Checks whether the app is running by connecting to its socket.
#[must_use]
pub fn is_app_running(socket_path: &Path) -> bool {
    socket_path.exists() && UnixStream::connect(socket_path).is_ok()
}
