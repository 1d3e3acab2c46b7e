//! Pelmet - declarative always-on-top bars and popovers for macOS.
//!
//! A host application describes floating overlay regions - bars, indicators,
//! and anchored popovers - and the engine materializes them as borderless,
//! transparent native surfaces that follow a CSS-style bounding-box position
//! language, survive display topology changes, and participate in a
//! focus-aware popover lifecycle.
//!
//! The library exposes the engine and its collaborators; the binary wires
//! them into a desktop process with a CLI for injecting external events.

// Infrastructure modules
pub mod cli;
pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod events;
pub mod ipc;
mod logging;

// Core modules
pub mod coordinator;
pub mod engine;
pub mod geometry;
pub mod monitor;
pub mod platform;
pub mod popover;
pub mod windows;

use std::sync::Arc;
use std::time::Duration;

use coordinator::Orchestrator;
use engine::{Engine, EngineOptions};

/// How long the desktop process waits for declared windows before giving up
/// on hiding the coordinator surface.
const STARTUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs the desktop process.
///
/// Determines the process role from the spawn context, starts the engine,
/// declares the configured windows when running as the coordinator, and
/// serves the IPC socket until interrupted.
///
/// # Panics
///
/// Panics if the tokio runtime cannot be built.
pub fn run() {
    config::init();
    let config = config::get_config();
    logging::init(config.log_filter.as_deref());

    let role = context::RoleContext::from_env();
    tracing::info!(?role, "starting pelmet");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to build tokio runtime");

    runtime.block_on(async move {
        let options = EngineOptions {
            origin: config
                .origin
                .clone()
                .unwrap_or_else(|| constants::DEFAULT_ORIGIN.to_string()),
            hover_focus: config.hover_focus,
        };

        #[cfg(target_os = "macos")]
        let backend = platform::macos::MacosBackend::new();
        #[cfg(not(target_os = "macos"))]
        let backend = {
            let (backend, _remote) = platform::headless::HeadlessBackend::new();
            backend
        };

        let (handle, bus) = Engine::spawn(backend, options);
        let orchestrator = Arc::new(Orchestrator::new(role, handle, bus));

        let socket_path = config.socket_path.clone().unwrap_or_else(ipc::default_socket_path);

        if orchestrator.role().is_coordinator() {
            // Declare everything up front so wait_for_all sees the full set,
            // then realize the surfaces concurrently.
            for declaration in &config.windows {
                orchestrator.declare(&declaration.id);
            }
            for declaration in config.windows.clone() {
                let orchestrator = Arc::clone(&orchestrator);
                tokio::spawn(async move {
                    if let Err(err) = orchestrator
                        .create_inline_window(
                            &declaration.id,
                            declaration.url.clone(),
                            declaration.position.clone(),
                            declaration.window,
                        )
                        .await
                    {
                        tracing::error!(id = %declaration.id, error = %err, "failed to create declared window");
                    }
                });
            }

            {
                let orchestrator = Arc::clone(&orchestrator);
                ipc::start_server(&socket_path, move |name, args| {
                    orchestrator.forward_external(&name, args);
                });
            }

            // The engine imposes no timeout on stuck windows; the process
            // does, so a single bad declaration cannot wedge startup.
            if tokio::time::timeout(STARTUP_TIMEOUT, orchestrator.wait_for_all())
                .await
                .is_err()
            {
                tracing::warn!(
                    pending = orchestrator.pending_count(),
                    "declared windows did not all come up in time"
                );
            }

            if config.hide_coordinator && orchestrator.pending_count() == 0 {
                if let Err(err) = orchestrator.hide_self().await {
                    tracing::warn!(error = %err, "failed to hide coordinator surface");
                }
            }

            tracing::info!("coordinator ready");
        } else {
            tracing::info!("child surface role; rendering is delegated to the embedding host");
        }

        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("interrupt received, shutting down"),
            Err(err) => tracing::error!(error = %err, "failed to listen for interrupt"),
        }

        if orchestrator.role().is_coordinator() {
            ipc::stop_server(&socket_path);
        }
        let _ = orchestrator.engine().shutdown().await;
    });
}
