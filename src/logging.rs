//! Logging initialization.
//!
//! Installs a `tracing` subscriber once at startup. The filter defaults to
//! `info` for this crate and can be overridden with `PELMET_LOG` (same syntax
//! as `RUST_LOG`) or the `log_filter` config field.

use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

/// Environment variable controlling the log filter.
const LOG_ENV_VAR: &str = "PELMET_LOG";

/// Guard ensuring the subscriber is installed at most once.
static INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initializes the global tracing subscriber.
///
/// Safe to call more than once; only the first call installs the subscriber.
pub fn init(config_filter: Option<&str>) {
    INITIALIZED.get_or_init(|| {
        let filter = std::env::var(LOG_ENV_VAR)
            .ok()
            .or_else(|| config_filter.map(String::from))
            .unwrap_or_else(|| "pelmet=info".to_string());

        let env_filter =
            EnvFilter::try_new(&filter).unwrap_or_else(|_| EnvFilter::new("pelmet=info"));

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    });
}
