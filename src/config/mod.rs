//! Configuration loading.
//!
//! The configuration is plain JSON, searched at the user config directory
//! (`~/.config/pelmet/pelmet.json` or the platform equivalent) and then at
//! `~/.pelmet.json`. A missing file is not an error; defaults apply.

mod types;

use std::path::PathBuf;
use std::sync::OnceLock;

pub use types::{ConfigError, PelmetConfig, WindowDeclaration};

use crate::constants::APP_NAME;

/// Global configuration instance, loaded once at startup.
static CONFIG: OnceLock<PelmetConfig> = OnceLock::new();

/// Custom config path override (set via CLI `--config`).
static CUSTOM_CONFIG_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Search paths for the configuration file, in preference order.
#[must_use]
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join(APP_NAME).join(format!("{APP_NAME}.json")));
    }
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(format!(".{APP_NAME}.json")));
    }
    paths
}

/// Sets a custom configuration file path to use instead of the search paths.
///
/// Must be called before [`init`] or [`get_config`] to take effect. Returns
/// `false` if a path was already set.
pub fn set_custom_config_path(path: PathBuf) -> bool { CUSTOM_CONFIG_PATH.set(path).is_ok() }

/// Loads a configuration from a specific path.
///
/// # Errors
///
/// [`ConfigError`] when the file is missing, unreadable, or invalid.
pub fn load_config_from_path(path: &PathBuf) -> Result<PelmetConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound);
    }
    let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
    serde_json::from_str(&contents).map_err(|err| ConfigError::Parse(err.to_string()))
}

fn load_or_default() -> PelmetConfig {
    let candidates = CUSTOM_CONFIG_PATH
        .get()
        .map_or_else(config_paths, |path| vec![path.clone()]);

    for path in candidates {
        match load_config_from_path(&path) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "configuration loaded");
                return config;
            }
            Err(ConfigError::NotFound) => {}
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to load configuration, using defaults");
                return PelmetConfig::default();
            }
        }
    }

    PelmetConfig::default()
}

/// Initializes the configuration system.
pub fn init() { let _ = get_config(); }

/// Returns the loaded configuration.
pub fn get_config() -> &'static PelmetConfig { CONFIG.get_or_init(load_or_default) }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_paths_end_with_expected_names() {
        let paths = config_paths();
        assert!(!paths.is_empty());
        assert!(
            paths
                .iter()
                .any(|p| p.to_string_lossy().contains("pelmet"))
        );
    }

    #[test]
    fn test_load_missing_path_is_not_found() {
        let path = PathBuf::from("/nonexistent/pelmet.json");
        assert!(matches!(
            load_config_from_path(&path),
            Err(ConfigError::NotFound)
        ));
    }

    #[test]
    fn test_load_invalid_json_is_parse_error() {
        let dir = std::env::temp_dir().join("pelmet-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(matches!(
            load_config_from_path(&path),
            Err(ConfigError::Parse(_))
        ));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_valid_file() {
        let dir = std::env::temp_dir().join("pelmet-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("valid.json");
        std::fs::write(&path, r#"{"hoverFocus":true}"#).unwrap();

        let config = load_config_from_path(&path).unwrap();
        assert!(config.hover_focus);
        let _ = std::fs::remove_file(&path);
    }
}
