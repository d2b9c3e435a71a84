//! Configuration loader for chatseg.
//!
//! Reads `config.toml` from the data directory and deserializes it into
//! [`ChatsegConfig`]. Falls back to defaults when the file is missing or
//! malformed.

use std::path::{Path, PathBuf};

use chatseg_types::config::ChatsegConfig;

/// Staging directory name used when the config does not override it.
pub const DEFAULT_STAGING_DIR: &str = "temp";

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`ChatsegConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_config(data_dir: &Path) -> ChatsegConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return ChatsegConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ChatsegConfig::default();
        }
    };

    match toml::from_str::<ChatsegConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ChatsegConfig::default()
        }
    }
}

/// Resolve the staging directory.
///
/// Priority:
/// 1. `staging_dir` from the config; relative paths are taken from `data_dir`
/// 2. `{data_dir}/temp`
pub fn resolve_staging_dir(config: &ChatsegConfig, data_dir: &Path) -> PathBuf {
    match &config.staging_dir {
        Some(dir) if dir.is_absolute() => dir.clone(),
        Some(dir) => data_dir.join(dir),
        None => data_dir.join(DEFAULT_STAGING_DIR),
    }
}
