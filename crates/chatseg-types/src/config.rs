//! Configuration types for segment materialization and publishing.
//!
//! `ChatsegConfig` represents the `config.toml` that controls the publishing
//! callback base, the staging directory and network timeouts.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level configuration for media resolution and publishing.
///
/// Loaded from `{data_dir}/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatsegConfig {
    /// Base URL under which published files are served back
    /// (`{callback_api_base}/api/file/{token}`). Absent means publishing is
    /// unavailable.
    #[serde(default)]
    pub callback_api_base: Option<String>,

    /// Directory that receives downloaded and decoded media.
    /// Defaults to `{data_dir}/temp`.
    #[serde(default)]
    pub staging_dir: Option<PathBuf>,

    /// Timeout for a single media download.
    #[serde(default = "default_download_timeout_secs")]
    pub download_timeout_secs: u64,

    /// Lifetime of a registered file token.
    #[serde(default = "default_file_token_ttl_secs")]
    pub file_token_ttl_secs: u64,
}

fn default_download_timeout_secs() -> u64 {
    60
}

fn default_file_token_ttl_secs() -> u64 {
    300
}

impl Default for ChatsegConfig {
    fn default() -> Self {
        Self {
            callback_api_base: None,
            staging_dir: None,
            download_timeout_secs: default_download_timeout_secs(),
            file_token_ttl_secs: default_file_token_ttl_secs(),
        }
    }
}

impl ChatsegConfig {
    /// The callback base with a single trailing slash removed, or `None` when
    /// unset or blank.
    pub fn callback_base(&self) -> Option<&str> {
        self.callback_api_base
            .as_deref()
            .map(str::trim)
            .filter(|base| !base.is_empty())
            .map(|base| base.strip_suffix('/').unwrap_or(base))
    }
}
