//! InMemoryTokenRegistry -- DashMap-backed [`TokenRegistry`].
//!
//! Maps opaque UUID tokens to local paths for the `GET /api/file/{token}`
//! route. Tokens are single-use and expire after a fixed lifetime; expired
//! entries are swept whenever a new path is registered.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use chatseg_core::publish::TokenRegistry;
use chatseg_types::config::ChatsegConfig;
use chatseg_types::error::SegmentError;

#[derive(Debug, Clone)]
struct TokenEntry {
    path: PathBuf,
    expires_at: DateTime<Utc>,
}

/// Thread-safe token table. Clones share the same table.
#[derive(Debug, Clone)]
pub struct InMemoryTokenRegistry {
    entries: Arc<DashMap<String, TokenEntry>>,
    ttl: TimeDelta,
}

impl InMemoryTokenRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
        }
    }

    pub fn from_config(config: &ChatsegConfig) -> Self {
        Self::new(Duration::from_secs(config.file_token_ttl_secs))
    }

    /// Consume `token`, returning its path if it has not expired.
    pub fn take(&self, token: &str) -> Option<PathBuf> {
        let (_, entry) = self.entries.remove(token)?;
        (entry.expires_at > Utc::now()).then_some(entry.path)
    }

    /// Number of tokens currently held, expired or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn sweep(&self, now: DateTime<Utc>) {
        self.entries.retain(|_, entry| entry.expires_at > now);
    }
}

impl Default for InMemoryTokenRegistry {
    fn default() -> Self {
        Self::from_config(&ChatsegConfig::default())
    }
}

impl TokenRegistry for InMemoryTokenRegistry {
    async fn register(&self, path: &Path) -> Result<String, SegmentError> {
        let now = Utc::now();
        self.sweep(now);

        let token = Uuid::new_v4().to_string();
        let expires_at = now.checked_add_signed(self.ttl).unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.entries.insert(
            token.clone(),
            TokenEntry {
                path: path.to_path_buf(),
                expires_at,
            },
        );
        tracing::debug!(
            token = %token,
            path = %path.display(),
            expires_at = %expires_at,
            "registered file token"
        );
        Ok(token)
    }
}
