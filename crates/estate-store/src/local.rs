//! Script-readable key-value backing for the client runtime.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use estate_core::traits::CredentialStore;
use estate_core::types::Credentials;

use crate::keys::{access_token_key, refresh_token_key};

/// Key-value credential store, optionally persisted to a JSON file.
///
/// The access-token TTL is advisory here; entries do not expire by
/// themselves and are only replaced by a later write or removed by `clear`.
/// Persistence failures are logged and never surface to callers, the
/// in-memory slots stay authoritative for the process lifetime.
#[derive(Debug, Default)]
pub struct LocalCredentialStore {
    /// Storage slots by key.
    slots: RwLock<HashMap<String, String>>,
    /// Backing file, when persisted.
    file: Option<PathBuf>,
}

impl LocalCredentialStore {
    /// A store that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Opens a file-backed store, loading any slots already on disk.
    ///
    /// A missing or unreadable file starts an empty store.
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let slots = load_slots(&path).await;
        debug!(path = %path.display(), entries = slots.len(), "Opened local credential store");
        Self {
            slots: RwLock::new(slots),
            file: Some(path),
        }
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    async fn persist(&self, slots: &HashMap<String, String>) {
        let Some(path) = &self.file else {
            return;
        };
        if let Err(e) = write_atomically(path, slots).await {
            warn!(path = %path.display(), error = %e, "Failed to persist credentials");
        }
    }
}

#[async_trait]
impl CredentialStore for LocalCredentialStore {
    async fn write(&self, access_token: &str, refresh_token: &str, access_ttl_seconds: u64) {
        let mut slots = self.slots.write().await;
        slots.insert(access_token_key(), access_token.to_string());
        slots.insert(refresh_token_key(), refresh_token.to_string());
        self.persist(&slots).await;
        debug!(access_ttl_seconds, "Stored credentials");
    }

    async fn read(&self) -> Option<Credentials> {
        let slots = self.slots.read().await;
        let credentials = Credentials {
            access_token: slots.get(&access_token_key()).cloned(),
            refresh_token: slots.get(&refresh_token_key()).cloned(),
        };
        (!credentials.is_empty()).then_some(credentials)
    }

    async fn clear(&self) {
        let mut slots = self.slots.write().await;
        slots.remove(&access_token_key());
        slots.remove(&refresh_token_key());
        self.persist(&slots).await;
        debug!("Cleared credentials");
    }
}

async fn load_slots(path: &Path) -> HashMap<String, String> {
    let raw = match tokio::fs::read(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return HashMap::new(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Unreadable credential file, starting empty");
            return HashMap::new();
        }
    };

    serde_json::from_slice(&raw).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "Corrupt credential file, starting empty");
        HashMap::new()
    })
}

/// Writes to a sibling temp file then renames over the target, so a crash
/// never leaves a half-written file behind.
async fn write_atomically(path: &Path, slots: &HashMap<String, String>) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_vec_pretty(slots)?;
    let tmp = path.with_extension("tmp");
    tokio::fs::write(&tmp, json).await?;
    tokio::fs::rename(&tmp, path).await
}
