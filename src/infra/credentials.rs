//! Usage: Bearer credential persistence (single named slot shared across runs).

use crate::infra::app_paths;
use crate::shared::error::AppResult;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

const CREDENTIALS_FILE: &str = "credentials.json";

static STORAGE_FAIL_OPEN_WARNED: AtomicBool = AtomicBool::new(false);

/// Where the current bearer token lives between runs.
///
/// The store is deliberately dumb: one slot, last write wins, no cross-process
/// coordination. An absent token is an expected state, never an error — when
/// storage itself is unavailable the store behaves as "logged out".
pub trait TokenStore: Send + Sync {
    /// Overwrites any existing value. The token is not validated.
    fn set_token(&self, token: &str);
    /// Returns the stored token, or `None` when never set or cleared. Must not
    /// panic.
    fn get_token(&self) -> Option<String>;
    /// Idempotent; clearing an absent token is a no-op.
    fn clear_token(&self);
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CredentialSlot {
    #[serde(default)]
    token: Option<String>,
}

fn warn_storage_unavailable(action: &str, err: &dyn std::fmt::Display) {
    if !STORAGE_FAIL_OPEN_WARNED.swap(true, Ordering::Relaxed) {
        tracing::warn!("credential storage unavailable on {action}: {err}; continuing logged out");
    }
}

/// File-backed store: `{"token": "..."}` in the app data directory.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_default_path() -> AppResult<Self> {
        Ok(Self::new(app_paths::app_data_dir()?.join(CREDENTIALS_FILE)))
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn set_token(&self, token: &str) {
        let slot = CredentialSlot {
            token: Some(token.to_string()),
        };
        let content = match serde_json::to_vec_pretty(&slot) {
            Ok(content) => content,
            Err(err) => {
                warn_storage_unavailable("write", &err);
                return;
            }
        };

        // Write-then-rename keeps a reader from ever seeing a torn slot.
        let tmp_path = self.path.with_file_name(format!("{CREDENTIALS_FILE}.tmp"));
        if let Err(err) = std::fs::write(&tmp_path, content) {
            warn_storage_unavailable("write", &err);
            return;
        }
        if let Err(err) = std::fs::rename(&tmp_path, &self.path) {
            warn_storage_unavailable("write", &err);
        }
    }

    fn get_token(&self) -> Option<String> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                warn_storage_unavailable("read", &err);
                return None;
            }
        };
        match serde_json::from_str::<CredentialSlot>(&content) {
            Ok(slot) => slot.token,
            Err(err) => {
                warn_storage_unavailable("read", &err);
                None
            }
        }
    }

    fn clear_token(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => warn_storage_unavailable("clear", &err),
        }
    }
}

/// Process-local store for tests and embeddings that want no persistence.
#[derive(Default)]
pub struct MemoryTokenStore {
    slot: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn set_token(&self, token: &str) {
        if let Ok(mut slot) = self.slot.write() {
            *slot = Some(token.to_string());
        }
    }

    fn get_token(&self) -> Option<String> {
        self.slot.read().ok().and_then(|slot| slot.clone())
    }

    fn clear_token(&self) {
        if let Ok(mut slot) = self.slot.write() {
            *slot = None;
        }
    }
}
