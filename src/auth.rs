//! Authentication token storage
//!
//! The bearer token is the only shared mutable state the client touches.
//! It is reached through an explicit [`AuthTokenProvider`] handed to the
//! composition root instead of ambient global storage.
//!
//! - [`MemoryTokenStore`] - in-process, for tests and short-lived tools
//! - [`FileTokenStore`] - persisted JSON file keyed by `jwt_token`
//! - [`Claims`] - decoded JWT payload

mod claims;

pub use claims::{decode_claims, Claims};

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tracing::warn;

use crate::error::{PesoError, Result};
use crate::util::TOKEN_KEY;

/// Capability to read and manage the current bearer token
pub trait AuthTokenProvider: Send + Sync {
    /// Current token, if a session exists
    fn token(&self) -> Option<String>;

    /// Store a freshly issued token, replacing any previous one
    fn init(&self, token: String) -> Result<()>;

    /// Forget the current token
    fn clear(&self) -> Result<()>;
}

/// In-process token store
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a token
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl AuthTokenProvider for MemoryTokenStore {
    fn token(&self) -> Option<String> {
        self.token.read().clone()
    }

    fn init(&self, token: String) -> Result<()> {
        *self.token.write() = Some(token);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.token.write() = None;
        Ok(())
    }
}

/// Token store persisted as a small JSON object on disk
///
/// The file may hold other keys; only `jwt_token` is read or written.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, serde_json::Value>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path).map_err(|e| PesoError::TokenStore {
            reason: format!("Failed to read {}: {}", self.path.display(), e),
        })?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|e| PesoError::TokenStore {
            reason: format!("Failed to parse {}: {}", self.path.display(), e),
        })
    }

    fn write_entries(&self, entries: &BTreeMap<String, serde_json::Value>) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| PesoError::TokenStore {
                reason: format!("Failed to create {}: {}", dir.display(), e),
            })?;
        }
        let content = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, content).map_err(|e| PesoError::TokenStore {
            reason: format!("Failed to write {}: {}", self.path.display(), e),
        })
    }
}

impl AuthTokenProvider for FileTokenStore {
    fn token(&self) -> Option<String> {
        match self.read_entries() {
            Ok(entries) => entries
                .get(TOKEN_KEY)
                .and_then(|v| v.as_str())
                .filter(|t| !t.is_empty())
                .map(str::to_string),
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable session file");
                None
            }
        }
    }

    fn init(&self, token: String) -> Result<()> {
        let mut entries = self.read_entries().unwrap_or_default();
        entries.insert(TOKEN_KEY.to_string(), serde_json::Value::String(token));
        self.write_entries(&entries)
    }

    fn clear(&self) -> Result<()> {
        let mut entries = self.read_entries().unwrap_or_default();
        if entries.remove(TOKEN_KEY).is_none() && !self.path.exists() {
            return Ok(());
        }
        self.write_entries(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn memory_store_lifecycle() {
        let store = MemoryTokenStore::new();
        assert!(store.token().is_none());

        store.init("abc.def.ghi".to_string()).unwrap();
        assert_eq!(store.token().as_deref(), Some("abc.def.ghi"));

        store.clear().unwrap();
        assert!(store.token().is_none());
    }

    #[test]
    fn memory_store_with_token() {
        let store = MemoryTokenStore::with_token("t");
        assert_eq!(store.token().as_deref(), Some("t"));
    }

    #[test]
    fn file_store_persists_under_token_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("peso").join("session.json");
        let store = FileTokenStore::new(&path);

        assert!(store.token().is_none());
        store.init("abc.def.ghi".to_string()).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["jwt_token"], "abc.def.ghi");

        // A second handle on the same file sees the token
        let other = FileTokenStore::new(&path);
        assert_eq!(other.token().as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn file_store_clear_keeps_other_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, r#"{"jwt_token":"x.y.z","theme":"dark"}"#).unwrap();

        let store = FileTokenStore::new(&path);
        store.clear().unwrap();

        assert!(store.token().is_none());
        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["theme"], "dark");
    }

    #[test]
    fn file_store_clear_without_file_is_noop() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let store = FileTokenStore::new(&path);

        store.clear().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn file_store_corrupt_file_reads_as_no_token() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let store = FileTokenStore::new(&path);
        assert!(store.token().is_none());

        // init overwrites the corrupt content
        store.init("a.b.c".to_string()).unwrap();
        assert_eq!(store.token().as_deref(), Some("a.b.c"));
    }
}
