//! JSON-file-backed key/value store.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use parking_lot::RwLock;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ConfigError;

/// Well-known store keys.
pub mod keys {
    /// Raw vault key bytes, base64. Set once at install, never overwritten.
    pub const INSTALLATION_VALUE: &str = "installationValue";
    /// Encrypted API credential.
    pub const API_KEY: &str = "apiKey";
    /// Target model id.
    pub const MODEL: &str = "model";
    /// Endpoint override for self-hosted providers.
    pub const URL: &str = "url";
    /// Provider identity.
    pub const PROVIDER: &str = "provider";
    /// Picker state flag, so a reload resumes the prior state.
    pub const PICKER: &str = "picker";
}

/// Device-local key/value store.
///
/// Writes flush to disk best-effort; a flush failure is logged, never
/// surfaced, because every persisted value can be re-entered or
/// regenerated except the installation key, which is written through
/// [`LocalStore::install`].
pub struct LocalStore {
    path: Option<PathBuf>,
    values: RwLock<HashMap<String, Value>>,
}

impl LocalStore {
    /// Open (or create) a store backed by the given file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            HashMap::new()
        };
        Ok(Self {
            path: Some(path),
            values: RwLock::new(values),
        })
    }

    /// Store that lives only in memory.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            values: RwLock::new(HashMap::new()),
        }
    }

    /// One-time installation: generate the 256-bit vault key if absent.
    /// Re-running against an installed store is a no-op.
    pub fn install(&self) -> Result<(), ConfigError> {
        if self.values.read().contains_key(keys::INSTALLATION_VALUE) {
            debug!("installation key already present, leaving untouched");
            return Ok(());
        }
        let mut key = [0u8; 32];
        OsRng.fill_bytes(&mut key);
        self.set(keys::INSTALLATION_VALUE, BASE64.encode(key));
        Ok(())
    }

    /// Decoded vault key bytes, if installed.
    pub fn vault_key(&self) -> Option<[u8; 32]> {
        let encoded: String = self.get(keys::INSTALLATION_VALUE)?;
        let bytes = BASE64.decode(encoded).ok()?;
        bytes.try_into().ok()
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let values = self.values.read();
        let value = values.get(key)?;
        serde_json::from_value(value.clone()).ok()
    }

    pub fn set<T: Serialize>(&self, key: &str, value: T) {
        let value = match serde_json::to_value(value) {
            Ok(v) => v,
            Err(e) => {
                warn!("value for {} not serializable: {}", key, e);
                return;
            }
        };
        self.values.write().insert(key.to_string(), value);
        self.flush();
    }

    pub fn remove(&self, key: &str) {
        self.values.write().remove(key);
        self.flush();
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.read().contains_key(key)
    }

    fn flush(&self) {
        let Some(ref path) = self.path else { return };
        let snapshot = {
            let values = self.values.read();
            serde_json::to_string_pretty(&*values)
        };
        let result = snapshot.map_err(std::io::Error::other).and_then(|json| {
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir)?;
            }
            fs::write(path, json)
        });
        if let Err(e) = result {
            warn!("store flush to {} failed: {}", path.display(), e);
        }
    }
}
