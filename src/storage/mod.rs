//! Preference storage
//!
//! A flat string key-value store holding the user's API endpoint, key, prompt and
//! model choice between sessions. One entry per field, no versioning, no expiry.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;

pub const KEY_API_URL: &str = "apiUrl";
pub const KEY_API_KEY: &str = "apiKey";
pub const KEY_PROMPT: &str = "prompt";
pub const KEY_MODEL: &str = "model";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to access preference file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Preference file is corrupt: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Key-value capability the controller persists preferences through
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// The four persisted fields, as read back from a store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferenceRecord {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub prompt: Option<String>,
    pub model: Option<String>,
}

impl PreferenceRecord {
    /// Read every key; unreadable keys count as absent.
    pub fn load(store: &dyn PreferenceStore) -> Self {
        let read = |key: &str| match store.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Could not read preference {}: {}", key, e);
                None
            }
        };

        Self {
            api_url: read(KEY_API_URL),
            api_key: read(KEY_API_KEY),
            prompt: read(KEY_PROMPT),
            model: read(KEY_MODEL),
        }
    }
}

/// In-process store; contents vanish with the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            entries: Mutex::new(map),
        }
    }

    /// Copy of all entries, for assertions.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON-object file store; every `set` rewrites the file
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open `path`, starting empty when the file does not exist yet.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Default location under the user's data directory.
    pub fn default_path() -> PathBuf {
        crate::config::AppConfig::data_dir().join("preferences.json")
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    /// The in-memory copy only changes once the file has been written.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let mut updated = entries.clone();
        updated.insert(key.to_string(), value.to_string());
        self.flush(&updated)?;
        *entries = updated;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get(KEY_MODEL).unwrap(), None);
        store.set(KEY_MODEL, "qwen:7b").unwrap();
        assert_eq!(store.get(KEY_MODEL).unwrap().as_deref(), Some("qwen:7b"));
    }

    #[test]
    fn test_file_store_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.json");

        let store = FileStore::open(&path).unwrap();
        store.set(KEY_API_URL, "http://x").unwrap();
        store.set(KEY_PROMPT, "翻译成中文").unwrap();
        drop(store);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get(KEY_API_URL).unwrap().as_deref(), Some("http://x"));
        assert_eq!(reopened.get(KEY_PROMPT).unwrap().as_deref(), Some("翻译成中文"));
        assert_eq!(reopened.get(KEY_API_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_store_failed_write_keeps_old_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        let store = FileStore::open(&path).unwrap();
        store.set(KEY_MODEL, "a:one").unwrap();

        // A directory where the file should be makes the rewrite fail.
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        assert!(matches!(store.set(KEY_MODEL, "b:two"), Err(StoreError::Io(_))));
        assert_eq!(store.get(KEY_MODEL).unwrap().as_deref(), Some("a:one"));
    }

    #[test]
    fn test_file_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(FileStore::open(&path), Err(StoreError::Parse(_))));
    }

    #[test]
    fn test_record_skips_absent_keys() {
        let store = MemoryStore::with_entries([(KEY_API_KEY, "k")]);
        let record = PreferenceRecord::load(&store);
        assert_eq!(record.api_key.as_deref(), Some("k"));
        assert!(record.api_url.is_none());
        assert!(record.model.is_none());
    }
}
