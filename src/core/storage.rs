//! Key/value persistence for editor state
//!
//! `Storage` is the raw backend (strings in, strings out, may fail).
//! `Persistence` layers JSON on top and never lets a failure escape.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Keys used by the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    ResumeData,
    /// Reserved
    Theme,
    /// Reserved
    PersonalInfo,
}

impl StorageKey {
    pub const ALL: [StorageKey; 3] = [
        StorageKey::ResumeData,
        StorageKey::Theme,
        StorageKey::PersonalInfo,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StorageKey::ResumeData => "resumeData",
            StorageKey::Theme => "resumeTheme",
            StorageKey::PersonalInfo => "resumePersonalInfo",
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage quota exceeded")]
    QuotaExceeded,
}

/// Raw string key/value backend
pub trait Storage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: Storage + ?Sized> Storage for Box<T> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }
}

/// One `<key>.json` file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Storage under the platform data directory
    pub fn default_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "resume-editor", "ResumeEditor")
            .map(|dirs| dirs.data_dir().join("storage"))
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        // Write-then-rename so a crash mid-write keeps the previous value.
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory backend with write accounting
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
    writes: Mutex<usize>,
    fail_writes: Mutex<bool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set_item` fail with a quota error
    #[allow(dead_code)]
    pub fn fail_writes(&self, fail: bool) {
        *lock(&self.fail_writes) = fail;
    }

    /// Number of successful writes so far
    #[allow(dead_code)]
    pub fn write_count(&self) -> usize {
        *lock(&self.writes)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(lock(&self.items).get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if *lock(&self.fail_writes) {
            return Err(StorageError::QuotaExceeded);
        }
        lock(&self.items).insert(key.to_string(), value.to_string());
        *lock(&self.writes) += 1;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        lock(&self.items).remove(key);
        Ok(())
    }
}

/// JSON persistence that logs and swallows every failure
#[derive(Debug)]
pub struct Persistence<S: Storage> {
    storage: S,
}

impl<S: Storage> Persistence<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Serialize and store `value`; returns whether the write happened
    pub fn save<T: Serialize>(&self, key: StorageKey, value: &T) -> bool {
        let result = serde_json::to_string(value)
            .map_err(StorageError::from)
            .and_then(|json| self.storage.set_item(key.as_str(), &json));
        match result {
            Ok(()) => {
                tracing::debug!("Saved {}", key.as_str());
                true
            }
            Err(e) => {
                tracing::error!("Failed to save {}: {}", key.as_str(), e);
                false
            }
        }
    }

    /// Load and deserialize `key`, or return `fallback` when absent or unreadable
    pub fn load<T: DeserializeOwned>(&self, key: StorageKey, fallback: T) -> T {
        let raw = match self.storage.get_item(key.as_str()) {
            Ok(Some(raw)) => raw,
            Ok(None) => return fallback,
            Err(e) => {
                tracing::error!("Failed to load {}: {}", key.as_str(), e);
                return fallback;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to parse {}: {}", key.as_str(), e);
                fallback
            }
        }
    }

    pub fn remove(&self, key: StorageKey) {
        if let Err(e) = self.storage.remove_item(key.as_str()) {
            tracing::error!("Failed to remove {}: {}", key.as_str(), e);
        }
    }

    /// Remove every key the editor uses
    pub fn clear(&self) {
        for key in StorageKey::ALL {
            self.remove(key);
        }
        tracing::info!("Cleared saved resume data");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::document::ResumeDocument;

    #[test]
    fn test_save_and_load() {
        let persistence = Persistence::new(MemoryStorage::new());
        let mut doc = ResumeDocument::default();
        doc.personal_info.name = "Jane".into();

        assert!(persistence.save(StorageKey::ResumeData, &doc));
        let loaded = persistence.load(StorageKey::ResumeData, ResumeDocument::default());
        assert_eq!(loaded, doc);
    }

    #[test]
    fn test_load_missing_returns_fallback() {
        let persistence = Persistence::new(MemoryStorage::new());
        let loaded: Vec<u32> = persistence.load(StorageKey::Theme, vec![7]);
        assert_eq!(loaded, vec![7]);
    }

    #[test]
    fn test_load_malformed_returns_fallback() {
        let storage = MemoryStorage::new();
        storage.set_item("resumeData", "{not json").unwrap();
        let persistence = Persistence::new(storage);
        let loaded = persistence.load(StorageKey::ResumeData, ResumeDocument::default());
        assert_eq!(loaded, ResumeDocument::default());
    }

    #[test]
    fn test_load_document_with_nulls_keeps_sections() {
        let persistence = Persistence::new(MemoryStorage::new());
        persistence
            .storage()
            .set_item(
                "resumeData",
                r#"{"personalInfo":null,"theme":null,
                    "sections":[{"id":"a","type":"about","data":{"description":"hi"}}]}"#,
            )
            .unwrap();

        let doc = persistence.load(StorageKey::ResumeData, ResumeDocument::default());
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].id, "a");
        assert_eq!(doc.completeness(), 50);
    }

    #[test]
    fn test_save_failure_is_swallowed() {
        let storage = MemoryStorage::new();
        storage.fail_writes(true);
        let persistence = Persistence::new(storage);

        assert!(!persistence.save(StorageKey::ResumeData, &ResumeDocument::default()));
        assert_eq!(persistence.storage().write_count(), 0);
    }

    #[test]
    fn test_clear_removes_all_keys() {
        let persistence = Persistence::new(MemoryStorage::new());
        for key in StorageKey::ALL {
            persistence.save(key, &1);
        }
        persistence.clear();
        for key in StorageKey::ALL {
            assert_eq!(persistence.load(key, 0), 0);
        }
    }

    #[test]
    fn test_file_storage_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested"));

        assert_eq!(storage.get_item("resumeData").unwrap(), None);
        storage.set_item("resumeData", "{\"a\":1}").unwrap();
        assert_eq!(storage.get_item("resumeData").unwrap().as_deref(), Some("{\"a\":1}"));
        assert!(dir.path().join("nested/resumeData.json").exists());

        storage.remove_item("resumeData").unwrap();
        storage.remove_item("resumeData").unwrap();
        assert_eq!(storage.get_item("resumeData").unwrap(), None);
    }

    #[test]
    fn test_file_storage_failure_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").unwrap();
        // A regular file where the storage directory should be.
        let persistence = Persistence::new(FileStorage::new(&blocker));
        assert!(!persistence.save(StorageKey::ResumeData, &ResumeDocument::default()));
    }
}
