// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Durable key-value storage.
//!
//! The session core persists through the [`Storage`] trait so it can run
//! against a directory on disk or an in-memory fake. Both implementations
//! are capacity-bounded the way browser local storage is: a write that
//! would not fit is rejected and the previous value stays in place.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised by a rejected write.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage quota exceeded writing {key}: {needed} bytes needed, {capacity} available")]
    QuotaExceeded {
        key: String,
        needed: usize,
        capacity: usize,
    },
    #[error("storage IO error: {0}")]
    Io(#[from] io::Error),
}

/// Synchronous string key-value store.
pub trait Storage {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory storage with a total byte budget over keys and values.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    capacity: Option<usize>,
}

impl MemoryStorage {
    /// Unbounded storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that rejects writes once keys plus values exceed `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity: Some(capacity),
        }
    }

    /// Bytes currently used by keys and values.
    pub fn used_bytes(&self) -> usize {
        self.entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(capacity) = self.capacity {
            let others: usize = self
                .entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = key.len() + value.len();
            if others + needed > capacity {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    capacity: capacity.saturating_sub(others),
                });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One file per key inside a directory, written atomically.
#[derive(Debug)]
pub struct FileStorage {
    root: PathBuf,
    capacity: usize,
}

impl FileStorage {
    /// `capacity` bounds the size of any single stored value.
    pub fn new(root: impl AsRef<Path>, capacity: usize) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            capacity,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn key_path(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.root.join(format!("{}.json", file_name))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.key_path(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Some(contents),
            Err(err) if err.kind() == ErrorKind::NotFound => None,
            Err(err) => {
                log::warn!("Failed to read {}: {}", path.display(), err);
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if value.len() > self.capacity {
            return Err(StorageError::QuotaExceeded {
                key: key.to_string(),
                needed: value.len(),
                capacity: self.capacity,
            });
        }
        let path = self.key_path(key);
        write_atomic(&path, value.as_bytes())?;
        Ok(())
    }
}

/// Write via a temporary sibling file and rename.
fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, data)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_memory_storage_rejects_over_capacity() {
        let mut storage = MemoryStorage::with_capacity(16);
        storage.set("key", "short").unwrap();

        let err = storage.set("key", "this value is far too long").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { .. }));
        assert_eq!(storage.get("key").as_deref(), Some("short"));
    }

    #[test]
    fn test_memory_storage_replacing_value_frees_its_space() {
        let mut storage = MemoryStorage::with_capacity(10);
        storage.set("k", "123456789").unwrap();
        storage.set("k", "987654321").unwrap();
        assert_eq!(storage.used_bytes(), 10);
    }

    #[test]
    fn test_file_storage_round_trip() {
        let tmp = tempdir().unwrap();
        let mut storage = FileStorage::new(tmp.path().join("data"), 1024);

        assert!(storage.get("sketchbook_projects").is_none());
        storage.set("sketchbook_projects", "[]").unwrap();
        assert_eq!(storage.get("sketchbook_projects").as_deref(), Some("[]"));
        assert!(tmp.path().join("data/sketchbook_projects.json").exists());
    }

    #[test]
    fn test_file_storage_quota_keeps_previous_value() {
        let tmp = tempdir().unwrap();
        let mut storage = FileStorage::new(tmp.path(), 4);
        storage.set("k", "1234").unwrap();

        assert!(storage.set("k", "12345").is_err());
        assert_eq!(storage.get("k").as_deref(), Some("1234"));
    }

    #[test]
    fn test_file_storage_sanitizes_keys() {
        let tmp = tempdir().unwrap();
        let mut storage = FileStorage::new(tmp.path(), 1024);
        storage.set("../escape", "x").unwrap();

        assert!(tmp.path().join("___escape.json").exists());
        assert_eq!(storage.get("../escape").as_deref(), Some("x"));
    }
}
