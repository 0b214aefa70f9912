//! Key-value preference store.
//!
//! Preferences and saved books live in a flat string-to-string map. The
//! file backend keeps the map as a JSON object and replaces the file on
//! every change; access is synchronous and the last write wins.

mod library;

pub use library::{BookRecord, Library, now_millis};

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub const LAST_BOOK_KEY: &str = "bookreader_lastbook";
pub const THEME_KEY: &str = "bookreader-theme";
pub const FONT_SIZE_KEY: &str = "bookreader-fontsize";
pub const BOOKS_KEY: &str = "bookreader_books";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("store encoding: {0}")]
    Json(#[from] serde_json::Error),
}

/// String-keyed persistent storage.
pub trait KeyValueStore: fmt::Debug {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// A store that lives only as long as the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// A store backed by a JSON object file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`.
    ///
    /// A missing file is an empty store. A file that cannot be decoded is
    /// moved aside to `<name>.bak` and the store starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => match serde_json::from_str(&content) {
                Ok(entries) => entries,
                Err(err) => {
                    let backup = sibling_path(&path, ".bak");
                    fs::rename(&path, &backup).map_err(|source| StoreError::Io {
                        path: backup.clone(),
                        source,
                    })?;
                    tracing::warn!(
                        path = %path.display(),
                        backup = %backup.display(),
                        %err,
                        "store file is corrupt; moved aside and starting empty"
                    );
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        tracing::debug!(path = %path.display(), keys = entries.len(), "opened store");
        Ok(Self { path, entries })
    }

    /// Write the map to a sibling temp file, then move it over the store so
    /// an interrupted write never leaves a partial file behind.
    fn flush(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        let temp_path = sibling_path(&self.path, ".tmp");
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source: std::io::Error| StoreError::Io { path, source }
        };
        fs::write(&temp_path, json).map_err(io_err(&temp_path))?;
        if fs::rename(&temp_path, &self.path).is_err() {
            fs::copy(&temp_path, &self.path).map_err(io_err(&self.path))?;
            let _ = fs::remove_file(&temp_path);
        }
        Ok(())
    }
}

/// `path` with `suffix` appended to its file name.
fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(|| OsString::from("store"), ToOwned::to_owned);
    name.push(suffix);
    path.with_file_name(name)
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_store_persists_across_opens() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");
        let mut store = FileStore::open(&path).unwrap();
        store.set(THEME_KEY, "dark".to_string()).unwrap();
        store.set(FONT_SIZE_KEY, "1.2".to_string()).unwrap();
        store.remove(FONT_SIZE_KEY).unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get(THEME_KEY).as_deref(), Some("dark"));
        assert_eq!(reopened.get(FONT_SIZE_KEY), None);
    }

    #[test]
    fn test_corrupt_store_file_opens_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{not json").unwrap();
        let mut store = FileStore::open(&path).unwrap();
        assert_eq!(store.get(THEME_KEY), None);
        assert!(dir.path().join("store.json.bak").exists());
        store.set(THEME_KEY, "sepia".to_string()).unwrap();
        assert_eq!(
            FileStore::open(&path).unwrap().get(THEME_KEY).as_deref(),
            Some("sepia")
        );
    }

    #[test]
    fn test_truncated_store_is_backed_up_before_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        let mut store = FileStore::open(&path).unwrap();
        store.set(BOOKS_KEY, r#"[{"name":"novel","content":"<p>x</p>"}]"#.to_string()).unwrap();

        let full = fs::read(&path).unwrap();
        fs::write(&path, &full[..full.len() / 2]).unwrap();

        let mut store = FileStore::open(&path).unwrap();
        assert_eq!(store.get(BOOKS_KEY), None);
        store.set(THEME_KEY, "dark".to_string()).unwrap();

        let backup = fs::read(dir.path().join("store.json.bak")).unwrap();
        assert_eq!(backup, &full[..full.len() / 2]);
        assert!(String::from_utf8_lossy(&backup).contains("novel"));
        assert_eq!(
            FileStore::open(&path).unwrap().get(THEME_KEY).as_deref(),
            Some("dark")
        );
    }

    #[test]
    fn test_flush_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        let mut store = FileStore::open(&path).unwrap();
        store.set(THEME_KEY, "light".to_string()).unwrap();
        store.set(THEME_KEY, "sepia".to_string()).unwrap();
        assert!(!dir.path().join("store.json.tmp").exists());
        assert_eq!(sibling_path(&path, ".bak"), dir.path().join("store.json.bak"));
    }

    #[test]
    fn test_memory_store_get_set_remove() {
        let mut store = MemoryStore::new();
        store.set("k", "v".to_string()).unwrap();
        assert_eq!(store.get("k").as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert_eq!(store.get("k"), None);
    }
}
