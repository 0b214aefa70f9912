use std::fmt;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use super::{
    BOOKS_KEY, FONT_SIZE_KEY, FileStore, KeyValueStore, LAST_BOOK_KEY, MemoryStore, StoreError,
    THEME_KEY,
};
use crate::settings::{FontSize, Theme};

/// A saved book and where the reader left off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    pub name: String,
    /// Decoded source, stored raw
    pub content: String,
    /// Scroll offset in display lines
    #[serde(default)]
    pub last_position: usize,
    /// First load, milliseconds since the epoch
    #[serde(default)]
    pub timestamp: u64,
    /// Last progress save, milliseconds since the epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_read: Option<u64>,
}

impl BookRecord {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            last_position: 0,
            timestamp: now_millis(),
            last_read: None,
        }
    }
}

/// Milliseconds since the Unix epoch, or 0 if the clock is before it.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
        })
}

/// Saved books and display preferences on top of a [`KeyValueStore`].
///
/// Read failures never surface: a value that cannot be decoded is logged
/// and treated as absent.
pub struct Library {
    store: Box<dyn KeyValueStore>,
}

impl Library {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    /// Open the file-backed library at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        Ok(Self::new(Box::new(FileStore::open(path)?)))
    }

    /// All saved books, in insertion order.
    pub fn saved_books(&self) -> Vec<BookRecord> {
        let Some(raw) = self.store.get(BOOKS_KEY) else {
            return Vec::new();
        };
        serde_json::from_str(&raw).unwrap_or_else(|err| {
            tracing::warn!(%err, "saved book list is unreadable; ignoring it");
            Vec::new()
        })
    }

    pub fn find_book(&self, name: &str) -> Option<BookRecord> {
        self.saved_books().into_iter().find(|book| book.name == name)
    }

    /// Insert `record`, replacing any record with the same name.
    pub fn save_book(&mut self, record: &BookRecord) -> Result<(), StoreError> {
        let mut books = self.saved_books();
        match books.iter_mut().find(|book| book.name == record.name) {
            Some(existing) => existing.clone_from(record),
            None => books.push(record.clone()),
        }
        self.write_books(&books)?;
        tracing::debug!(name = %record.name, position = record.last_position, "saved book");
        Ok(())
    }

    /// Remove the record named `name`; returns whether one existed.
    ///
    /// The last-opened pointer is cleared when it names the deleted book.
    pub fn delete_book(&mut self, name: &str) -> Result<bool, StoreError> {
        let mut books = self.saved_books();
        let before = books.len();
        books.retain(|book| book.name != name);
        let removed = books.len() != before;
        if removed {
            self.write_books(&books)?;
        }
        if self.last_book().as_deref() == Some(name) {
            self.clear_last_book()?;
        }
        tracing::debug!(name, removed, "deleted book");
        Ok(removed)
    }

    fn write_books(&mut self, books: &[BookRecord]) -> Result<(), StoreError> {
        let json = serde_json::to_string(books)?;
        self.store.set(BOOKS_KEY, json)
    }

    pub fn last_book(&self) -> Option<String> {
        self.store.get(LAST_BOOK_KEY).filter(|name| !name.is_empty())
    }

    pub fn set_last_book(&mut self, name: &str) -> Result<(), StoreError> {
        self.store.set(LAST_BOOK_KEY, name.to_string())
    }

    pub fn clear_last_book(&mut self) -> Result<(), StoreError> {
        self.store.remove(LAST_BOOK_KEY)
    }

    pub fn theme(&self) -> Option<Theme> {
        self.preference(THEME_KEY)
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<(), StoreError> {
        self.store.set(THEME_KEY, theme.to_string())
    }

    pub fn font_size(&self) -> Option<FontSize> {
        self.preference(FONT_SIZE_KEY)
    }

    pub fn set_font_size(&mut self, size: FontSize) -> Result<(), StoreError> {
        self.store.set(FONT_SIZE_KEY, size.to_string())
    }

    fn preference<T: std::str::FromStr<Err = String>>(&self, key: &str) -> Option<T> {
        let raw = self.store.get(key)?;
        raw.parse()
            .map_err(|err| tracing::warn!(key, %err, "ignoring stored preference"))
            .ok()
    }
}

impl Default for Library {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl fmt::Debug for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Library")
            .field("store", &self.store)
            .finish()
    }
}
