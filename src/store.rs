//! Key-value persistence boundary over the host's local store.
//!
//! The engine persists three independent collections (projects, library
//! assets, folder names) as JSON strings under fixed keys, rewritten
//! wholesale on every mutation. [`BrowserStore`] maps onto `localStorage`;
//! [`MemoryStore`] backs native runs and tests. A failed write surfaces
//! [`StoreError`] and leaves all in-memory state untouched, so the operator
//! can shrink the content and retry.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::HashMap;

/// Error surfaced by the persistence boundary.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing store refused the write, typically because its quota is
    /// exhausted.
    #[error("the local store refused the write: {0}")]
    Capacity(String),
    /// No backing store is available in this environment.
    #[error("no local store is available")]
    Unavailable,
    /// A stored payload could not be serialized or parsed.
    #[error("stored data could not be read or written: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// A process-wide string key-value store.
pub trait KvStore {
    /// Read a value. Missing keys yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// [`StoreError::Unavailable`] when the backing store cannot be reached.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value wholesale, replacing any previous one.
    ///
    /// # Errors
    ///
    /// [`StoreError::Capacity`] when the backing store refuses the write;
    /// [`StoreError::Unavailable`] when it cannot be reached.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory store used natively and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Store backed by the browser's `localStorage`. Requires a browser
/// environment; every call resolves the storage object fresh.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStore;

impl BrowserStore {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn storage() -> Result<web_sys::Storage, StoreError> {
        let Some(window) = web_sys::window() else {
            return Err(StoreError::Unavailable);
        };
        match window.local_storage() {
            Ok(Some(storage)) => Ok(storage),
            _ => Err(StoreError::Unavailable),
        }
    }
}

impl KvStore for BrowserStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let storage = Self::storage()?;
        match storage.get_item(key) {
            Ok(value) => Ok(value),
            Err(_) => Err(StoreError::Unavailable),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let storage = Self::storage()?;
        storage
            .set_item(key, value)
            .map_err(|e| StoreError::Capacity(format!("{e:?}")))
    }
}
