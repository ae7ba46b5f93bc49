//! Key-value storage backends
//!
//! LocalStorage on the web, an in-memory map everywhere else. Callers go
//! through [`KeyValueStore`] so progress and settings code is identical on
//! both targets.

use std::collections::HashMap;
use std::fmt;

/// Why a storage operation failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// No storage available (private mode, disabled, no window)
    Unavailable,
    /// The backend refused the operation (quota, security error)
    Rejected(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Unavailable => write!(f, "storage unavailable"),
            StorageError::Rejected(reason) => write!(f, "storage rejected operation: {reason}"),
        }
    }
}

impl std::error::Error for StorageError {}

/// Minimal string key-value store
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory store (native builds and tests)
#[derive(Debug, Clone)]
pub struct MemoryStore {
    items: HashMap<String, String>,
    available: bool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            items: HashMap::new(),
            available: true,
        }
    }
}

impl MemoryStore {
    /// A store that fails every operation, like a browser with storage disabled
    pub fn unavailable() -> Self {
        Self {
            items: HashMap::new(),
            available: false,
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        if !self.available {
            return Err(StorageError::Unavailable);
        }
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if !self.available {
            return Err(StorageError::Unavailable);
        }
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct LocalStorage {
    storage: Option<web_sys::Storage>,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    pub fn open() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if storage.is_none() {
            log::warn!("LocalStorage unavailable, progress will not be saved");
        }
        Self { storage }
    }

    fn storage(&self) -> Result<&web_sys::Storage, StorageError> {
        self.storage.as_ref().ok_or(StorageError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage()?
            .get_item(key)
            .map_err(|e| StorageError::Rejected(format!("{e:?}")))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| StorageError::Rejected(format!("{e:?}")))
    }
}

/// Platform default store
#[cfg(target_arch = "wasm32")]
pub type DefaultStore = LocalStorage;
#[cfg(not(target_arch = "wasm32"))]
pub type DefaultStore = MemoryStore;

#[cfg(target_arch = "wasm32")]
pub fn default_store() -> DefaultStore {
    LocalStorage::open()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn default_store() -> DefaultStore {
    MemoryStore::default()
}
