//! Spin Key-Value Store backend.

use crate::{CacheError, KeyValueStore};

use spin_sdk::key_value::Error as KvError;

fn open_error(e: KvError) -> CacheError {
    CacheError::OpenError(e.to_string())
}

fn store_error(e: KvError) -> CacheError {
    CacheError::StoreError(e.to_string())
}

/// Key-value store backed by a Spin component's key-value store.
pub struct SpinStore {
    store: spin_sdk::key_value::Store,
}

impl SpinStore {
    /// Open the default Key-Value store.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let store = SpinStore::open_default()?;
    /// ```
    pub fn open_default() -> Result<Self, CacheError> {
        let store = spin_sdk::key_value::Store::open_default().map_err(open_error)?;
        Ok(Self { store })
    }

    /// Open a named Key-Value store.
    pub fn open(name: &str) -> Result<Self, CacheError> {
        let store = spin_sdk::key_value::Store::open(name).map_err(open_error)?;
        Ok(Self { store })
    }
}

impl KeyValueStore for SpinStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        self.store.get(key).map_err(store_error)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        self.store.set(key, value).map_err(store_error)
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.store.delete(key).map_err(store_error)
    }

    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        self.store.exists(key).map_err(store_error)
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        self.store.get_keys().map_err(store_error)
    }
}
