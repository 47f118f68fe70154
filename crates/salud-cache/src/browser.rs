//! Browser `localStorage` backend.

use crate::{CacheError, KeyValueStore};

/// Key-value store backed by the page's `window.localStorage`.
///
/// `localStorage` only holds strings, so values must be UTF-8 (JSON always is).
pub struct WebStorage {
    storage: web_sys::Storage,
}

impl WebStorage {
    /// Open the origin's `localStorage`.
    ///
    /// Fails with [`CacheError::Unavailable`] outside a window context or when
    /// the browser has storage disabled.
    pub fn local() -> Result<Self, CacheError> {
        let window =
            web_sys::window().ok_or_else(|| CacheError::Unavailable("no window".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(|e| CacheError::OpenError(format!("{:?}", e)))?
            .ok_or_else(|| CacheError::Unavailable("localStorage disabled".to_string()))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for WebStorage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        self.storage
            .get_item(key)
            .map(|value| value.map(String::into_bytes))
            .map_err(|e| CacheError::StoreError(format!("{:?}", e)))
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        let text = std::str::from_utf8(value)
            .map_err(|e| CacheError::StoreError(format!("value is not UTF-8: {}", e)))?;
        // Throws QuotaExceededError when the origin is full.
        self.storage
            .set_item(key, text)
            .map_err(|e| CacheError::StoreError(format!("{:?}", e)))
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.storage
            .remove_item(key)
            .map_err(|e| CacheError::StoreError(format!("{:?}", e)))
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        let len = self
            .storage
            .length()
            .map_err(|e| CacheError::StoreError(format!("{:?}", e)))?;
        let mut keys = Vec::with_capacity(len as usize);
        for i in 0..len {
            if let Ok(Some(key)) = self.storage.key(i) {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}
