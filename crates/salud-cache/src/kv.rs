//! Key-Value store abstraction with automatic serialization.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::CacheError;
use serde::{de::DeserializeOwned, Serialize};

/// A byte-oriented key-value store.
///
/// Implemented by every storage backend (in-memory, browser `localStorage`,
/// Spin key-value). Methods take `&self`; backends that mutate in-process
/// state use interior mutability.
pub trait KeyValueStore {
    /// Read the raw value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError>;

    /// Remove `key`. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Check if a key exists.
    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.get(key)?.is_some())
    }

    /// List all keys.
    fn keys(&self) -> Result<Vec<String>, CacheError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Rc<T> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        (**self).delete(key)
    }

    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        (**self).exists(key)
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        (**self).keys()
    }
}

/// `None` stands for a backend that could not be opened: every operation
/// fails with [`CacheError::Unavailable`].
impl<T: KeyValueStore> KeyValueStore for Option<T> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        match self {
            Some(store) => store.get(key),
            None => Err(unavailable()),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        match self {
            Some(store) => store.set(key, value),
            None => Err(unavailable()),
        }
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        match self {
            Some(store) => store.delete(key),
            None => Err(unavailable()),
        }
    }

    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        match self {
            Some(store) => store.exists(key),
            None => Err(unavailable()),
        }
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        match self {
            Some(store) => store.keys(),
            None => Err(unavailable()),
        }
    }
}

fn unavailable() -> CacheError {
    CacheError::Unavailable("store was not opened".to_string())
}

/// In-process store for native builds and tests.
///
/// Clones share the same entries, so two handles behave like two tabs
/// looking at the same browser profile.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<BTreeMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Check if the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Read a value as UTF-8 text.
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.entries
            .borrow()
            .get(key)
            .and_then(|bytes| String::from_utf8(bytes.clone()).ok())
    }

    /// Write a UTF-8 value directly, bypassing serialization.
    pub fn set_string(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.as_bytes().to_vec());
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.entries.borrow().contains_key(key))
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        Ok(self.entries.borrow().keys().cloned().collect())
    }
}

/// Type-safe cache over any [`KeyValueStore`].
///
/// Provides automatic JSON serialization for any type that implements
/// `Serialize` and `DeserializeOwned`.
#[derive(Debug, Clone)]
pub struct Cache<S> {
    store: S,
}

impl<S: KeyValueStore> Cache<S> {
    /// Wrap a store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let items: Option<Vec<LineItem>> = cache.get("rudesalud_cart_v1")?;
    /// ```
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.store.get(key)? {
            Some(bytes) => {
                let value: T = serde_json::from_slice(&bytes)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Set a value in the cache.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// cache.set("rudesalud_cart_v1", &items)?;
    /// ```
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(value)?;
        self.store.set(key, &bytes)
    }

    /// Delete a value from the cache.
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.store.delete(key)
    }

    /// Check if a key exists in the cache.
    pub fn exists(&self, key: &str) -> Result<bool, CacheError> {
        self.store.exists(key)
    }

    /// Get all keys in the cache.
    pub fn keys(&self) -> Result<Vec<String>, CacheError> {
        self.store.keys()
    }

    /// Borrow the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Entry {
        id: String,
        qty: u32,
    }

    #[test]
    fn test_memory_store_set_get() {
        let store = MemoryStore::new();
        store.set("k", b"v").unwrap();
        assert_eq!(store.get("k").unwrap(), Some(b"v".to_vec()));
        assert_eq!(store.get("missing").unwrap(), None);
    }

    #[test]
    fn test_memory_store_delete_missing_is_ok() {
        let store = MemoryStore::new();
        assert!(store.delete("nothing").is_ok());
    }

    #[test]
    fn test_memory_store_clones_share_entries() {
        let a = MemoryStore::new();
        let b = a.clone();
        a.set_string("cart", "[]");
        assert_eq!(b.get_string("cart").as_deref(), Some("[]"));
        assert!(b.exists("cart").unwrap());
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn test_memory_store_keys_sorted() {
        let store = MemoryStore::new();
        store.set("b", b"2").unwrap();
        store.set("a", b"1").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_cache_json_value() {
        let cache = Cache::new(MemoryStore::new());
        let entries = vec![Entry {
            id: "tee-1".to_string(),
            qty: 2,
        }];
        cache.set("cart", &entries).unwrap();

        assert_eq!(
            cache.store().get_string("cart").as_deref(),
            Some(r#"[{"id":"tee-1","qty":2}]"#)
        );
        let loaded: Option<Vec<Entry>> = cache.get("cart").unwrap();
        assert_eq!(loaded, Some(entries));
    }

    #[test]
    fn test_cache_malformed_value_is_serialize_error() {
        let store = MemoryStore::new();
        store.set_string("cart", "{not json");
        let cache = Cache::new(store);
        let result: Result<Option<Vec<Entry>>, _> = cache.get("cart");
        assert!(matches!(result, Err(CacheError::SerializeError(_))));
    }

    #[test]
    fn test_unopened_store_is_unavailable() {
        let store: Option<MemoryStore> = None;
        assert!(matches!(store.get("k"), Err(CacheError::Unavailable(_))));
        assert!(matches!(store.set("k", b"v"), Err(CacheError::Unavailable(_))));

        let opened = Some(MemoryStore::new());
        opened.set("k", b"v").unwrap();
        assert!(opened.exists("k").unwrap());
    }

    #[test]
    fn test_cache_over_rc_store() {
        let store = Rc::new(MemoryStore::new());
        let cache = Cache::new(Rc::clone(&store));
        cache.set("n", &7u32).unwrap();
        assert!(cache.exists("n").unwrap());
        cache.delete("n").unwrap();
        assert!(!store.exists("n").unwrap());
    }
}
