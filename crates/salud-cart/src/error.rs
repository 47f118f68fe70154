//! Cart error types.
//!
//! Cart mutations never return these: storage failures on the mutation path
//! are logged and dropped by [`CartStore`](crate::CartStore). They surface only
//! from configuration loading and the explicit `read_snapshot`/`flush` calls.

use salud_cache::CacheError;
use thiserror::Error;

/// Errors that can occur around the cart store.
#[derive(Error, Debug)]
pub enum CartError {
    /// Configuration could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The storage backend failed.
    #[error("Cache error: {0}")]
    Cache(String),

    /// A stored or outgoing value had the wrong shape.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<CacheError> for CartError {
    fn from(e: CacheError) -> Self {
        match e {
            CacheError::SerializeError(inner) => CartError::Serialization(inner.to_string()),
            other => CartError::Cache(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for CartError {
    fn from(e: serde_json::Error) -> Self {
        CartError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for CartError {
    fn from(e: toml::de::Error) -> Self {
        CartError::Config(e.to_string())
    }
}

impl From<toml::ser::Error> for CartError {
    fn from(e: toml::ser::Error) -> Self {
        CartError::Config(e.to_string())
    }
}
