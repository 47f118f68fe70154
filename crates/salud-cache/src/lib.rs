//! Typed key-value storage slots for the Rude Salud storefront.
//!
//! Provides a small [`KeyValueStore`] trait with several backends and a
//! [`Cache`] wrapper that stores values as JSON.
//!
//! - [`MemoryStore`]: in-process, used natively and in tests
//! - `WebStorage`: the browser's `localStorage` (feature `browser`)
//! - `SpinStore`: a Spin component's key-value store (feature `spin`)
//!
//! # Example
//!
//! ```rust,ignore
//! use salud_cache::{Cache, MemoryStore};
//!
//! let cache = Cache::new(MemoryStore::new());
//!
//! // Store a value
//! cache.set("rudesalud_cart_v1", &items)?;
//!
//! // Retrieve a value
//! let items: Option<Vec<LineItem>> = cache.get("rudesalud_cart_v1")?;
//!
//! // Delete a value
//! cache.delete("rudesalud_cart_v1")?;
//! ```

mod error;
mod kv;

#[cfg(feature = "browser")]
mod browser;
#[cfg(feature = "spin")]
mod spin;

pub use error::CacheError;
pub use kv::{Cache, KeyValueStore, MemoryStore};

#[cfg(feature = "browser")]
pub use browser::WebStorage;
#[cfg(feature = "spin")]
pub use spin::SpinStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, KeyValueStore, MemoryStore};
}
