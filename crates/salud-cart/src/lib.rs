//! Client-side shopping cart for the Rude Salud storefront.
//!
//! - **Cart**: line items keyed by product id, a pure reducer over [`CartAction`]
//! - **Store**: [`CartStore`] hydrates from and persists to a key-value slot,
//!   and notifies subscribers after every action
//! - **Money**: the yen display-price convention (`"¥12,800"`)
//! - **Drawer**: view model for the header cart button and drawer
//!
//! # Example
//!
//! ```rust
//! use salud_cache::MemoryStore;
//! use salud_cart::prelude::*;
//!
//! let mut store = CartStore::new(MemoryStore::new());
//!
//! store.add_one(NewItem::new("tee-1", "Tee", "\u{00a5}12,800"));
//! store.add_item(NewItem::new("tee-1", "Tee", "\u{00a5}12,800"), 2);
//!
//! assert_eq!(store.total_qty(), 3);
//! assert_eq!(format_price(store.subtotal().amount()), "\u{00a5}38,400");
//! ```

pub mod cart;
pub mod config;
pub mod drawer;
pub mod error;
pub mod ids;
pub mod money;
pub mod store;

pub use cart::{Cart, CartAction, CartTotals, ItemImage, LineItem, LineTotal, NewItem};
pub use config::{CartConfig, DEFAULT_STORAGE_KEY};
pub use drawer::{CartDrawer, DrawerLine, DrawerState};
pub use error::CartError;
pub use ids::ItemId;
pub use money::{format_price, parse_price, Yen};
pub use store::{CartStore, SharedCartStore, SubscriptionId};

#[cfg(feature = "browser")]
pub use store::open_browser;
#[cfg(feature = "spin")]
pub use store::open_spin;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::cart::*;
    pub use crate::config::CartConfig;
    pub use crate::drawer::{CartDrawer, DrawerState};
    pub use crate::error::CartError;
    pub use crate::ids::ItemId;
    pub use crate::money::{format_price, parse_price, Yen};
    pub use crate::store::{CartStore, SharedCartStore};
}
