//! The cart store: a [`Cart`] kept in sync with a persistent storage slot.
//!
//! The store is best-effort by contract. Hydration failures leave the cart
//! empty, persistence failures leave the in-memory cart authoritative, and
//! neither is ever returned to the caller. Each swallowed failure is logged
//! at warn level, which is the only trace it leaves.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use salud_cache::{Cache, KeyValueStore};
use salud_observability::StructuredLogger;

use crate::cart::{Cart, CartAction, CartTotals, LineItem, NewItem};
use crate::config::{CartConfig, DEFAULT_STORAGE_KEY};
use crate::error::CartError;
use crate::money::Yen;

/// Handle returned by [`CartStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(&Cart)>;

/// A store shared by every consumer on a page.
///
/// Built once at the application root with [`CartStore::into_shared`] and
/// cloned into whatever needs the cart.
pub type SharedCartStore<S> = Rc<RefCell<CartStore<S>>>;

/// Cart state plus its persistence adapter and subscribers.
pub struct CartStore<S> {
    cart: Cart,
    cache: Cache<S>,
    key: String,
    logger: StructuredLogger,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Create a store over `store` with the default key, hydrating from it.
    pub fn new(store: S) -> Self {
        Self::with_logger(store, DEFAULT_STORAGE_KEY, StructuredLogger::new("cart"))
    }

    /// Create a store using the key and logging from `config`.
    pub fn with_config(store: S, config: &CartConfig) -> Self {
        Self::with_logger(store, config.storage.key.clone(), config.logger())
    }

    /// Create a store with an explicit key and logger, hydrating from the
    /// slot.
    pub fn with_logger(store: S, key: impl Into<String>, logger: StructuredLogger) -> Self {
        let mut this = Self {
            cart: Cart::new(),
            cache: Cache::new(store),
            key: key.into(),
            logger,
            listeners: Vec::new(),
            next_subscription: 0,
        };
        this.hydrate();
        this
    }

    /// Wrap the store in a shared handle.
    pub fn into_shared(self) -> SharedCartStore<S> {
        Rc::new(RefCell::new(self))
    }

    fn hydrate(&mut self) {
        match self.read_snapshot() {
            Ok(Some(items)) => {
                self.cart = Cart::from_items(items);
                self.logger
                    .debug_builder("cart hydrated")
                    .field("key", self.key.as_str())
                    .field_u64("lines", self.cart.len() as u64)
                    .emit();
            }
            Ok(None) => {
                self.logger
                    .debug_builder("no saved cart")
                    .field("key", self.key.as_str())
                    .emit();
            }
            Err(e) => self.log_swallowed("hydrate", &e),
        }
    }

    /// Re-read the storage slot, picking up writes made by another store
    /// (another tab) on the same key.
    ///
    /// A missing key empties the cart. A failed or malformed read leaves the
    /// current cart untouched. Subscribers are notified when lines change.
    pub fn rehydrate(&mut self) -> bool {
        let items = match self.read_snapshot() {
            Ok(items) => items.unwrap_or_default(),
            Err(e) => {
                self.log_swallowed("rehydrate", &e);
                return false;
            }
        };

        let changed = self.cart.apply(CartAction::Replace(items));
        if changed {
            self.notify();
        }
        changed
    }

    /// Read the stored snapshot, surfacing every failure.
    ///
    /// `Ok(None)` means the key is absent. A payload that is not a JSON
    /// array of well-formed lines is a [`CartError::Serialization`].
    pub fn read_snapshot(&self) -> Result<Option<Vec<LineItem>>, CartError> {
        Ok(self.cache.get::<Vec<LineItem>>(&self.key)?)
    }

    /// Write the current lines to the slot, surfacing every failure.
    pub fn flush(&self) -> Result<(), CartError> {
        Ok(self.cache.set(&self.key, &self.cart)?)
    }

    fn persist(&self) {
        if let Err(e) = self.flush() {
            self.log_swallowed("persist", &e);
        }
    }

    fn log_swallowed(&self, stage: &str, error: &CartError) {
        self.logger
            .warn_builder("cart storage failure ignored")
            .field("stage", stage)
            .field("key", self.key.as_str())
            .field("error", error.to_string())
            .emit();
    }

    /// Apply an action, persist the result and notify subscribers.
    ///
    /// Every dispatched action is persisted, even one that left the lines
    /// unchanged.
    pub fn dispatch(&mut self, action: CartAction) {
        let name = action.name();
        let changed = self.cart.apply(action);

        self.logger
            .trace_builder("cart action")
            .field("action", name)
            .field_bool("changed", changed)
            .field_u64("total_qty", self.cart.total_qty())
            .emit();

        self.persist();
        self.notify();
    }

    /// Add `qty` of a product; see [`Cart::add_item`].
    pub fn add_item(&mut self, item: NewItem, qty: u32) {
        if qty == 0 {
            self.logger
                .debug_builder("ignored add with zero quantity")
                .field("id", item.id.as_str())
                .emit();
        }
        self.dispatch(CartAction::Add { item, qty });
    }

    /// Add one of a product.
    pub fn add_one(&mut self, item: NewItem) {
        self.add_item(item, 1);
    }

    /// Remove the line for `id`, if present.
    pub fn remove_item(&mut self, id: &str) {
        self.dispatch(CartAction::Remove { id: id.into() });
    }

    /// Set a line's quantity exactly; `qty <= 0` removes it.
    pub fn set_quantity(&mut self, id: &str, qty: i64) {
        self.dispatch(CartAction::SetQty { id: id.into(), qty });
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.dispatch(CartAction::Clear);
    }

    /// Register a listener called after every dispatched action.
    ///
    /// Listeners get the cart by reference and must not call back into the
    /// store (a shared store is still mutably borrowed while they run).
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&Cart) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let len_before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() < len_before
    }

    fn notify(&self) {
        for (_, listener) in &self.listeners {
            listener(&self.cart);
        }
    }

    /// The current cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[LineItem] {
        self.cart.items()
    }

    /// Get the line for `id`.
    pub fn get(&self, id: &str) -> Option<&LineItem> {
        self.cart.get(id)
    }

    /// Check if the cart has a line for `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.cart.contains(id)
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.cart.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// Sum of quantities.
    pub fn total_qty(&self) -> u64 {
        self.cart.total_qty()
    }

    /// Sum of parsed price times quantity.
    pub fn subtotal(&self) -> Yen {
        self.cart.subtotal()
    }

    /// Every derived total.
    pub fn totals(&self) -> CartTotals {
        self.cart.totals()
    }

    /// The storage key in use.
    pub fn storage_key(&self) -> &str {
        &self.key
    }

    /// Borrow the underlying storage backend.
    pub fn backend(&self) -> &S {
        self.cache.store()
    }
}

impl<S> fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &self.key)
            .field("cart", &self.cart)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Open a store over the browser's `localStorage`.
///
/// When `localStorage` is unavailable the store still works in memory; every
/// read and write fails and is ignored.
#[cfg(feature = "browser")]
pub fn open_browser(config: &CartConfig) -> CartStore<Option<salud_cache::WebStorage>> {
    let logger = config.logger();
    let storage = match salud_cache::WebStorage::local() {
        Ok(storage) => Some(storage),
        Err(e) => {
            logger
                .warn_builder("localStorage unavailable, cart will not persist")
                .field("error", e.to_string())
                .emit();
            None
        }
    };
    CartStore::with_logger(storage, config.storage.key.clone(), logger)
}

/// Open a store over a Spin key-value store named by `storage.store`.
#[cfg(feature = "spin")]
pub fn open_spin(config: &CartConfig) -> CartStore<Option<salud_cache::SpinStore>> {
    let logger = config.logger();
    let opened = if config.storage.store == "default" {
        salud_cache::SpinStore::open_default()
    } else {
        salud_cache::SpinStore::open(&config.storage.store)
    };
    let storage = match opened {
        Ok(storage) => Some(storage),
        Err(e) => {
            logger
                .warn_builder("key-value store unavailable, cart will not persist")
                .field("store", config.storage.store.as_str())
                .field("error", e.to_string())
                .emit();
            None
        }
    };
    CartStore::with_logger(storage, config.storage.key.clone(), logger)
}
