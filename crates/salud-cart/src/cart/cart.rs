//! Cart and line item types.
//!
//! [`Cart`] is the pure state-transition half of the cart: every mutation is
//! a [`CartAction`] applied in memory, with no storage involved. Persistence
//! lives in [`CartStore`](crate::CartStore).

use crate::cart::{CartTotals, LineTotal};
use crate::ids::ItemId;
use crate::money::Yen;
use serde::{Deserialize, Serialize};

/// Product image attached to a line, for display only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemImage {
    /// Image URL.
    pub src: String,
    /// Alt text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

impl ItemImage {
    /// Create an image reference without alt text.
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: None,
        }
    }

    /// Set the alt text.
    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = Some(alt.into());
        self
    }
}

/// A product as handed to the cart: a line item without a quantity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewItem {
    /// Product identifier.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Display price, e.g. "¥12,800".
    pub price: String,
    /// Optional product image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ItemImage>,
}

impl NewItem {
    /// Describe a product.
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price: price.into(),
            image: None,
        }
    }

    /// Attach an image.
    pub fn with_image(mut self, image: ItemImage) -> Self {
        self.image = Some(image);
        self
    }
}

/// A line item in the cart.
///
/// This is also the persisted record: the storage slot holds a JSON array of
/// these.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineItem {
    /// Product identifier, unique within a cart.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Display price.
    pub price: String,
    /// Optional product image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ItemImage>,
    /// Quantity. Never zero while the line is in a cart.
    pub qty: u32,
}

impl LineItem {
    /// Create a line from a product and a quantity.
    pub fn new(item: NewItem, qty: u32) -> Self {
        Self {
            id: item.id,
            name: item.name,
            price: item.price,
            image: item.image,
            qty,
        }
    }

    /// Parsed unit price.
    pub fn unit_price(&self) -> Yen {
        Yen::parse(&self.price)
    }

    /// Unit price times quantity.
    pub fn line_total(&self) -> Yen {
        self.unit_price().times(self.qty)
    }
}

/// A state transition of the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    /// Add `qty` of a product, merging into an existing line.
    Add { item: NewItem, qty: u32 },
    /// Remove a line.
    Remove { id: ItemId },
    /// Set a line's quantity exactly; `qty <= 0` removes it.
    SetQty { id: ItemId, qty: i64 },
    /// Remove every line.
    Clear,
    /// Replace every line (used when re-reading storage).
    Replace(Vec<LineItem>),
}

impl CartAction {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            CartAction::Add { .. } => "add",
            CartAction::Remove { .. } => "remove",
            CartAction::SetQty { .. } => "set_qty",
            CartAction::Clear => "clear",
            CartAction::Replace(_) => "replace",
        }
    }
}

/// A shopping cart: ordered lines, at most one per product id.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from stored lines.
    ///
    /// Lines with a zero quantity are dropped. Lines repeating an earlier id
    /// are merged into the first one (quantities summed, first line's fields
    /// kept), so the result always satisfies the one-line-per-id rule.
    pub fn from_items(items: Vec<LineItem>) -> Self {
        let mut cart = Self::new();
        for line in items {
            if line.qty == 0 {
                continue;
            }
            match cart.items.iter_mut().find(|i| i.id == line.id) {
                Some(existing) => existing.qty = existing.qty.saturating_add(line.qty),
                None => cart.items.push(line),
            }
        }
        cart
    }

    /// Apply an action. Returns whether the lines changed.
    pub fn apply(&mut self, action: CartAction) -> bool {
        match action {
            CartAction::Add { item, qty } => self.add_item(item, qty),
            CartAction::Remove { id } => self.remove_item(id.as_str()),
            CartAction::SetQty { id, qty } => self.set_quantity(id.as_str(), qty),
            CartAction::Clear => self.clear(),
            CartAction::Replace(items) => {
                let next = Self::from_items(items);
                let changed = next != *self;
                *self = next;
                changed
            }
        }
    }

    /// Add `qty` of a product.
    ///
    /// If the product is already in the cart only its quantity grows; the
    /// existing name, price and image are kept. A zero quantity does nothing.
    pub fn add_item(&mut self, item: NewItem, qty: u32) -> bool {
        if qty == 0 {
            return false;
        }

        if let Some(existing) = self.items.iter_mut().find(|i| i.id == item.id) {
            existing.qty = existing.qty.saturating_add(qty);
            return true;
        }

        self.items.push(LineItem::new(item, qty));
        true
    }

    /// Remove the line for `id`, if present.
    pub fn remove_item(&mut self, id: &str) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| i.id.as_str() != id);
        self.items.len() < len_before
    }

    /// Set the quantity of the line for `id`.
    ///
    /// If quantity is <= 0, removes the line. Quantities above `u32::MAX`
    /// are clamped.
    pub fn set_quantity(&mut self, id: &str, qty: i64) -> bool {
        if qty <= 0 {
            return self.remove_item(id);
        }

        let qty = u32::try_from(qty).unwrap_or(u32::MAX);
        match self.items.iter_mut().find(|i| i.id.as_str() == id) {
            Some(item) if item.qty != qty => {
                item.qty = qty;
                true
            }
            _ => false,
        }
    }

    /// Remove every line.
    pub fn clear(&mut self) -> bool {
        let changed = !self.items.is_empty();
        self.items.clear();
        changed
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Consume the cart, returning its lines.
    pub fn into_items(self) -> Vec<LineItem> {
        self.items
    }

    /// Get the line for `id`.
    pub fn get(&self, id: &str) -> Option<&LineItem> {
        self.items.iter().find(|i| i.id.as_str() == id)
    }

    /// Check if the cart has a line for `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of quantities.
    pub fn total_qty(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.qty)).sum()
    }

    /// Sum of parsed price times quantity.
    pub fn subtotal(&self) -> Yen {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Compute every derived total in one pass.
    pub fn totals(&self) -> CartTotals {
        let lines: Vec<LineTotal> = self
            .items
            .iter()
            .map(|item| LineTotal {
                id: item.id.clone(),
                unit_price: item.unit_price(),
                qty: item.qty,
                total: item.line_total(),
            })
            .collect();

        CartTotals {
            total_qty: lines.iter().map(|l| u64::from(l.qty)).sum(),
            subtotal: lines.iter().map(|l| l.total).sum(),
            lines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tee() -> NewItem {
        NewItem::new("tee-1", "Tee", "\u{00a5}12,800")
    }

    fn hoodie() -> NewItem {
        NewItem::new("hoodie-1", "Hoodie", "\u{00a5}19,800")
            .with_image(ItemImage::new("/img/hoodie.jpg").with_alt("Black hoodie"))
    }

    #[test]
    fn test_cart_creation() {
        let cart = Cart::new();
        assert!(cart.is_empty());
        assert_eq!(cart.total_qty(), 0);
        assert_eq!(cart.subtotal(), Yen::zero());
    }

    #[test]
    fn test_add_item() {
        let mut cart = Cart::new();
        assert!(cart.add_item(tee(), 1));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total_qty(), 1);
        assert_eq!(cart.subtotal().amount(), 12800);
    }

    #[test]
    fn test_add_same_item_increases_quantity() {
        let mut cart = Cart::new();
        cart.add_item(tee(), 1);
        cart.add_item(tee(), 2);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get("tee-1").unwrap().qty, 3);
        assert_eq!(cart.subtotal().amount(), 38400);
    }

    #[test]
    fn test_add_existing_keeps_original_fields() {
        let mut cart = Cart::new();
        cart.add_item(hoodie(), 1);

        let renamed = NewItem::new("hoodie-1", "Renamed", "\u{00a5}1");
        cart.add_item(renamed, 1);

        let line = cart.get("hoodie-1").unwrap();
        assert_eq!(line.name, "Hoodie");
        assert_eq!(line.price, "\u{00a5}19,800");
        assert_eq!(line.image.as_ref().unwrap().src, "/img/hoodie.jpg");
        assert_eq!(line.qty, 2);
    }

    #[test]
    fn test_add_zero_quantity_is_noop() {
        let mut cart = Cart::new();
        assert!(!cart.add_item(tee(), 0));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut cart = Cart::new();
        cart.add_item(tee(), 1);
        cart.add_item(hoodie(), 1);
        cart.add_item(tee(), 1);

        let ids: Vec<&str> = cart.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["tee-1", "hoodie-1"]);
    }

    #[test]
    fn test_remove_item() {
        let mut cart = Cart::new();
        cart.add_item(tee(), 1);

        assert!(cart.remove_item("tee-1"));
        assert!(cart.is_empty());
        assert!(!cart.remove_item("tee-1"));
    }

    #[test]
    fn test_set_quantity_is_exact() {
        let mut cart = Cart::new();
        cart.add_item(tee(), 4);

        assert!(cart.set_quantity("tee-1", 2));
        assert_eq!(cart.get("tee-1").unwrap().qty, 2);
        assert!(!cart.set_quantity("tee-1", 2));
    }

    #[test]
    fn test_set_quantity_non_positive_removes() {
        let mut cart = Cart::new();
        cart.add_item(tee(), 1);
        cart.add_item(hoodie(), 1);

        assert!(cart.set_quantity("tee-1", 0));
        assert!(cart.set_quantity("hoodie-1", -3));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_missing_id_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(tee(), 1);
        assert!(!cart.set_quantity("nope", 5));
        assert_eq!(cart.total_qty(), 1);
    }

    #[test]
    fn test_set_quantity_clamps_large_values() {
        let mut cart = Cart::new();
        cart.add_item(tee(), 1);
        cart.set_quantity("tee-1", i64::MAX);
        assert_eq!(cart.get("tee-1").unwrap().qty, u32::MAX);
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add_item(tee(), 1);
        cart.add_item(hoodie(), 2);

        assert!(cart.clear());
        assert!(cart.is_empty());
        assert!(!cart.clear());
    }

    #[test]
    fn test_totals_track_lines() {
        let mut cart = Cart::new();
        cart.add_item(tee(), 2);
        cart.add_item(hoodie(), 1);
        cart.add_item(NewItem::new("sticker", "Sticker", "free"), 5);

        let totals = cart.totals();
        assert_eq!(totals.total_qty, 8);
        assert_eq!(totals.subtotal.amount(), 2 * 12800 + 19800);
        assert_eq!(totals.total_qty, cart.total_qty());
        assert_eq!(totals.subtotal, cart.subtotal());
        assert_eq!(totals.lines.len(), 3);
        assert!(totals.lines[2].total.is_zero());
    }

    #[test]
    fn test_apply_actions() {
        let mut cart = Cart::new();
        cart.apply(CartAction::Add { item: tee(), qty: 1 });
        cart.apply(CartAction::Add { item: tee(), qty: 2 });
        assert_eq!(cart.total_qty(), 3);

        cart.apply(CartAction::SetQty {
            id: ItemId::new("tee-1"),
            qty: 0,
        });
        assert!(cart.is_empty());

        cart.apply(CartAction::Add {
            item: hoodie(),
            qty: 1,
        });
        cart.apply(CartAction::Remove {
            id: ItemId::new("hoodie-1"),
        });
        assert!(cart.is_empty());
        assert!(!cart.apply(CartAction::Clear));
    }

    #[test]
    fn test_from_items_normalizes() {
        let line = |id: &str, name: &str, qty: u32| LineItem {
            id: ItemId::new(id),
            name: name.to_string(),
            price: "\u{00a5}100".to_string(),
            image: None,
            qty,
        };

        let cart = Cart::from_items(vec![
            line("a", "First", 1),
            line("b", "Zero", 0),
            line("a", "Second", 2),
        ]);

        assert_eq!(cart.len(), 1);
        let a = cart.get("a").unwrap();
        assert_eq!(a.name, "First");
        assert_eq!(a.qty, 3);
    }

    #[test]
    fn test_replace_reports_change() {
        let mut cart = Cart::new();
        cart.add_item(tee(), 1);
        let same = cart.items().to_vec();
        assert!(!cart.apply(CartAction::Replace(same)));
        assert!(cart.apply(CartAction::Replace(Vec::new())));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_line_item_json_shape() {
        let line = LineItem::new(hoodie(), 2);
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "hoodie-1",
                "name": "Hoodie",
                "price": "\u{00a5}19,800",
                "image": { "src": "/img/hoodie.jpg", "alt": "Black hoodie" },
                "qty": 2
            })
        );

        let bare = serde_json::to_value(LineItem::new(tee(), 1)).unwrap();
        assert!(bare.get("image").is_none());
    }

    #[test]
    fn test_cart_serializes_as_array() {
        let mut cart = Cart::new();
        cart.add_item(tee(), 1);
        let json = serde_json::to_string(&cart).unwrap();
        assert!(json.starts_with('['));
    }
}
