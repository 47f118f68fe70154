//! View model for the header cart button and its slide-out drawer.
//!
//! Pure projections of a [`Cart`]; a UI layer renders these and dispatches
//! the actions they hand back.

use crate::cart::{Cart, CartAction};
use crate::ids::ItemId;

/// One rendered drawer row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawerLine {
    /// Product identifier.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Unit price exactly as stored.
    pub price: String,
    /// Image URL, if the product has one.
    pub image_src: Option<String>,
    /// Image alt text, falling back to the product name.
    pub image_alt: String,
    /// Quantity.
    pub qty: u32,
    /// Formatted unit price times quantity.
    pub line_total: String,
}

/// Read-only drawer projection of a cart.
#[derive(Debug, Clone, Copy)]
pub struct CartDrawer<'a> {
    cart: &'a Cart,
}

impl<'a> CartDrawer<'a> {
    /// Project `cart`.
    pub fn new(cart: &'a Cart) -> Self {
        Self { cart }
    }

    /// Count shown on the cart icon; hidden while the cart is empty.
    pub fn badge(&self) -> Option<u64> {
        match self.cart.total_qty() {
            0 => None,
            n => Some(n),
        }
    }

    /// Rows in cart order.
    pub fn lines(&self) -> Vec<DrawerLine> {
        self.cart
            .items()
            .iter()
            .map(|item| DrawerLine {
                id: item.id.clone(),
                name: item.name.clone(),
                price: item.price.clone(),
                image_src: item.image.as_ref().map(|img| img.src.clone()),
                image_alt: item
                    .image
                    .as_ref()
                    .and_then(|img| img.alt.clone())
                    .unwrap_or_else(|| item.name.clone()),
                qty: item.qty,
                line_total: item.line_total().display(),
            })
            .collect()
    }

    /// Check if the drawer shows the empty-cart message.
    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// Subtotal as a display price.
    pub fn subtotal_display(&self) -> String {
        self.cart.subtotal().display()
    }

    /// The checkout link is only live with something in the cart.
    pub fn can_checkout(&self) -> bool {
        self.cart.total_qty() > 0
    }

    /// Action for the "+" button of a row.
    pub fn increment(&self, id: &str) -> Option<CartAction> {
        self.step(id, 1)
    }

    /// Action for the "−" button of a row. At quantity 1 this removes the row.
    pub fn decrement(&self, id: &str) -> Option<CartAction> {
        self.step(id, -1)
    }

    fn step(&self, id: &str, delta: i64) -> Option<CartAction> {
        let item = self.cart.get(id)?;
        Some(CartAction::SetQty {
            id: item.id.clone(),
            qty: i64::from(item.qty) + delta,
        })
    }
}

/// Open/closed state of the drawer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawerState {
    open: bool,
}

impl DrawerState {
    /// Check if the drawer is showing.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Slide the drawer in.
    pub fn open(&mut self) {
        self.open = true;
    }

    /// Slide the drawer out.
    pub fn close(&mut self) {
        self.open = false;
    }

    /// Flip between open and closed.
    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// Following the checkout link closes the drawer. Returns whether the
    /// navigation should happen at all.
    pub fn close_for_checkout(&mut self, drawer: &CartDrawer<'_>) -> bool {
        if !drawer.can_checkout() {
            return false;
        }
        self.close();
        true
    }
}
