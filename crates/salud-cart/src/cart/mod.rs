//! Shopping cart module.
//!
//! Contains the cart reducer, line items and derived totals.

mod cart;
mod pricing;

pub use cart::{Cart, CartAction, ItemImage, LineItem, NewItem};
pub use pricing::{CartTotals, LineTotal};
