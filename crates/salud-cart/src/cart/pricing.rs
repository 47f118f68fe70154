//! Derived cart totals.

use crate::ids::ItemId;
use crate::money::Yen;
use serde::{Deserialize, Serialize};

/// Totals derived from a cart's lines.
///
/// Always computed from the lines on read; there is no stored total that
/// could drift from them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CartTotals {
    /// Sum of quantities.
    pub total_qty: u64,
    /// Sum of parsed unit price times quantity.
    pub subtotal: Yen,
    /// Per-line breakdown, in cart order.
    pub lines: Vec<LineTotal>,
}

impl CartTotals {
    /// Subtotal as a display price.
    pub fn subtotal_display(&self) -> String {
        self.subtotal.display()
    }

    /// Check if there is anything to pay for.
    pub fn is_empty(&self) -> bool {
        self.total_qty == 0
    }
}

/// Totals for a single line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineTotal {
    /// Product identifier.
    pub id: ItemId,
    /// Parsed unit price.
    pub unit_price: Yen,
    /// Quantity.
    pub qty: u32,
    /// unit_price * qty.
    pub total: Yen,
}
