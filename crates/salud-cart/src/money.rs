//! Yen amounts and the storefront's display-price convention.
//!
//! Prices travel through the cart as display strings such as `"¥12,800"`.
//! The numeric value is recovered by keeping only the ASCII digits, so the
//! convention assumes whole yen with no decimal point. [`format_price`] writes
//! the same shape back, which keeps `parse_price(&format_price(n)) == n`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::num::IntErrorKind;
use std::ops::Add;

/// Currency symbol used on every displayed price.
pub const YEN_SYMBOL: &str = "\u{00a5}";

/// A whole-yen amount.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Yen(u64);

impl Yen {
    /// Create an amount.
    pub const fn new(amount: u64) -> Self {
        Self(amount)
    }

    /// Zero yen.
    pub const fn zero() -> Self {
        Self(0)
    }

    /// The raw amount.
    pub fn amount(&self) -> u64 {
        self.0
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Parse a display price.
    ///
    /// Every character that is not an ASCII digit is dropped and the rest is
    /// read as base 10. An empty remainder is zero; one too large for `u64`
    /// saturates at `u64::MAX`.
    ///
    /// ```
    /// use salud_cart::money::Yen;
    /// assert_eq!(Yen::parse("\u{00a5}12,800").amount(), 12800);
    /// assert_eq!(Yen::parse("abc").amount(), 0);
    /// ```
    pub fn parse(display: &str) -> Self {
        let digits: String = display.chars().filter(|c| c.is_ascii_digit()).collect();
        match digits.parse::<u64>() {
            Ok(amount) => Self(amount),
            Err(e) if *e.kind() == IntErrorKind::PosOverflow => Self(u64::MAX),
            Err(_) => Self(0),
        }
    }

    /// Format as a display string (e.g., "¥12,800").
    pub fn display(&self) -> String {
        format!("{}{}", YEN_SYMBOL, group_thousands(self.0))
    }

    /// Multiply by a quantity, saturating at `u64::MAX`.
    pub fn times(&self, qty: u32) -> Yen {
        Yen(self.0.saturating_mul(u64::from(qty)))
    }

    /// Add another amount, saturating at `u64::MAX`.
    pub fn saturating_add(&self, other: Yen) -> Yen {
        Yen(self.0.saturating_add(other.0))
    }
}

impl Add for Yen {
    type Output = Yen;

    fn add(self, other: Yen) -> Yen {
        self.saturating_add(other)
    }
}

impl Sum for Yen {
    fn sum<I: Iterator<Item = Yen>>(iter: I) -> Yen {
        iter.fold(Yen::zero(), Yen::add)
    }
}

impl From<u64> for Yen {
    fn from(amount: u64) -> Self {
        Self(amount)
    }
}

impl fmt::Display for Yen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Parse a display price into whole yen; see [`Yen::parse`].
pub fn parse_price(display: &str) -> u64 {
    Yen::parse(display).amount()
}

/// Format whole yen as a display price; see [`Yen::display`].
pub fn format_price(amount: u64) -> String {
    Yen::new(amount).display()
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
