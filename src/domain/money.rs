//! Fixed-point money value object.
//!
//! Amounts and fees are always `rust_decimal::Decimal`; binary floating point
//! is never used for either. Fee rates, by contrast, are plain `f64` (a
//! processor's configured rate, not an amount).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A fixed-point monetary amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Money(Decimal);

impl Money {
    /// Wraps a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// The zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    #[must_use]
    pub fn is_negative(self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Multiplies by a fee rate, preserving at least `min_scale` decimal
    /// places in the result (never truncating below the natural product
    /// scale).
    #[must_use]
    pub fn apply_rate(self, rate: f64, min_scale: u32) -> Self {
        let rate_decimal = Decimal::try_from(rate).unwrap_or(Decimal::ZERO);
        let product = self.0 * rate_decimal;
        Self(if product.scale() < min_scale {
            product.round_dp(min_scale)
        } else {
            product
        })
    }

    /// Renders as a decimal string with at least `min_scale` decimal places.
    #[must_use]
    pub fn to_string_min_scale(self, min_scale: u32) -> String {
        if self.0.scale() < min_scale {
            self.0.round_dp(min_scale).to_string()
        } else {
            self.0.to_string()
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}
