//! Discounted price derivation for account offerings
//!
//! discounted = round(price * (1 - rate / 100), 2), rounding the exact
//! binary value half away from zero. Input ranges are enforced by
//! validation, not here.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Price after applying a percentage discount, rounded to cents
pub fn discounted_price(price: f64, discount_rate_pct: f64) -> f64 {
    round2(price * (1.0 - discount_rate_pct / 100.0))
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or_else(|| (value * 100.0).round() / 100.0)
}
