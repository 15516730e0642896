//! Conversions between exact money arithmetic and score-space floats.
//!
//! Prices, volumes, and fees are carried as [`Decimal`] end to end.
//! Normalized scores and statistical quantities (volatility, slippage
//! ratios) need transcendental math, so they live in `f64`. These helpers
//! are the only crossing points between the two.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

/// Converts a decimal to `f64`, degrading to `0.0` on overflow.
#[must_use]
pub fn decimal_to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Converts an `f64` to a decimal, degrading to zero for non-finite input.
#[must_use]
pub fn decimal_from_f64(value: f64) -> Decimal {
    if value.is_finite() {
        Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
    } else {
        Decimal::ZERO
    }
}

/// Clamps a score into the canonical `[0.0, 1.0]` range.
///
/// NaN collapses to `0.0` so a degenerate upstream calculation reads as
/// highest risk rather than poisoning downstream composites.
#[must_use]
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, 1.0)
}
