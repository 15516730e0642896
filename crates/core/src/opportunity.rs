//! Cross-exchange arbitrage opportunity record.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::num::decimal_to_f64;
use crate::types::RiskAssessment;

/// A detected price discrepancy: buy on one exchange, sell on another.
///
/// Fee rates are decimal ratios (`0.001` for 0.1%). The attached
/// [`RiskAssessment`] is the single authoritative risk record for the
/// opportunity; display code reads scores from it, never from scratch
/// fields of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArbitrageOpportunity {
    /// Unique identifier for this detection.
    pub id: Uuid,
    /// Normalized symbol (e.g., "BTC/USDT").
    pub symbol: String,
    /// Exchange to buy on.
    pub buy_exchange: String,
    /// Exchange to sell on.
    pub sell_exchange: String,
    /// Best ask on the buy exchange.
    pub buy_price: Decimal,
    /// Best bid on the sell exchange.
    pub sell_price: Decimal,
    /// Taker fee rate on the buy side.
    pub buy_fee_rate: Decimal,
    /// Taker fee rate on the sell side.
    pub sell_fee_rate: Decimal,
    /// When the discrepancy was detected.
    pub detected_at: DateTime<Utc>,
    /// Risk record, populated by the assessment coordinator.
    pub assessment: Option<RiskAssessment>,
}

impl ArbitrageOpportunity {
    /// Creates a new opportunity with a fresh id and no assessment.
    #[must_use]
    pub fn new(
        symbol: impl Into<String>,
        buy_exchange: impl Into<String>,
        sell_exchange: impl Into<String>,
        buy_price: Decimal,
        sell_price: Decimal,
        buy_fee_rate: Decimal,
        sell_fee_rate: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            symbol: symbol.into(),
            buy_exchange: buy_exchange.into(),
            sell_exchange: sell_exchange.into(),
            buy_price,
            sell_price,
            buy_fee_rate,
            sell_fee_rate,
            detected_at: Utc::now(),
            assessment: None,
        }
    }

    /// Base asset of the symbol ("BTC" for "BTC/USDT").
    #[must_use]
    pub fn base_asset(&self) -> &str {
        self.symbol.split('/').next().unwrap_or(&self.symbol)
    }

    /// Fee-aware quoted profit percentage at top-of-book prices.
    ///
    /// Returns zero when the buy price is missing or non-positive.
    #[must_use]
    pub fn quoted_profit_percent(&self) -> Decimal {
        let effective_buy = self.buy_price * (Decimal::ONE + self.buy_fee_rate);
        if effective_buy <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let effective_sell = self.sell_price * (Decimal::ONE - self.sell_fee_rate);
        (effective_sell - effective_buy) / effective_buy * Decimal::ONE_HUNDRED
    }

    /// [`quoted_profit_percent`](Self::quoted_profit_percent) as an `f64`
    /// for the scoring engines.
    #[must_use]
    pub fn quoted_profit_percent_f64(&self) -> f64 {
        decimal_to_f64(self.quoted_profit_percent())
    }

    /// Total round-trip trading fees as a percentage.
    #[must_use]
    pub fn total_fee_percent(&self) -> Decimal {
        (self.buy_fee_rate + self.sell_fee_rate) * Decimal::ONE_HUNDRED
    }

    /// True when both legs run on the same venue.
    #[must_use]
    pub fn is_same_exchange(&self) -> bool {
        self.buy_exchange.eq_ignore_ascii_case(&self.sell_exchange)
    }

    /// True when an assessment is attached and no older than `max_age`.
    #[must_use]
    pub fn has_fresh_assessment(&self, max_age: Duration) -> bool {
        self.assessment
            .as_ref()
            .is_some_and(|a| Utc::now() - a.calculated_at <= max_age)
    }
}
