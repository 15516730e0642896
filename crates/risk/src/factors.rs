//! Pluggable risk factors and their shared input record.

use arb_scout_core::config::ExchangeConfig;
use arb_scout_core::num::clamp_score;
use arb_scout_core::types::VolatilityLevel;

/// Precomputed per-opportunity values every factor scores against.
///
/// The coordinator assembles this once per assessment from the collected
/// snapshots; factors stay pure and cheaply re-evaluable.
#[derive(Debug, Clone)]
pub struct RiskInputs {
    /// Lowercase buy-side exchange name.
    pub buy_exchange: String,
    /// Lowercase sell-side exchange name.
    pub sell_exchange: String,
    /// Fee-aware quoted profit at top of book, percent.
    pub quoted_profit_percent: f64,
    /// Combined round-trip slippage estimate, decimal ratio.
    pub slippage: f64,
    /// Volatility bucket for the asset.
    pub volatility: VolatilityLevel,
    /// Raw 24h volatility percentage, for regime selection.
    pub volatility_percent: f64,
    /// Combined liquidity score from order books and asset tier.
    pub liquidity_score: f64,
    /// Average 24h traded volume across both venues, USD.
    pub avg_volume_usd: f64,
    /// Buy-side trading fee, percent.
    pub buy_fee_percent: f64,
    /// Sell-side trading fee, percent.
    pub sell_fee_percent: f64,
}

impl RiskInputs {
    /// Round-trip trading fees, percent.
    #[must_use]
    pub fn total_fee_percent(&self) -> f64 {
        self.buy_fee_percent + self.sell_fee_percent
    }

    /// True when both legs run on the same venue.
    #[must_use]
    pub fn is_same_exchange(&self) -> bool {
        self.buy_exchange.eq_ignore_ascii_case(&self.sell_exchange)
    }
}

/// One scored risk dimension. Implementations must return values in
/// `[0, 1]` with 1.0 meaning lowest risk.
pub trait RiskFactor: Send + Sync {
    /// Factor name for logs and profile display.
    fn name(&self) -> &'static str;

    /// Scores the opportunity on this dimension.
    fn score(&self, inputs: &RiskInputs) -> f64;
}

// =============================================================================
// Concrete Factors
// =============================================================================

/// Steep penalty curve over the slippage estimate: 0.5% of slippage
/// scores 0.95, 5% scores 0.5, 10% or more scores 0.
pub struct SlippageFactor {
    /// Ratio-to-score multiplier, normally 10.
    pub scale: f64,
}

impl RiskFactor for SlippageFactor {
    fn name(&self) -> &'static str {
        "slippage"
    }

    fn score(&self, inputs: &RiskInputs) -> f64 {
        clamp_score(1.0 - (inputs.slippage * self.scale).min(1.0))
    }
}

/// Maps the volatility bucket to a fixed score.
pub struct VolatilityFactor;

impl RiskFactor for VolatilityFactor {
    fn name(&self) -> &'static str {
        "volatility"
    }

    fn score(&self, inputs: &RiskInputs) -> f64 {
        volatility_bucket_score(inputs.volatility)
    }
}

/// Passes the combined liquidity score through.
pub struct LiquidityFactor;

impl RiskFactor for LiquidityFactor {
    fn name(&self) -> &'static str {
        "liquidity"
    }

    fn score(&self, inputs: &RiskInputs) -> f64 {
        clamp_score(inputs.liquidity_score)
    }
}

/// Average venue reliability, penalized when both legs share a venue
/// since a single outage then kills the whole trade.
pub struct ExchangeReliabilityFactor {
    exchanges: ExchangeConfig,
    same_exchange_penalty: f64,
}

impl ExchangeReliabilityFactor {
    /// Builds the factor over a venue table.
    #[must_use]
    pub fn new(exchanges: ExchangeConfig, same_exchange_penalty: f64) -> Self {
        Self {
            exchanges,
            same_exchange_penalty,
        }
    }
}

impl RiskFactor for ExchangeReliabilityFactor {
    fn name(&self) -> &'static str {
        "exchange_reliability"
    }

    fn score(&self, inputs: &RiskInputs) -> f64 {
        let mut score = (self.exchanges.reliability(&inputs.buy_exchange)
            + self.exchanges.reliability(&inputs.sell_exchange))
            / 2.0;
        if inputs.is_same_exchange() {
            score -= self.same_exchange_penalty;
        }
        clamp_score(score)
    }
}

// =============================================================================
// Shared Scoring Curves
// =============================================================================

/// Fixed score per volatility bucket, calmer markets scoring higher.
#[must_use]
pub fn volatility_bucket_score(level: VolatilityLevel) -> f64 {
    match level {
        VolatilityLevel::VeryLow => 0.9,
        VolatilityLevel::Low => 0.8,
        VolatilityLevel::Medium => 0.6,
        VolatilityLevel::High => 0.4,
        VolatilityLevel::VeryHigh => 0.2,
    }
}

/// Score from the ratio of quoted profit to round-trip fees.
///
/// A trade whose profit does not even cover its fees scores 0.1; five
/// times fees or better scores 0.9.
#[must_use]
pub fn fee_ratio_score(profit_percent: f64, total_fee_percent: f64) -> f64 {
    if total_fee_percent <= 0.0 {
        return if profit_percent > 0.0 { 0.9 } else { 0.1 };
    }
    let ratio = profit_percent / total_fee_percent;
    let score = if ratio < 1.0 {
        0.1
    } else if ratio < 1.5 {
        0.1 + (ratio - 1.0) / 0.5 * 0.2
    } else if ratio < 2.0 {
        0.3 + (ratio - 1.5) / 0.5 * 0.2
    } else if ratio < 3.0 {
        0.5 + (ratio - 2.0) * 0.2
    } else if ratio < 5.0 {
        0.7 + (ratio - 3.0) / 2.0 * 0.2
    } else {
        0.9
    };
    clamp_score(score)
}
