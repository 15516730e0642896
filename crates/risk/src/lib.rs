//! Multi-factor risk scoring with regime-adaptive weights.
//!
//! [`RiskScoringEngine`] combines liquidity, volatility, slippage, depth,
//! speed, and fee components under a weight vector chosen by market regime,
//! and checks viability against a pluggable [`RiskProfile`] built from
//! [`RiskFactor`] implementations.

pub mod engine;
pub mod factors;
pub mod profile;

pub use engine::RiskScoringEngine;
pub use factors::{
    fee_ratio_score, volatility_bucket_score, ExchangeReliabilityFactor, LiquidityFactor,
    RiskFactor, RiskInputs, SlippageFactor, VolatilityFactor,
};
pub use profile::RiskProfile;
