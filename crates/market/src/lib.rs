//! Volatility and liquidity estimation over market snapshots.
//!
//! The estimators in [`volatility`] and [`liquidity`] are pure functions of
//! their inputs; [`MarketStatistics`] wraps them with the per-symbol TTL
//! caches the assessment pipeline shares.

pub mod liquidity;
pub mod stats;
pub mod volatility;

pub use stats::MarketStatistics;
