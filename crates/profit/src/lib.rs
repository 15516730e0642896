//! Fee-waterfall profit calculation and derived return metrics.
//!
//! [`ProfitEngine`] computes basic, slippage-adjusted, and comprehensive
//! (waterfall) profit in exact decimal arithmetic; [`metrics`] derives the
//! floating-point ranking figures from those results.

pub mod engine;
pub mod metrics;

pub use engine::ProfitEngine;
