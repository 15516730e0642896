//! Core types, traits, and shared infrastructure for arbitrage scoring.
//!
//! This crate defines the data model shared by every scoring engine:
//! market snapshots ([`Ticker`], [`OrderBook`], [`Candle`]), the assessment
//! records the engines produce ([`RiskAssessment`], [`ProfitResult`]), the
//! [`MarketDataProvider`] seam behind which exchange adapters live, the
//! scoring configuration tree, and the TTL cache used to keep displayed
//! numbers consistent across consumers.
//!
//! # Score polarity
//!
//! Every normalized score in this workspace lives in `[0.0, 1.0]` where
//! **1.0 means best / lowest risk** and **0.0 means worst / highest risk**.
//! This polarity is an invariant; any component producing a score outside
//! the range is clamped, never rejected.

pub mod cache;
pub mod config;
pub mod config_loader;
pub mod error;
pub mod num;
pub mod opportunity;
pub mod traits;
pub mod types;

pub use cache::TtlCache;
pub use config::{
    AppConfig, AssessmentConfig, ExchangeConfig, MarketConfig, ProfitConfig, RegimeWeights,
    RiskConfig, ScoringConfig, SlippageConfig,
};
pub use config_loader::ConfigLoader;
pub use error::FetchError;
pub use num::{clamp_score, decimal_from_f64, decimal_to_f64};
pub use opportunity::ArbitrageOpportunity;
pub use traits::MarketDataProvider;
pub use types::{
    Candle, MarketRegime, OrderBook, OrderBookLevel, ProfitResult, RiskAssessment, RiskLevel,
    Side, Ticker, VolatilityLevel,
};
