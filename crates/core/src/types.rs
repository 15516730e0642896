//! Market snapshot and assessment record types.
//!
//! Snapshots ([`Ticker`], [`OrderBook`], [`Candle`]) are immutable: they are
//! created fresh per fetch by an exchange adapter and never mutated by the
//! engines. Assessment records ([`RiskAssessment`], [`ProfitResult`]) are
//! plain data produced for the presentation layer.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::num::{clamp_score, decimal_to_f64};

// =============================================================================
// Trade Side
// =============================================================================

/// Which side of the book an order consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Buying consumes ask levels.
    Buy,
    /// Selling consumes bid levels.
    Sell,
}

impl Side {
    /// Returns the opposite side.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }

    /// Returns the display string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Ticker
// =============================================================================

/// A 24h ticker snapshot from one exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticker {
    /// Exchange identifier (e.g., "binance").
    pub exchange: String,
    /// Trading symbol (e.g., "BTC/USDT").
    pub symbol: String,
    /// Last traded price.
    pub last_price: Decimal,
    /// Best bid price.
    pub bid_price: Decimal,
    /// Best ask price.
    pub ask_price: Decimal,
    /// 24h high price.
    pub high_price: Decimal,
    /// 24h low price.
    pub low_price: Decimal,
    /// 24h opening price (used for momentum estimation).
    pub open_price: Decimal,
    /// 24h traded volume in base units.
    pub volume_24h: Decimal,
    /// When the snapshot was taken.
    pub timestamp: DateTime<Utc>,
}

impl Ticker {
    /// Returns the 24h price change from open to last, as a percentage.
    ///
    /// Returns `0.0` when the open price is missing or non-positive.
    #[must_use]
    pub fn price_change_percent(&self) -> f64 {
        if self.open_price <= Decimal::ZERO || self.last_price <= Decimal::ZERO {
            return 0.0;
        }
        decimal_to_f64((self.last_price - self.open_price) / self.open_price) * 100.0
    }

    /// Returns true if both 24h high and low are present and sane.
    #[must_use]
    pub fn has_range(&self) -> bool {
        self.high_price > Decimal::ZERO
            && self.low_price > Decimal::ZERO
            && self.high_price >= self.low_price
    }
}

// =============================================================================
// Order Book
// =============================================================================

/// A single price level in an order book.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderBookLevel {
    /// Level price.
    pub price: Decimal,
    /// Volume available at this price, in base units.
    pub volume: Decimal,
}

/// An L2 order book snapshot.
///
/// Bids are ordered by descending price, asks by ascending price. The
/// ordering is the producer's responsibility; the engines assume it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderBook {
    /// Exchange identifier.
    pub exchange: String,
    /// Trading symbol.
    pub symbol: String,
    /// Bid levels, best (highest) first.
    pub bids: Vec<OrderBookLevel>,
    /// Ask levels, best (lowest) first.
    pub asks: Vec<OrderBookLevel>,
    /// When the snapshot was taken.
    pub timestamp: DateTime<Utc>,
}

impl OrderBook {
    /// Returns the best bid level, if any.
    #[must_use]
    pub fn best_bid(&self) -> Option<&OrderBookLevel> {
        self.bids.first()
    }

    /// Returns the best ask level, if any.
    #[must_use]
    pub fn best_ask(&self) -> Option<&OrderBookLevel> {
        self.asks.first()
    }

    /// Returns the levels consumed by the given side.
    #[must_use]
    pub fn levels(&self, side: Side) -> &[OrderBookLevel] {
        match side {
            Side::Buy => &self.asks,
            Side::Sell => &self.bids,
        }
    }

    /// Total volume across the top `depth` levels of both sides.
    #[must_use]
    pub fn total_depth(&self, depth: usize) -> Decimal {
        let bid_volume: Decimal = self.bids.iter().take(depth).map(|l| l.volume).sum();
        let ask_volume: Decimal = self.asks.iter().take(depth).map(|l| l.volume).sum();
        bid_volume + ask_volume
    }

    /// Mid price from best bid/ask, if both are present.
    #[must_use]
    pub fn mid_price(&self) -> Option<Decimal> {
        let bid = self.best_bid()?.price;
        let ask = self.best_ask()?.price;
        if bid <= Decimal::ZERO || ask <= Decimal::ZERO {
            return None;
        }
        Some((bid + ask) / Decimal::TWO)
    }
}

// =============================================================================
// Candle
// =============================================================================

/// A single OHLC candle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Opening price.
    pub open: Decimal,
    /// High price.
    pub high: Decimal,
    /// Low price.
    pub low: Decimal,
    /// Closing price.
    pub close: Decimal,
    /// Candle open time.
    pub timestamp: DateTime<Utc>,
}

impl Candle {
    /// High-to-low range as a percentage of the low.
    ///
    /// Returns `0.0` when the candle has no valid range.
    #[must_use]
    pub fn price_range_percent(&self) -> f64 {
        if self.low <= Decimal::ZERO || self.high < self.low {
            return 0.0;
        }
        decimal_to_f64((self.high - self.low) / self.low) * 100.0
    }
}

// =============================================================================
// Volatility Classification
// =============================================================================

/// Coarse volatility bucket derived from a 24h range percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VolatilityLevel {
    /// Range below 1%.
    VeryLow,
    /// Range below 2.5%.
    Low,
    /// Range below 5%.
    Medium,
    /// Range below 10%.
    High,
    /// Range of 10% or more.
    VeryHigh,
}

impl VolatilityLevel {
    /// Classifies a 24h range percentage into a bucket.
    #[must_use]
    pub fn from_range_percent(percent: f64) -> Self {
        if percent < 1.0 {
            Self::VeryLow
        } else if percent < 2.5 {
            Self::Low
        } else if percent < 5.0 {
            Self::Medium
        } else if percent < 10.0 {
            Self::High
        } else {
            Self::VeryHigh
        }
    }

    /// Bucket index from 0 (`VeryLow`) to 4 (`VeryHigh`).
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::VeryLow => 0,
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
            Self::VeryHigh => 4,
        }
    }

    /// Returns the display string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::VeryLow => "very low",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::VeryHigh => "very high",
        }
    }
}

impl std::fmt::Display for VolatilityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Market Regime
// =============================================================================

/// Coarse classification of current trading conditions, used to select the
/// risk weight vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketRegime {
    /// Ordinary conditions.
    Stable,
    /// 24h volatility above the configured threshold.
    Volatile,
    /// Liquidity score below the configured threshold.
    Illiquid,
}

impl std::fmt::Display for MarketRegime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Stable => "stable",
            Self::Volatile => "volatile",
            Self::Illiquid => "illiquid",
        };
        write!(f, "{s}")
    }
}

// =============================================================================
// Risk Level Bands
// =============================================================================

/// Human-readable risk band for an overall risk score.
///
/// The nine bands and their boundaries are fixed constants shared by every
/// consumer so that all screens speak the same vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    /// Score in `[0.0, 0.1)`.
    Critical,
    /// Score in `[0.1, 0.25)`.
    VeryHigh,
    /// Score in `[0.25, 0.35)`.
    High,
    /// Score in `[0.35, 0.45)`.
    MediumHigh,
    /// Score in `[0.45, 0.55)`.
    Medium,
    /// Score in `[0.55, 0.65)`.
    LowMedium,
    /// Score in `[0.65, 0.75)`.
    Low,
    /// Score in `[0.75, 0.9)`.
    VeryLow,
    /// Score in `[0.9, 1.0]`.
    Minimal,
}

impl RiskLevel {
    /// Maps an overall risk score to its band. Scores are clamped first.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        let score = clamp_score(score);
        if score >= 0.9 {
            Self::Minimal
        } else if score >= 0.75 {
            Self::VeryLow
        } else if score >= 0.65 {
            Self::Low
        } else if score >= 0.55 {
            Self::LowMedium
        } else if score >= 0.45 {
            Self::Medium
        } else if score >= 0.35 {
            Self::MediumHigh
        } else if score >= 0.25 {
            Self::High
        } else if score >= 0.1 {
            Self::VeryHigh
        } else {
            Self::Critical
        }
    }

    /// Returns the display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Critical => "Critical Risk",
            Self::VeryHigh => "Very High Risk",
            Self::High => "High Risk",
            Self::MediumHigh => "Medium-High Risk",
            Self::Medium => "Medium Risk",
            Self::LowMedium => "Low-Medium Risk",
            Self::Low => "Low Risk",
            Self::VeryLow => "Very Low Risk",
            Self::Minimal => "Minimal Risk",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// =============================================================================
// Risk Assessment
// =============================================================================

/// The authoritative risk record for one opportunity.
///
/// All component scores follow the canonical polarity: `1.0` is best /
/// lowest risk. `slippage_estimate` is the one exception — it is a raw
/// decimal ratio (e.g., `0.002` for 0.2%), not a score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Overall weighted risk score in `[0, 1]`.
    pub overall_risk_score: f64,
    /// Liquidity component score.
    pub liquidity_score: f64,
    /// Volatility component score.
    pub volatility_score: f64,
    /// Exchange reliability component score.
    pub exchange_risk_score: f64,
    /// Market depth component score.
    pub market_depth_score: f64,
    /// Execution speed component score.
    pub execution_speed_score: f64,
    /// Fee impact component score.
    pub fee_impact_score: f64,
    /// Combined round-trip slippage estimate as a decimal ratio.
    pub slippage_estimate: f64,
    /// Estimated wall-clock execution time in minutes.
    pub execution_time_minutes: f64,
    /// Profit-per-hour efficiency (percent per hour).
    pub roi_efficiency: f64,
    /// Recommended trade size in quote currency (USD).
    pub optimal_trade_size: f64,
    /// Risk band for display.
    pub risk_level: RiskLevel,
    /// Buy-side trading fee as a percentage (e.g., `0.1` for 0.1%).
    pub buy_fee_percentage: f64,
    /// Sell-side trading fee as a percentage.
    pub sell_fee_percentage: f64,
    /// True when the opportunity clears the active profile threshold and no
    /// early warning is set.
    pub viable: bool,
    /// Set when any single component score falls below the warning floor.
    pub early_warning: bool,
    /// Set when the suspicious-profit short circuit fired.
    pub suspicious: bool,
    /// When this assessment was produced.
    pub calculated_at: DateTime<Utc>,
}

impl RiskAssessment {
    /// Builds the documented fallback assessment for a given risk level.
    ///
    /// Used by the coordinator when data collection fails or times out:
    /// the caller always receives a displayable record, never an error.
    /// `risk_level` follows score polarity (`0.4` reads as medium risk).
    #[must_use]
    pub fn fallback(risk_level: f64) -> Self {
        let r = clamp_score(risk_level);
        let execution_time_minutes = 1.0 + (1.0 - r) * 9.0;
        Self {
            overall_risk_score: r,
            liquidity_score: r * 0.7 + 0.2,
            volatility_score: r * 0.8 + 0.1,
            exchange_risk_score: r * 0.6 + 0.3,
            market_depth_score: r,
            execution_speed_score: r,
            fee_impact_score: r,
            slippage_estimate: 0.001 + (1.0 - r) * 0.049,
            execution_time_minutes,
            roi_efficiency: 0.01 * (60.0 / execution_time_minutes),
            optimal_trade_size: 100.0 + r * 900.0,
            risk_level: RiskLevel::from_score(r),
            buy_fee_percentage: 0.0,
            sell_fee_percentage: 0.0,
            viable: false,
            early_warning: false,
            suspicious: false,
            calculated_at: Utc::now(),
        }
    }

    /// Builds the dedicated low-score assessment for implausibly high
    /// quoted profits.
    ///
    /// Very large quoted spreads in crypto arbitrage are more often stale
    /// data or manipulation than real opportunities, so scoring short
    /// circuits to this record instead of running the normal pipeline.
    #[must_use]
    pub fn suspicious(quoted_profit_percent: f64) -> Self {
        let mut assessment = Self::fallback(0.1);
        assessment.suspicious = true;
        assessment.early_warning = true;
        assessment.viable = false;
        assessment.risk_level = RiskLevel::from_score(assessment.overall_risk_score);
        tracing::warn!(
            quoted_profit_percent,
            "suspiciously high quoted profit, scoring short-circuited"
        );
        assessment
    }

    /// Display score on a 0–100 scale for the presentation layer.
    #[must_use]
    pub fn display_score(&self) -> u32 {
        (clamp_score(self.overall_risk_score) * 100.0).round() as u32
    }

    /// Human-readable risk label.
    #[must_use]
    pub fn risk_label(&self) -> &'static str {
        self.risk_level.label()
    }
}

// =============================================================================
// Profit Result
// =============================================================================

/// Result of a profit calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfitResult {
    /// Absolute profit in quote currency.
    pub absolute_profit: Decimal,
    /// Profit as a percentage of the invested amount.
    pub percentage_profit: Decimal,
    /// Profit per unit of invested quote currency.
    pub profit_per_unit: Decimal,
}

impl ProfitResult {
    /// Returns true when the trade nets a positive amount.
    #[must_use]
    pub fn is_profitable(&self) -> bool {
        self.absolute_profit > Decimal::ZERO
    }
}
