//! Tunable parameters for the scoring pipeline.
//!
//! Every magic number the engines rely on lives here with a documented
//! default, so deployments can retune without code changes. Defaults come
//! from production observation of the venues involved.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// =============================================================================
// Exchange Tables
// =============================================================================

/// Per-venue quality characteristics, all on a 0..=1 scale except
/// `slippage_factor` which is a multiplier around 1.0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ExchangeProfile {
    /// Historical reliability (uptime, fill quality). Higher is better.
    pub reliability: f64,
    /// Matching engine and API speed. Higher is faster.
    pub speed: f64,
    /// Venue slippage multiplier. Below 1.0 means tighter books than
    /// average.
    pub slippage_factor: f64,
}

impl Default for ExchangeProfile {
    fn default() -> Self {
        // Unknown venues are treated as mediocre, not hostile.
        Self {
            reliability: 0.5,
            speed: 0.5,
            slippage_factor: 1.0,
        }
    }
}

/// Lookup table of venue profiles keyed by lowercase exchange name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeConfig {
    /// Profile used for venues not present in `exchanges`.
    pub default_profile: ExchangeProfile,
    /// Known venue profiles.
    pub exchanges: HashMap<String, ExchangeProfile>,
}

impl ExchangeConfig {
    /// Profile for `name`, falling back to the default profile.
    #[must_use]
    pub fn profile(&self, name: &str) -> &ExchangeProfile {
        self.exchanges
            .get(&name.to_ascii_lowercase())
            .unwrap_or(&self.default_profile)
    }

    /// Reliability score for `name`.
    #[must_use]
    pub fn reliability(&self, name: &str) -> f64 {
        self.profile(name).reliability
    }

    /// Speed score for `name`.
    #[must_use]
    pub fn speed(&self, name: &str) -> f64 {
        self.profile(name).speed
    }

    /// Slippage multiplier for `name`.
    #[must_use]
    pub fn slippage_factor(&self, name: &str) -> f64 {
        self.profile(name).slippage_factor
    }
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        let profile = |reliability, speed, slippage_factor| ExchangeProfile {
            reliability,
            speed,
            slippage_factor,
        };
        let exchanges = HashMap::from([
            ("binance".to_string(), profile(0.9, 0.9, 0.85)),
            ("coinbase".to_string(), profile(0.85, 0.6, 0.90)),
            ("kraken".to_string(), profile(0.8, 0.65, 0.88)),
            ("bybit".to_string(), profile(0.75, 0.8, 0.95)),
            ("kucoin".to_string(), profile(0.75, 0.75, 1.05)),
            ("okx".to_string(), profile(0.75, 0.85, 1.0)),
            ("gemini".to_string(), profile(0.7, 0.6, 1.0)),
            ("huobi".to_string(), profile(0.7, 0.7, 1.05)),
            ("gateio".to_string(), profile(0.7, 0.7, 1.15)),
            ("bitfinex".to_string(), profile(0.65, 0.5, 1.0)),
        ]);
        Self {
            default_profile: ExchangeProfile::default(),
            exchanges,
        }
    }
}

// =============================================================================
// Market Statistics
// =============================================================================

/// Parameters for market statistics collection and caching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Candle resolution used for realized volatility, in minutes.
    pub candle_interval_minutes: u32,
    /// Number of candles fetched for realized volatility.
    pub candle_count: usize,
    /// Volatility used when fewer than two candles are available.
    pub default_volatility: f64,
    /// Lower clamp for realized volatility.
    pub min_volatility: f64,
    /// Upper clamp for realized volatility.
    pub max_volatility: f64,
    /// TTL for cached volatility estimates, in seconds.
    pub volatility_cache_secs: u64,
    /// TTL for cached liquidity scores, in seconds.
    pub liquidity_cache_secs: u64,
    /// Order book levels considered when measuring depth.
    pub depth_levels: usize,
    /// Weight of the asset tier in the combined liquidity score.
    pub base_liquidity_weight: f64,
    /// Weight of buy-side depth in the combined liquidity score.
    pub buy_depth_weight: f64,
    /// Weight of sell-side depth in the combined liquidity score.
    pub sell_depth_weight: f64,
    /// Weight of the spread factor in the combined liquidity score.
    pub spread_weight: f64,
    /// Per-asset liquidity tiers, 0..=1, keyed by uppercase base asset.
    pub asset_liquidity: HashMap<String, f64>,
    /// Tier for assets not present in `asset_liquidity`.
    pub default_asset_liquidity: f64,
}

impl MarketConfig {
    /// Liquidity tier for `asset`, falling back to the default tier.
    #[must_use]
    pub fn asset_tier(&self, asset: &str) -> f64 {
        self.asset_liquidity
            .get(&asset.to_ascii_uppercase())
            .copied()
            .unwrap_or(self.default_asset_liquidity)
    }
}

impl Default for MarketConfig {
    fn default() -> Self {
        let asset_liquidity = HashMap::from([
            ("BTC".to_string(), 1.0),
            ("USDT".to_string(), 1.0),
            ("USDC".to_string(), 0.98),
            ("ETH".to_string(), 0.95),
            ("SOL".to_string(), 0.9),
            ("BNB".to_string(), 0.9),
            ("XRP".to_string(), 0.85),
            ("ADA".to_string(), 0.8),
        ]);
        Self {
            candle_interval_minutes: 60,
            candle_count: 24,
            default_volatility: 0.03,
            min_volatility: 0.01,
            max_volatility: 0.2,
            volatility_cache_secs: 600,
            liquidity_cache_secs: 300,
            depth_levels: 10,
            base_liquidity_weight: 0.4,
            buy_depth_weight: 0.25,
            sell_depth_weight: 0.25,
            spread_weight: 0.1,
            asset_liquidity,
            default_asset_liquidity: 0.75,
        }
    }
}

// =============================================================================
// Slippage Estimation
// =============================================================================

/// Parameters for slippage estimation and history tracking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlippageConfig {
    /// Baseline slippage ratio before any adjustment.
    pub base_slippage: f64,
    /// Order book levels walked during fill simulation.
    pub max_walk_levels: usize,
    /// Fill rates below this trigger the partial-fill penalty.
    pub fill_rate_threshold: f64,
    /// Multiplier applied to the unfilled fraction when penalizing.
    pub fill_penalty_multiplier: f64,
    /// Weight of the simulated estimate in the final blend.
    pub simulated_weight: f64,
    /// Weight of the adjusted baseline in the final blend.
    pub baseline_weight: f64,
    /// Upper cap on the estimate under normal volatility.
    pub max_slippage: f64,
    /// Upper cap on the estimate when volatility is very high.
    pub max_slippage_very_high_vol: f64,
    /// Observations kept per (exchange, asset, side) history.
    pub history_capacity: usize,
    /// Observations considered recent for the short-window mean.
    pub short_window: usize,
    /// Weight of the short-window mean in the prediction.
    pub short_window_weight: f64,
    /// Weight of the full-history mean in the prediction.
    pub long_window_weight: f64,
    /// Histories older than this are ignored, in seconds.
    pub history_stale_secs: i64,
    /// Cap on history confidence.
    pub max_confidence: f64,
    /// Multipliers per volatility bucket, indexed by
    /// [`VolatilityLevel::index`](crate::types::VolatilityLevel::index).
    pub volatility_factors: [f64; 5],
    /// Activity multiplier per UTC hour. Above 1.0 means thin books.
    pub hour_factors: [f64; 24],
}

impl Default for SlippageConfig {
    fn default() -> Self {
        Self {
            base_slippage: 0.001,
            max_walk_levels: 10,
            fill_rate_threshold: 0.9,
            fill_penalty_multiplier: 2.0,
            simulated_weight: 0.7,
            baseline_weight: 0.3,
            max_slippage: 0.05,
            max_slippage_very_high_vol: 0.08,
            history_capacity: 50,
            short_window: 10,
            short_window_weight: 0.7,
            long_window_weight: 0.3,
            history_stale_secs: 3600,
            max_confidence: 0.9,
            volatility_factors: [0.8, 0.9, 1.0, 1.3, 1.8],
            hour_factors: [
                1.2, 1.25, 1.3, 1.3, 1.2, 1.1, 1.05, 1.0, 0.95, 0.90, 0.85, 0.80, 0.85, 0.90,
                0.85, 0.80, 0.80, 0.85, 0.90, 0.95, 1.0, 1.05, 1.1, 1.15,
            ],
        }
    }
}

// =============================================================================
// Regime Weights
// =============================================================================

/// Component weights for the overall risk score. Each preset sums to 1.0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RegimeWeights {
    /// Weight of the liquidity score.
    pub liquidity: f64,
    /// Weight of the volatility score.
    pub volatility: f64,
    /// Weight of the slippage score.
    pub slippage: f64,
    /// Weight of the market depth score.
    pub depth: f64,
    /// Weight of the execution speed score.
    pub speed: f64,
    /// Weight of the fee impact score.
    pub fees: f64,
}

impl RegimeWeights {
    /// Weights for ordinary conditions.
    #[must_use]
    pub fn stable() -> Self {
        Self {
            liquidity: 0.25,
            volatility: 0.15,
            slippage: 0.20,
            depth: 0.10,
            speed: 0.10,
            fees: 0.20,
        }
    }

    /// Weights when volatility dominates: slippage and volatility up,
    /// fees barely matter.
    #[must_use]
    pub fn volatile() -> Self {
        Self {
            liquidity: 0.20,
            volatility: 0.35,
            slippage: 0.25,
            depth: 0.05,
            speed: 0.10,
            fees: 0.05,
        }
    }

    /// Weights for thin markets: liquidity and depth dominate.
    #[must_use]
    pub fn illiquid() -> Self {
        Self {
            liquidity: 0.35,
            volatility: 0.10,
            slippage: 0.25,
            depth: 0.20,
            speed: 0.05,
            fees: 0.05,
        }
    }

    /// Sum of all weights. Presets keep this at 1.0.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.liquidity + self.volatility + self.slippage + self.depth + self.speed + self.fees
    }
}

// =============================================================================
// Risk Scoring
// =============================================================================

/// Parameters for the risk scoring engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Quoted profits above this percentage are treated as suspicious and
    /// short-circuit scoring.
    pub suspicious_profit_percent: f64,
    /// Penalty subtracted from the exchange score when both legs share a
    /// venue.
    pub same_exchange_penalty: f64,
    /// 24h volatility above this percentage selects the volatile regime.
    pub volatile_regime_above_percent: f64,
    /// Liquidity scores below this select the illiquid regime.
    pub illiquid_regime_below: f64,
    /// Weights for the stable regime.
    pub stable_weights: RegimeWeights,
    /// Weights for the volatile regime.
    pub volatile_weights: RegimeWeights,
    /// Weights for the illiquid regime.
    pub illiquid_weights: RegimeWeights,
    /// Slippage ratio at which the slippage score reaches zero is
    /// `1 / slippage_score_scale`.
    pub slippage_score_scale: f64,
    /// Round-trip fee percentage at which the fee score reaches zero.
    pub fee_normalization_percent: f64,
    /// Any component score below this floor raises the early warning flag.
    pub warning_floor: f64,
    /// Base execution time in minutes before speed adjustment.
    pub base_execution_minutes: f64,
    /// Lower clamp on estimated execution time, minutes.
    pub min_execution_minutes: f64,
    /// Upper clamp on estimated execution time, minutes.
    pub max_execution_minutes: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            suspicious_profit_percent: 3.5,
            same_exchange_penalty: 0.1,
            volatile_regime_above_percent: 5.0,
            illiquid_regime_below: 0.30,
            stable_weights: RegimeWeights::stable(),
            volatile_weights: RegimeWeights::volatile(),
            illiquid_weights: RegimeWeights::illiquid(),
            slippage_score_scale: 10.0,
            fee_normalization_percent: 1.0,
            warning_floor: 0.2,
            base_execution_minutes: 3.0,
            min_execution_minutes: 1.0,
            max_execution_minutes: 10.0,
        }
    }
}

// =============================================================================
// Profit Calculation
// =============================================================================

/// Parameters for profit calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfitConfig {
    /// Profits below this percentage are never viable.
    pub min_viable_profit_percent: f64,
    /// Fill rates below this reduce realizable profit.
    pub fill_penalty_threshold: f64,
    /// Multiplier on the unfilled fraction when reducing profit.
    pub fill_penalty_multiplier: f64,
    /// Floor on the fill penalty multiplier.
    pub fill_penalty_floor: f64,
    /// Per-asset withdrawal fees in asset units, keyed by uppercase asset.
    pub withdrawal_fees: HashMap<String, f64>,
    /// Withdrawal fee for assets not in the table, as a fraction of the
    /// transferred amount.
    pub default_withdrawal_fee_fraction: f64,
    /// Per-asset network transfer fees in asset units.
    pub network_fees: HashMap<String, f64>,
    /// Network fee for assets not in the table, as a fraction of the
    /// transferred amount.
    pub default_network_fee_fraction: f64,
    /// Base recommended trade size in USD.
    pub base_trade_size_usd: f64,
    /// Lower clamp on the recommended trade size, USD.
    pub min_trade_size_usd: f64,
    /// Upper clamp on the recommended trade size, USD.
    pub max_trade_size_usd: f64,
}

impl ProfitConfig {
    /// Withdrawal fee for `asset` in asset units, or `None` when only the
    /// fractional default applies.
    #[must_use]
    pub fn withdrawal_fee(&self, asset: &str) -> Option<f64> {
        self.withdrawal_fees.get(&asset.to_ascii_uppercase()).copied()
    }

    /// Network fee for `asset` in asset units, or `None` when only the
    /// fractional default applies.
    #[must_use]
    pub fn network_fee(&self, asset: &str) -> Option<f64> {
        self.network_fees.get(&asset.to_ascii_uppercase()).copied()
    }
}

impl Default for ProfitConfig {
    fn default() -> Self {
        let withdrawal_fees = HashMap::from([
            ("BTC".to_string(), 0.0005),
            ("ETH".to_string(), 0.005),
            ("SOL".to_string(), 0.01),
            ("USDT".to_string(), 20.0),
            ("USDC".to_string(), 20.0),
        ]);
        let network_fees = HashMap::from([
            ("BTC".to_string(), 0.0001),
            ("ETH".to_string(), 0.003),
            ("SOL".to_string(), 0.0001),
            ("XRP".to_string(), 0.0001),
            ("USDT".to_string(), 5.0),
            ("USDC".to_string(), 5.0),
        ]);
        Self {
            min_viable_profit_percent: 0.05,
            fill_penalty_threshold: 0.95,
            fill_penalty_multiplier: 2.0,
            fill_penalty_floor: 0.5,
            withdrawal_fees,
            default_withdrawal_fee_fraction: 0.001,
            network_fees,
            default_network_fee_fraction: 0.001,
            base_trade_size_usd: 500.0,
            min_trade_size_usd: 100.0,
            max_trade_size_usd: 2000.0,
        }
    }
}

// =============================================================================
// Scoring Profiles
// =============================================================================

/// A named viability profile: component weights for the profile score plus
/// the minimum score an opportunity must clear.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Profile name for logs and display.
    pub name: String,
    /// Weight of the slippage score.
    pub slippage_weight: f64,
    /// Weight of the volatility score.
    pub volatility_weight: f64,
    /// Weight of the liquidity score.
    pub liquidity_weight: f64,
    /// Weight of the exchange score.
    pub exchange_weight: f64,
    /// Minimum profile score for viability.
    pub min_viability_score: f64,
}

impl ScoringConfig {
    /// Balanced profile for everyday screening.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            name: "standard".to_string(),
            slippage_weight: 0.25,
            volatility_weight: 0.25,
            liquidity_weight: 0.30,
            exchange_weight: 0.20,
            min_viability_score: 0.7,
        }
    }

    /// Stricter profile: heavier slippage and volatility weights and a
    /// higher bar.
    #[must_use]
    pub fn conservative() -> Self {
        Self {
            name: "conservative".to_string(),
            slippage_weight: 0.35,
            volatility_weight: 0.30,
            liquidity_weight: 0.20,
            exchange_weight: 0.15,
            min_viability_score: 0.85,
        }
    }

    /// Returns a copy with a different viability bar.
    #[must_use]
    pub fn with_min_viability_score(mut self, score: f64) -> Self {
        self.min_viability_score = score;
        self
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self::standard()
    }
}

// =============================================================================
// Assessment Coordination
// =============================================================================

/// Parameters for the assessment coordinator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentConfig {
    /// Deadline for each market data fetch, in seconds.
    pub fetch_timeout_secs: u64,
    /// TTL for cached assessments, in seconds.
    pub assessment_cache_secs: u64,
    /// Attached assessments older than this are recalculated, in seconds.
    pub max_assessment_age_secs: i64,
    /// Interval between cache sweeps, in seconds.
    pub sweep_interval_secs: u64,
    /// Risk level of the fallback produced for absent input data.
    pub missing_input_risk_level: f64,
    /// Risk level of the fallback produced when collection fails.
    pub failure_risk_level: f64,
    /// Order book depth requested per fetch.
    pub order_book_depth: usize,
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: 5,
            assessment_cache_secs: 300,
            max_assessment_age_secs: 300,
            sweep_interval_secs: 3600,
            missing_input_risk_level: 0.3,
            failure_risk_level: 0.4,
            order_book_depth: 20,
        }
    }
}

// =============================================================================
// Application Config
// =============================================================================

/// Root of the configuration tree.
///
/// Every section falls back to its documented defaults, so a partial file
/// (or no file at all) always produces a working configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Venue quality tables.
    pub exchanges: ExchangeConfig,
    /// Market statistics collection.
    pub market: MarketConfig,
    /// Slippage estimation.
    pub slippage: SlippageConfig,
    /// Risk scoring.
    pub risk: RiskConfig,
    /// Profit calculation.
    pub profit: ProfitConfig,
    /// Active viability profile.
    pub scoring: ScoringConfig,
    /// Assessment coordination.
    pub assessment: AssessmentConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Exchange Table Tests ====================

    #[test]
    fn test_known_exchange_profile() {
        let config = ExchangeConfig::default();
        assert!((config.reliability("binance") - 0.9).abs() < 1e-9);
        assert!((config.speed("okx") - 0.85).abs() < 1e-9);
        assert!((config.slippage_factor("gateio") - 1.15).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_exchange_uses_default_profile() {
        let config = ExchangeConfig::default();
        assert!((config.reliability("hyperdex") - 0.5).abs() < 1e-9);
        assert!((config.slippage_factor("hyperdex") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_exchange_lookup_is_case_insensitive() {
        let config = ExchangeConfig::default();
        assert!((config.reliability("Binance") - 0.9).abs() < 1e-9);
    }

    // ==================== Asset Table Tests ====================

    #[test]
    fn test_asset_tier_lookup() {
        let config = MarketConfig::default();
        assert!((config.asset_tier("btc") - 1.0).abs() < 1e-9);
        assert!((config.asset_tier("ADA") - 0.8).abs() < 1e-9);
        assert!((config.asset_tier("SHIB") - 0.75).abs() < 1e-9);
    }

    // ==================== Regime Weight Tests ====================

    #[test]
    fn test_regime_weights_sum_to_one() {
        for weights in [
            RegimeWeights::stable(),
            RegimeWeights::volatile(),
            RegimeWeights::illiquid(),
        ] {
            assert!((weights.total() - 1.0).abs() < 1e-9);
        }
    }

    // ==================== Scoring Profile Tests ====================

    #[test]
    fn test_profile_presets() {
        let standard = ScoringConfig::standard();
        assert!((standard.min_viability_score - 0.7).abs() < 1e-9);

        let conservative = ScoringConfig::conservative();
        assert!((conservative.min_viability_score - 0.85).abs() < 1e-9);
        assert!(conservative.slippage_weight > standard.slippage_weight);
    }

    #[test]
    fn test_profile_builder() {
        let profile = ScoringConfig::standard().with_min_viability_score(0.9);
        assert!((profile.min_viability_score - 0.9).abs() < 1e-9);
    }

    // ==================== Slippage Config Tests ====================

    #[test]
    fn test_hour_factors_cover_all_hours() {
        let config = SlippageConfig::default();
        assert_eq!(config.hour_factors.len(), 24);
        // Quiet early-UTC hours are penalized, busy afternoon rewarded.
        assert!(config.hour_factors[2] > 1.0);
        assert!(config.hour_factors[15] < 1.0);
    }

    #[test]
    fn test_blend_weights_sum_to_one() {
        let config = SlippageConfig::default();
        assert!((config.simulated_weight + config.baseline_weight - 1.0).abs() < 1e-9);
        assert!((config.short_window_weight + config.long_window_weight - 1.0).abs() < 1e-9);
    }

    // ==================== Fee Table Tests ====================

    #[test]
    fn test_withdrawal_and_network_fees() {
        let config = ProfitConfig::default();
        assert_eq!(config.withdrawal_fee("BTC"), Some(0.0005));
        assert_eq!(config.network_fee("usdt"), Some(5.0));
        assert_eq!(config.withdrawal_fee("DOGE"), None);
    }
}
