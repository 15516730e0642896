//! Regime-adaptive risk scoring.

use arb_scout_core::config::{ExchangeConfig, ProfitConfig, RegimeWeights, RiskConfig, ScoringConfig};
use arb_scout_core::num::clamp_score;
use arb_scout_core::types::{MarketRegime, RiskAssessment, RiskLevel};
use arb_scout_market::liquidity::volume_score;
use chrono::Utc;
use tracing::{info, warn};

use crate::factors::{fee_ratio_score, volatility_bucket_score, RiskInputs};
use crate::profile::RiskProfile;

/// Combines component scores into one normalized risk score using
/// weight vectors selected by market regime, and assembles the full
/// [`RiskAssessment`] record.
pub struct RiskScoringEngine {
    config: RiskConfig,
    exchanges: ExchangeConfig,
    sizing: ProfitConfig,
    profile: RiskProfile,
}

impl RiskScoringEngine {
    /// Creates an engine with the given profile.
    #[must_use]
    pub fn new(
        config: RiskConfig,
        exchanges: ExchangeConfig,
        sizing: ProfitConfig,
        scoring: &ScoringConfig,
    ) -> Self {
        let profile = RiskProfile::from_config(
            scoring,
            exchanges.clone(),
            config.slippage_score_scale,
            config.same_exchange_penalty,
        );
        Self {
            config,
            exchanges,
            sizing,
            profile,
        }
    }

    /// The active viability profile.
    #[must_use]
    pub fn profile(&self) -> &RiskProfile {
        &self.profile
    }

    /// Regime from current volatility and liquidity. Volatility wins when
    /// both thresholds trip.
    #[must_use]
    pub fn select_regime(&self, volatility_percent: f64, liquidity_score: f64) -> MarketRegime {
        if volatility_percent > self.config.volatile_regime_above_percent {
            MarketRegime::Volatile
        } else if liquidity_score < self.config.illiquid_regime_below {
            MarketRegime::Illiquid
        } else {
            MarketRegime::Stable
        }
    }

    fn weights(&self, regime: MarketRegime) -> &RegimeWeights {
        match regime {
            MarketRegime::Stable => &self.config.stable_weights,
            MarketRegime::Volatile => &self.config.volatile_weights,
            MarketRegime::Illiquid => &self.config.illiquid_weights,
        }
    }

    /// Steep penalty curve over the combined slippage estimate.
    #[must_use]
    pub fn slippage_score(&self, slippage: f64) -> f64 {
        clamp_score(1.0 - (slippage * self.config.slippage_score_scale).min(1.0))
    }

    /// Fee impact score: linear in round-trip fees up to the
    /// normalization point, falling back to the profit-to-fee ratio
    /// ladder when normalization is degenerate.
    #[must_use]
    pub fn fee_score(&self, profit_percent: f64, total_fee_percent: f64) -> f64 {
        if self.config.fee_normalization_percent <= 0.0 {
            return fee_ratio_score(profit_percent, total_fee_percent);
        }
        clamp_score(1.0 - total_fee_percent / self.config.fee_normalization_percent)
    }

    /// Average venue reliability with the same-venue penalty.
    #[must_use]
    pub fn exchange_score(&self, buy_exchange: &str, sell_exchange: &str) -> f64 {
        let mut score = (self.exchanges.reliability(buy_exchange)
            + self.exchanges.reliability(sell_exchange))
            / 2.0;
        if buy_exchange.eq_ignore_ascii_case(sell_exchange) {
            score -= self.config.same_exchange_penalty;
        }
        clamp_score(score)
    }

    /// Average venue execution speed.
    #[must_use]
    pub fn speed_score(&self, buy_exchange: &str, sell_exchange: &str) -> f64 {
        clamp_score((self.exchanges.speed(buy_exchange) + self.exchanges.speed(sell_exchange)) / 2.0)
    }

    /// Estimated wall-clock execution time in minutes: slower venue pairs
    /// stretch the base toward the upper clamp.
    #[must_use]
    pub fn execution_time_minutes(&self, buy_exchange: &str, sell_exchange: &str) -> f64 {
        let avg_speed = self.speed_score(buy_exchange, sell_exchange);
        (self.config.base_execution_minutes * (2.0 - avg_speed))
            .clamp(self.config.min_execution_minutes, self.config.max_execution_minutes)
    }

    /// Profit-per-hour efficiency, percent per hour, capped at 1000.
    #[must_use]
    pub fn roi_efficiency(profit_percent: f64, minutes: f64) -> f64 {
        if minutes <= 0.0 {
            return 0.0;
        }
        (profit_percent / minutes * 60.0).clamp(0.0, 1000.0)
    }

    /// Recommended trade size in USD, scaled by venue volume and quoted
    /// profit.
    #[must_use]
    pub fn optimal_trade_size(&self, avg_volume_usd: f64, profit_percent: f64) -> f64 {
        let volume_factor = if avg_volume_usd > 10_000_000.0 {
            3.0
        } else if avg_volume_usd > 1_000_000.0 {
            2.0
        } else if avg_volume_usd > 100_000.0 {
            1.0
        } else if avg_volume_usd > 10_000.0 {
            0.7
        } else {
            0.5
        };
        let profit_factor = if profit_percent > 5.0 {
            1.5
        } else if profit_percent > 2.0 {
            1.2
        } else if profit_percent > 1.0 {
            1.0
        } else if profit_percent > 0.5 {
            0.8
        } else {
            0.6
        };
        (self.sizing.base_trade_size_usd * volume_factor * profit_factor)
            .clamp(self.sizing.min_trade_size_usd, self.sizing.max_trade_size_usd)
    }

    /// Scores an opportunity into a complete [`RiskAssessment`].
    ///
    /// Never fails: every input has a degraded default upstream, and any
    /// out-of-range component is clamped here.
    #[must_use]
    pub fn assess(&self, inputs: &RiskInputs) -> RiskAssessment {
        if inputs.quoted_profit_percent > self.config.suspicious_profit_percent {
            warn!(
                buy_exchange = %inputs.buy_exchange,
                sell_exchange = %inputs.sell_exchange,
                quoted_profit_percent = inputs.quoted_profit_percent,
                "quoted profit above suspicion cutoff"
            );
            let mut assessment = RiskAssessment::suspicious(inputs.quoted_profit_percent);
            assessment.buy_fee_percentage = inputs.buy_fee_percent;
            assessment.sell_fee_percentage = inputs.sell_fee_percent;
            return assessment;
        }

        let regime = self.select_regime(inputs.volatility_percent, inputs.liquidity_score);
        let weights = self.weights(regime);

        let liquidity = clamp_score(inputs.liquidity_score);
        let volatility = volatility_bucket_score(inputs.volatility);
        let slippage = self.slippage_score(inputs.slippage);
        let depth = volume_score(inputs.avg_volume_usd);
        let speed = self.speed_score(&inputs.buy_exchange, &inputs.sell_exchange);
        let fees = self.fee_score(inputs.quoted_profit_percent, inputs.total_fee_percent());
        let exchange = self.exchange_score(&inputs.buy_exchange, &inputs.sell_exchange);

        let overall = clamp_score(
            liquidity * weights.liquidity
                + volatility * weights.volatility
                + slippage * weights.slippage
                + depth * weights.depth
                + speed * weights.speed
                + fees * weights.fees,
        );

        let early_warning = [liquidity, volatility, slippage, depth, speed, fees, exchange]
            .iter()
            .any(|score| *score < self.config.warning_floor);

        let profile_score = self.profile.evaluate(inputs);
        let viable = self.profile.is_viable(profile_score) && !early_warning;

        let execution_time =
            self.execution_time_minutes(&inputs.buy_exchange, &inputs.sell_exchange);

        info!(
            buy_exchange = %inputs.buy_exchange,
            sell_exchange = %inputs.sell_exchange,
            regime = %regime,
            overall,
            profile_score,
            viable,
            "risk scored"
        );

        RiskAssessment {
            overall_risk_score: overall,
            liquidity_score: liquidity,
            volatility_score: volatility,
            exchange_risk_score: exchange,
            market_depth_score: depth,
            execution_speed_score: speed,
            fee_impact_score: fees,
            slippage_estimate: inputs.slippage,
            execution_time_minutes: execution_time,
            roi_efficiency: Self::roi_efficiency(inputs.quoted_profit_percent, execution_time),
            optimal_trade_size: self
                .optimal_trade_size(inputs.avg_volume_usd, inputs.quoted_profit_percent),
            risk_level: RiskLevel::from_score(overall),
            buy_fee_percentage: inputs.buy_fee_percent,
            sell_fee_percentage: inputs.sell_fee_percent,
            viable,
            early_warning,
            suspicious: false,
            calculated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arb_scout_core::types::VolatilityLevel;

    fn engine() -> RiskScoringEngine {
        RiskScoringEngine::new(
            RiskConfig::default(),
            ExchangeConfig::default(),
            ProfitConfig::default(),
            &ScoringConfig::standard(),
        )
    }

    fn inputs() -> RiskInputs {
        RiskInputs {
            buy_exchange: "binance".to_string(),
            sell_exchange: "kraken".to_string(),
            quoted_profit_percent: 0.8,
            slippage: 0.003,
            volatility: VolatilityLevel::Low,
            volatility_percent: 2.0,
            liquidity_score: 0.8,
            avg_volume_usd: 5_000_000.0,
            buy_fee_percent: 0.1,
            sell_fee_percent: 0.1,
        }
    }

    // ==================== Regime Selection Tests ====================

    #[test]
    fn test_high_volatility_selects_volatile_regime() {
        assert_eq!(engine().select_regime(6.0, 0.5), MarketRegime::Volatile);
    }

    #[test]
    fn test_low_liquidity_selects_illiquid_regime() {
        assert_eq!(engine().select_regime(2.0, 0.2), MarketRegime::Illiquid);
    }

    #[test]
    fn test_ordinary_conditions_select_stable_regime() {
        assert_eq!(engine().select_regime(2.0, 0.6), MarketRegime::Stable);
    }

    #[test]
    fn test_volatility_wins_over_illiquidity() {
        assert_eq!(engine().select_regime(8.0, 0.1), MarketRegime::Volatile);
    }

    // ==================== Component Score Tests ====================

    #[test]
    fn test_slippage_score_curve() {
        let e = engine();
        assert!((e.slippage_score(0.005) - 0.95).abs() < 1e-9);
        assert!((e.slippage_score(0.05) - 0.5).abs() < 1e-9);
        assert!((e.slippage_score(0.2) - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_fee_score_linear_in_fees() {
        let e = engine();
        assert!((e.fee_score(1.0, 0.2) - 0.8).abs() < 1e-9);
        assert!((e.fee_score(1.0, 1.5) - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_execution_time_scales_with_venue_speed() {
        let e = engine();
        // binance+binance avg 0.9: 3 * 1.1 = 3.3 min
        assert!((e.execution_time_minutes("binance", "binance") - 3.3).abs() < 1e-9);
        // two slow venues stretch toward the cap
        let slow = e.execution_time_minutes("bitfinex", "unknown");
        assert!(slow > 4.0 && slow <= 10.0);
    }

    #[test]
    fn test_roi_efficiency_caps() {
        assert!((RiskScoringEngine::roi_efficiency(1.0, 3.0) - 20.0).abs() < 1e-9);
        assert!((RiskScoringEngine::roi_efficiency(100.0, 0.5) - 1000.0).abs() < 1e-9);
        assert!((RiskScoringEngine::roi_efficiency(1.0, 0.0) - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_optimal_trade_size_scaling() {
        let e = engine();
        // $5M volume, 0.8% profit: 500 * 2.0 * 0.8 = 800
        assert!((e.optimal_trade_size(5_000_000.0, 0.8) - 800.0).abs() < 1e-9);
        // Huge volume and fat profit clamp at the ceiling.
        assert!((e.optimal_trade_size(50_000_000.0, 6.0) - 2000.0).abs() < 1e-9);
        // Dust volume clamps at the floor: 500 * 0.5 * 0.6 = 150.
        assert!((e.optimal_trade_size(1_000.0, 0.1) - 150.0).abs() < 1e-9);
    }

    // ==================== Assessment Tests ====================

    #[test]
    fn test_assess_produces_scores_in_range() {
        let assessment = engine().assess(&inputs());
        for score in [
            assessment.overall_risk_score,
            assessment.liquidity_score,
            assessment.volatility_score,
            assessment.exchange_risk_score,
            assessment.market_depth_score,
            assessment.execution_speed_score,
            assessment.fee_impact_score,
        ] {
            assert!((0.0..=1.0).contains(&score), "score {score} out of range");
        }
        assert!(!assessment.suspicious);
    }

    #[test]
    fn test_assess_is_deterministic() {
        let e = engine();
        let i = inputs();
        let first = e.assess(&i);
        let second = e.assess(&i);
        assert!((first.overall_risk_score - second.overall_risk_score).abs() < 1e-12);
        assert!((first.optimal_trade_size - second.optimal_trade_size).abs() < 1e-12);
        assert_eq!(first.viable, second.viable);
    }

    #[test]
    fn test_suspicious_profit_short_circuits() {
        let mut i = inputs();
        i.quoted_profit_percent = 5.0;
        let assessment = engine().assess(&i);
        assert!(assessment.suspicious);
        assert!(!assessment.viable);
        assert!(assessment.overall_risk_score <= 0.1 + 1e-9);
        assert!((assessment.buy_fee_percentage - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_good_opportunity_is_viable() {
        let assessment = engine().assess(&inputs());
        assert!(assessment.viable);
        assert!(!assessment.early_warning);
    }

    #[test]
    fn test_weak_component_raises_early_warning() {
        let mut i = inputs();
        i.slippage = 0.09;
        let assessment = engine().assess(&i);
        assert!(assessment.early_warning);
        assert!(!assessment.viable);
    }

    #[test]
    fn test_volatile_regime_changes_weighting() {
        let e = engine();
        let calm = inputs();
        let mut wild = inputs();
        wild.volatility = VolatilityLevel::High;
        wild.volatility_percent = 6.0;
        let calm_assessment = e.assess(&calm);
        let wild_assessment = e.assess(&wild);
        // Volatile regime weights volatility at 0.35, dragging the
        // overall score down harder than the stable vector would.
        assert!(wild_assessment.overall_risk_score < calm_assessment.overall_risk_score);
    }
}
