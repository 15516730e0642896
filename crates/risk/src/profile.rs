//! Named viability profiles over weighted risk factors.

use arb_scout_core::config::{ExchangeConfig, ScoringConfig};
use arb_scout_core::num::clamp_score;
use tracing::debug;

use crate::factors::{
    ExchangeReliabilityFactor, LiquidityFactor, RiskFactor, RiskInputs, SlippageFactor,
    VolatilityFactor,
};

/// A weighted set of risk factors plus the minimum score an opportunity
/// must clear to be considered viable under this profile.
pub struct RiskProfile {
    name: String,
    factors: Vec<(Box<dyn RiskFactor>, f64)>,
    min_viability_score: f64,
}

impl RiskProfile {
    /// Builds the standard four-factor profile from a scoring config.
    #[must_use]
    pub fn from_config(
        config: &ScoringConfig,
        exchanges: ExchangeConfig,
        slippage_scale: f64,
        same_exchange_penalty: f64,
    ) -> Self {
        let factors: Vec<(Box<dyn RiskFactor>, f64)> = vec![
            (
                Box::new(SlippageFactor { scale: slippage_scale }),
                config.slippage_weight,
            ),
            (Box::new(VolatilityFactor), config.volatility_weight),
            (Box::new(LiquidityFactor), config.liquidity_weight),
            (
                Box::new(ExchangeReliabilityFactor::new(exchanges, same_exchange_penalty)),
                config.exchange_weight,
            ),
        ];
        Self {
            name: config.name.clone(),
            factors,
            min_viability_score: config.min_viability_score,
        }
    }

    /// The balanced everyday profile.
    #[must_use]
    pub fn standard(exchanges: ExchangeConfig) -> Self {
        Self::from_config(&ScoringConfig::standard(), exchanges, 10.0, 0.1)
    }

    /// The stricter profile with heavier slippage and volatility weights.
    #[must_use]
    pub fn conservative(exchanges: ExchangeConfig) -> Self {
        Self::from_config(&ScoringConfig::conservative(), exchanges, 10.0, 0.1)
    }

    /// Profile name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Minimum score this profile accepts.
    #[must_use]
    pub fn min_viability_score(&self) -> f64 {
        self.min_viability_score
    }

    /// Weighted mean of all factor scores, clamped to `[0, 1]`.
    #[must_use]
    pub fn evaluate(&self, inputs: &RiskInputs) -> f64 {
        let total_weight: f64 = self.factors.iter().map(|(_, w)| w).sum();
        if total_weight <= 0.0 {
            return 0.0;
        }
        let weighted: f64 = self
            .factors
            .iter()
            .map(|(factor, weight)| {
                let score = factor.score(inputs);
                debug!(profile = %self.name, factor = factor.name(), score, "factor scored");
                score * weight
            })
            .sum();
        clamp_score(weighted / total_weight)
    }

    /// Viability check against the profile threshold.
    #[must_use]
    pub fn is_viable(&self, score: f64) -> bool {
        score >= self.min_viability_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arb_scout_core::types::VolatilityLevel;

    fn inputs() -> RiskInputs {
        RiskInputs {
            buy_exchange: "binance".to_string(),
            sell_exchange: "coinbase".to_string(),
            quoted_profit_percent: 0.6,
            slippage: 0.002,
            volatility: VolatilityLevel::Low,
            volatility_percent: 2.0,
            liquidity_score: 0.85,
            avg_volume_usd: 5_000_000.0,
            buy_fee_percent: 0.1,
            sell_fee_percent: 0.1,
        }
    }

    #[test]
    fn test_good_opportunity_clears_standard_profile() {
        let profile = RiskProfile::standard(ExchangeConfig::default());
        let score = profile.evaluate(&inputs());
        assert!((0.0..=1.0).contains(&score));
        assert!(profile.is_viable(score), "score {score} below standard bar");
    }

    #[test]
    fn test_conservative_profile_is_stricter() {
        let standard = RiskProfile::standard(ExchangeConfig::default());
        let conservative = RiskProfile::conservative(ExchangeConfig::default());

        // Decent but not pristine: slips past standard, not conservative.
        let mut i = inputs();
        i.slippage = 0.01;
        i.volatility = VolatilityLevel::Medium;
        let standard_score = standard.evaluate(&i);
        let conservative_score = conservative.evaluate(&i);
        assert!(standard.is_viable(standard_score));
        assert!(!conservative.is_viable(conservative_score));
    }

    #[test]
    fn test_bad_opportunity_fails_both_profiles() {
        let mut i = inputs();
        i.slippage = 0.08;
        i.volatility = VolatilityLevel::VeryHigh;
        i.liquidity_score = 0.2;
        for profile in [
            RiskProfile::standard(ExchangeConfig::default()),
            RiskProfile::conservative(ExchangeConfig::default()),
        ] {
            let score = profile.evaluate(&i);
            assert!(!profile.is_viable(score));
        }
    }
}
