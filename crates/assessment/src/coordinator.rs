//! The single writer that keeps every displayed number consistent.

use std::sync::Arc;
use std::time::Duration;

use arb_scout_core::cache::TtlCache;
use arb_scout_core::config::AppConfig;
use arb_scout_core::num::{decimal_from_f64, decimal_to_f64};
use arb_scout_core::opportunity::ArbitrageOpportunity;
use arb_scout_core::traits::MarketDataProvider;
use arb_scout_core::types::{ProfitResult, RiskAssessment, Side, VolatilityLevel};
use arb_scout_market::MarketStatistics;
use arb_scout_profit::ProfitEngine;
use arb_scout_risk::{RiskInputs, RiskScoringEngine};
use arb_scout_slippage::{SlippageEngine, SlippageEstimate};
use chrono::Duration as ChronoDuration;
use dashmap::DashMap;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::snapshot::ExchangeSnapshot;

/// 24h volume assumed when no ticker arrived; sits at the midpoint of the
/// depth ladder so missing data reads as medium, not catastrophic.
const NEUTRAL_VOLUME_USD: f64 = 700_000.0;

/// Orchestrates data collection and scoring for one process.
///
/// Owns every engine and cache; construct once at startup and share. All
/// writes to an opportunity's risk fields flow through [`Self::assess`],
/// so no two readers ever observe different numbers for the same
/// opportunity.
pub struct AssessmentCoordinator {
    config: AppConfig,
    stats: MarketStatistics,
    slippage: SlippageEngine,
    risk: RiskScoringEngine,
    profit: ProfitEngine,
    providers: DashMap<String, Arc<dyn MarketDataProvider>>,
    assessments: TtlCache<String, RiskAssessment>,
}

impl AssessmentCoordinator {
    /// Builds a coordinator and its engines from one configuration tree.
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        let stats = MarketStatistics::new(config.market.clone());
        let slippage = SlippageEngine::new(config.slippage.clone(), config.exchanges.clone());
        let risk = RiskScoringEngine::new(
            config.risk.clone(),
            config.exchanges.clone(),
            config.profit.clone(),
            &config.scoring,
        );
        let profit = ProfitEngine::new(config.profit.clone());
        let assessments =
            TtlCache::new(Duration::from_secs(config.assessment.assessment_cache_secs));
        Self {
            config,
            stats,
            slippage,
            risk,
            profit,
            providers: DashMap::new(),
            assessments,
        }
    }

    /// Registers a market data provider under its exchange name.
    pub fn register_provider(&self, provider: Arc<dyn MarketDataProvider>) {
        let name = provider.exchange_name().to_ascii_lowercase();
        info!(exchange = %name, "provider registered");
        self.providers.insert(name, provider);
    }

    fn provider(&self, exchange: &str) -> Option<Arc<dyn MarketDataProvider>> {
        self.providers
            .get(&exchange.to_ascii_lowercase())
            .map(|entry| Arc::clone(entry.value()))
    }

    fn cache_key(opportunity: &ArbitrageOpportunity) -> String {
        format!(
            "{}|{}|{}",
            opportunity.buy_exchange.to_ascii_lowercase(),
            opportunity.sell_exchange.to_ascii_lowercase(),
            opportunity.symbol
        )
    }

    /// Scores an opportunity, reusing a fresh attached or cached
    /// assessment unless `force` is set.
    ///
    /// Never fails: missing providers, failed fetches, and timeouts all
    /// resolve to the documented fallback assessments.
    pub async fn assess(
        &self,
        opportunity: &mut ArbitrageOpportunity,
        force: bool,
    ) -> RiskAssessment {
        let key = Self::cache_key(opportunity);
        if !force {
            let max_age = ChronoDuration::seconds(self.config.assessment.max_assessment_age_secs);
            if opportunity.has_fresh_assessment(max_age) {
                debug!(key = %key, "reusing attached assessment");
                return opportunity.assessment.clone().unwrap_or_else(|| {
                    RiskAssessment::fallback(self.config.assessment.failure_risk_level)
                });
            }
            if let Some(cached) = self.assessments.get(&key) {
                debug!(key = %key, "reusing cached assessment");
                Self::ensure_consistent_values(opportunity, &cached);
                return cached;
            }
        }

        let (Some(buy_provider), Some(sell_provider)) = (
            self.provider(&opportunity.buy_exchange),
            self.provider(&opportunity.sell_exchange),
        ) else {
            warn!(
                buy_exchange = %opportunity.buy_exchange,
                sell_exchange = %opportunity.sell_exchange,
                "no provider for one or both venues"
            );
            let mut assessment =
                RiskAssessment::fallback(self.config.assessment.missing_input_risk_level);
            assessment.buy_fee_percentage = decimal_to_f64(opportunity.buy_fee_rate) * 100.0;
            assessment.sell_fee_percentage = decimal_to_f64(opportunity.sell_fee_rate) * 100.0;
            Self::ensure_consistent_values(opportunity, &assessment);
            return assessment;
        };

        let need_candles = self.stats.cached_volatility(&opportunity.symbol).is_none();
        let (buy_snapshot, sell_snapshot) = tokio::join!(
            ExchangeSnapshot::collect(
                buy_provider.as_ref(),
                &opportunity.symbol,
                Side::Buy,
                &self.config.assessment,
                &self.config.market,
                need_candles,
            ),
            ExchangeSnapshot::collect(
                sell_provider.as_ref(),
                &opportunity.symbol,
                Side::Sell,
                &self.config.assessment,
                &self.config.market,
                false,
            ),
        );

        if buy_snapshot.is_empty() && sell_snapshot.is_empty() {
            warn!(key = %key, "no market data collected, degrading to fallback");
            let assessment = RiskAssessment::fallback(self.config.assessment.failure_risk_level);
            Self::ensure_consistent_values(opportunity, &assessment);
            return assessment;
        }

        let assessment = self.score(opportunity, &buy_snapshot, &sell_snapshot);
        self.assessments.insert(key, assessment.clone());
        Self::ensure_consistent_values(opportunity, &assessment);
        assessment
    }

    fn score(
        &self,
        opportunity: &ArbitrageOpportunity,
        buy_snapshot: &ExchangeSnapshot,
        sell_snapshot: &ExchangeSnapshot,
    ) -> RiskAssessment {
        let buy_fee_rate = buy_snapshot.fee_rate.unwrap_or(opportunity.buy_fee_rate);
        let sell_fee_rate = sell_snapshot.fee_rate.unwrap_or(opportunity.sell_fee_rate);
        let quoted_profit = self.profit.basic_profit_percent(
            opportunity.buy_price,
            opportunity.sell_price,
            buy_fee_rate,
            sell_fee_rate,
        );
        let quoted_profit_percent = decimal_to_f64(quoted_profit);

        let reference_ticker = buy_snapshot.ticker.as_ref().or(sell_snapshot.ticker.as_ref());
        let volatility_percent = match reference_ticker {
            Some(ticker) => self.stats.range_percent(ticker),
            None => {
                // No ticker at all: lean on realized volatility, scaled
                // to a percentage.
                self.stats
                    .realized_volatility(&opportunity.symbol, &buy_snapshot.candles)
                    * 100.0
            }
        };
        if !buy_snapshot.candles.is_empty() {
            // Warm the cache so the next assessment skips the fetch.
            self.stats
                .realized_volatility(&opportunity.symbol, &buy_snapshot.candles);
        }
        let volatility = VolatilityLevel::from_range_percent(volatility_percent);
        let momentum_percent = reference_ticker
            .map(arb_scout_core::types::Ticker::price_change_percent)
            .unwrap_or(0.0);

        let liquidity_score = self.stats.liquidity_score(
            opportunity.base_asset(),
            &opportunity.symbol,
            buy_snapshot.order_book.as_ref(),
            sell_snapshot.order_book.as_ref(),
        );

        let volumes: Vec<f64> = [buy_snapshot.ticker.as_ref(), sell_snapshot.ticker.as_ref()]
            .into_iter()
            .flatten()
            .map(|t| decimal_to_f64(t.volume_24h * t.last_price))
            .collect();
        let avg_volume_usd = if volumes.is_empty() {
            NEUTRAL_VOLUME_USD
        } else {
            volumes.iter().sum::<f64>() / volumes.len() as f64
        };

        let trade_size = if opportunity.buy_price > Decimal::ZERO {
            decimal_from_f64(self.config.profit.base_trade_size_usd) / opportunity.buy_price
        } else {
            Decimal::ONE
        };

        let buy_estimate = self.leg_slippage(
            &opportunity.buy_exchange,
            opportunity.base_asset(),
            buy_snapshot,
            trade_size,
            Side::Buy,
            volatility,
            momentum_percent,
        );
        let sell_estimate = self.leg_slippage(
            &opportunity.sell_exchange,
            opportunity.base_asset(),
            sell_snapshot,
            trade_size,
            Side::Sell,
            volatility,
            momentum_percent,
        );

        let inputs = RiskInputs {
            buy_exchange: opportunity.buy_exchange.to_ascii_lowercase(),
            sell_exchange: opportunity.sell_exchange.to_ascii_lowercase(),
            quoted_profit_percent,
            slippage: buy_estimate.slippage + sell_estimate.slippage,
            volatility,
            volatility_percent,
            liquidity_score,
            avg_volume_usd,
            buy_fee_percent: decimal_to_f64(buy_fee_rate) * 100.0,
            sell_fee_percent: decimal_to_f64(sell_fee_rate) * 100.0,
        };
        let mut assessment = self.risk.assess(&inputs);
        if assessment.suspicious {
            return assessment;
        }

        // Re-derive the return figures from realizable, not quoted,
        // profit so the displayed efficiency survives slippage.
        let adjusted_profit = self.profit.slippage_adjusted_profit_percent(
            opportunity.buy_price,
            opportunity.sell_price,
            buy_fee_rate,
            sell_fee_rate,
            buy_estimate.slippage,
            sell_estimate.slippage,
            buy_estimate.fill_rate,
            sell_estimate.fill_rate,
        );
        assessment.roi_efficiency = RiskScoringEngine::roi_efficiency(
            decimal_to_f64(adjusted_profit),
            assessment.execution_time_minutes,
        );
        if !self.profit.is_viable_profit(adjusted_profit) {
            assessment.viable = false;
        }
        assessment
    }

    fn leg_slippage(
        &self,
        exchange: &str,
        asset: &str,
        snapshot: &ExchangeSnapshot,
        trade_size: Decimal,
        side: Side,
        volatility: VolatilityLevel,
        momentum_percent: f64,
    ) -> SlippageEstimate {
        match snapshot.order_book.as_ref() {
            Some(book) => self.slippage.estimate(
                exchange,
                asset,
                book,
                trade_size,
                side,
                volatility,
                momentum_percent,
            ),
            None => SlippageEstimate {
                slippage: self.config.slippage.base_slippage,
                fill_rate: 0.5,
                confidence: 0.0,
            },
        }
    }

    /// Re-derives every opportunity-level field from the authoritative
    /// assessment. The assessment record is the single source of truth;
    /// after this call no reader of the opportunity can observe numbers
    /// that disagree with it.
    pub fn ensure_consistent_values(
        opportunity: &mut ArbitrageOpportunity,
        assessment: &RiskAssessment,
    ) {
        opportunity.buy_fee_rate = decimal_from_f64(assessment.buy_fee_percentage / 100.0);
        opportunity.sell_fee_rate = decimal_from_f64(assessment.sell_fee_percentage / 100.0);
        opportunity.assessment = Some(assessment.clone());
    }

    /// Full fee-waterfall profit for funding `initial_amount` USD through
    /// the opportunity, using the configured transfer fee tables.
    #[must_use]
    pub fn profit_breakdown(
        &self,
        opportunity: &ArbitrageOpportunity,
        initial_amount: Decimal,
    ) -> ProfitResult {
        let units = if opportunity.buy_price > Decimal::ZERO {
            initial_amount / opportunity.buy_price
        } else {
            Decimal::ZERO
        };
        let (withdrawal_fee, network_fee) =
            self.profit.transfer_fees(opportunity.base_asset(), units);
        self.profit.comprehensive_profit(
            initial_amount,
            opportunity.buy_price,
            opportunity.sell_price,
            opportunity.buy_fee_rate,
            opportunity.sell_fee_rate,
            withdrawal_fee,
            network_fee,
            Decimal::ZERO,
        )
    }

    /// Evicts expired cache entries and stale slippage histories.
    /// Returns the number of entries removed.
    pub fn sweep(&self) -> usize {
        self.assessments.sweep() + self.stats.sweep() + self.slippage.sweep()
    }

    /// Spawns the periodic sweep task. The task runs until the returned
    /// handle is aborted or the runtime shuts down.
    pub fn spawn_sweeper(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let coordinator = Arc::clone(self);
        let interval = Duration::from_secs(coordinator.config.assessment.sweep_interval_secs);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The first tick fires immediately; skip it.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let removed = coordinator.sweep();
                debug!(removed, "cache sweep complete");
            }
        })
    }
}
