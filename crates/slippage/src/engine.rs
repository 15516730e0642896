//! Order book walk simulation and the blended slippage estimate.

use arb_scout_core::config::{ExchangeConfig, SlippageConfig};
use arb_scout_core::num::decimal_to_f64;
use arb_scout_core::types::{OrderBook, Side, VolatilityLevel};
use chrono::{DateTime, Timelike, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use crate::history::{HistoryKey, SlippageObservation, SlippageTracker};

/// Outcome of walking a book against a trade size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationResult {
    /// Price impact as a decimal ratio, relative to the best level.
    pub slippage: f64,
    /// Fraction of the requested size that could be filled.
    pub fill_rate: f64,
    /// Volume-weighted execution price, when anything filled.
    pub avg_execution_price: Option<Decimal>,
}

/// Final blended estimate handed to risk and profit scoring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlippageEstimate {
    /// Combined slippage as a decimal ratio.
    pub slippage: f64,
    /// Fill rate from the book simulation.
    pub fill_rate: f64,
    /// Weight the learned history carried in this estimate, 0 when no
    /// usable history existed.
    pub confidence: f64,
}

/// Estimates execution slippage from book depth and learns from every
/// estimate it hands out.
pub struct SlippageEngine {
    config: SlippageConfig,
    exchanges: ExchangeConfig,
    tracker: SlippageTracker,
}

impl SlippageEngine {
    /// Creates an engine with an empty feedback tracker.
    #[must_use]
    pub fn new(config: SlippageConfig, exchanges: ExchangeConfig) -> Self {
        Self {
            config,
            exchanges,
            tracker: SlippageTracker::new(),
        }
    }

    /// The feedback tracker, exposed for sweeping and inspection.
    #[must_use]
    pub fn tracker(&self) -> &SlippageTracker {
        &self.tracker
    }

    /// Drops stale histories. Returns the number removed.
    pub fn sweep(&self) -> usize {
        self.tracker.sweep(&self.config, Utc::now())
    }

    /// Walks the book from best to worst, filling `trade_size` base units.
    ///
    /// Pure: repeated calls on the same snapshot give identical results.
    /// An empty book or a zero fill degrades to the base slippage with a
    /// half fill rate, signalling low confidence rather than failing.
    #[must_use]
    pub fn simulate(&self, book: &OrderBook, trade_size: Decimal, side: Side) -> SimulationResult {
        let levels = book.levels(side);
        if levels.is_empty() || trade_size <= Decimal::ZERO {
            return SimulationResult {
                slippage: self.config.base_slippage,
                fill_rate: 0.5,
                avg_execution_price: None,
            };
        }

        let best_price = levels[0].price;
        let mut filled = Decimal::ZERO;
        let mut cost = Decimal::ZERO;
        for level in levels.iter().take(self.config.max_walk_levels) {
            if filled >= trade_size {
                break;
            }
            let take = (trade_size - filled).min(level.volume);
            filled += take;
            cost += take * level.price;
        }

        if filled <= Decimal::ZERO || best_price <= Decimal::ZERO {
            return SimulationResult {
                slippage: self.config.base_slippage,
                fill_rate: 0.5,
                avg_execution_price: None,
            };
        }

        let avg_price = cost / filled;
        let raw = match side {
            Side::Buy => (avg_price - best_price) / best_price,
            Side::Sell => (best_price - avg_price) / best_price,
        };
        SimulationResult {
            slippage: decimal_to_f64(raw).max(0.0),
            fill_rate: decimal_to_f64(filled / trade_size).min(1.0),
            avg_execution_price: Some(avg_price),
        }
    }

    /// Full estimate for the current wall-clock hour. Records the result
    /// into the feedback tracker.
    pub fn estimate(
        &self,
        exchange: &str,
        asset: &str,
        book: &OrderBook,
        trade_size: Decimal,
        side: Side,
        volatility: VolatilityLevel,
        price_change_percent: f64,
    ) -> SlippageEstimate {
        let now = Utc::now();
        self.estimate_at(
            exchange,
            asset,
            book,
            trade_size,
            side,
            volatility,
            price_change_percent,
            now.hour(),
            now,
        )
    }

    /// Full estimate pinned to a UTC hour and clock, for deterministic
    /// callers and tests.
    #[allow(clippy::too_many_arguments)]
    pub fn estimate_at(
        &self,
        exchange: &str,
        asset: &str,
        book: &OrderBook,
        trade_size: Decimal,
        side: Side,
        volatility: VolatilityLevel,
        price_change_percent: f64,
        hour: u32,
        now: DateTime<Utc>,
    ) -> SlippageEstimate {
        let simulation = self.simulate(book, trade_size, side);

        let key = HistoryKey::new(exchange, asset, side);
        let (base, confidence) = match self.tracker.prediction(&key, &self.config, now) {
            Some((predicted, confidence)) => (
                predicted * confidence + self.config.base_slippage * (1.0 - confidence),
                confidence,
            ),
            None => (self.config.base_slippage, 0.0),
        };

        let mut adjusted_base = base
            * self.exchanges.slippage_factor(exchange)
            * self.config.hour_factors[hour as usize % 24]
            * self.config.volatility_factors[volatility.index()]
            * momentum_factor(price_change_percent);
        if simulation.fill_rate < self.config.fill_rate_threshold {
            adjusted_base *=
                1.0 + (1.0 - simulation.fill_rate) * self.config.fill_penalty_multiplier;
        }

        let blended = simulation.slippage * self.config.simulated_weight
            + adjusted_base * self.config.baseline_weight;
        let cap = if volatility == VolatilityLevel::VeryHigh {
            self.config.max_slippage_very_high_vol
        } else {
            self.config.max_slippage
        };
        // The adjusted baseline is a floor: simulation on a deep book can
        // never talk the estimate below current market conditions.
        let slippage = adjusted_base.max(blended.min(cap));

        debug!(
            exchange,
            asset,
            side = %side,
            slippage,
            fill_rate = simulation.fill_rate,
            confidence,
            "slippage estimated"
        );

        self.tracker.record(
            key,
            SlippageObservation {
                timestamp: now,
                predicted_slippage: slippage,
                trade_size: decimal_to_f64(trade_size),
                fill_rate: simulation.fill_rate,
            },
            &self.config,
        );

        SlippageEstimate {
            slippage,
            fill_rate: simulation.fill_rate,
            confidence,
        }
    }
}

/// Momentum multiplier from the absolute 24h price change percentage.
#[must_use]
pub fn momentum_factor(price_change_percent: f64) -> f64 {
    let change = price_change_percent.abs();
    if change > 5.0 {
        1.5
    } else if change > 2.0 {
        1.2
    } else if change > 1.0 {
        1.1
    } else {
        1.0
    }
}
