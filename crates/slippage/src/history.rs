//! Per-market slippage history and feedback prediction.

use std::collections::VecDeque;

use arb_scout_core::config::SlippageConfig;
use arb_scout_core::types::Side;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Identifies one slippage history: estimates for buying BTC on Binance
/// are tracked separately from selling it there.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HistoryKey {
    /// Lowercase exchange name.
    pub exchange: String,
    /// Uppercase base asset.
    pub asset: String,
    /// Book side the estimate was for.
    pub side: Side,
}

impl HistoryKey {
    /// Normalizes exchange and asset casing.
    #[must_use]
    pub fn new(exchange: &str, asset: &str, side: Side) -> Self {
        Self {
            exchange: exchange.to_ascii_lowercase(),
            asset: asset.to_ascii_uppercase(),
            side,
        }
    }
}

/// One recorded estimate and its realized fill.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SlippageObservation {
    /// When the estimate was made.
    pub timestamp: DateTime<Utc>,
    /// Slippage ratio the engine predicted.
    pub predicted_slippage: f64,
    /// Trade size the estimate was for, in base units.
    pub trade_size: f64,
    /// Fill rate realized by the simulation.
    pub fill_rate: f64,
}

/// Bounded observation window for one market, oldest evicted first.
///
/// The long and short means are recomputed on every insert so reads never
/// pay for aggregation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlippageHistory {
    observations: VecDeque<SlippageObservation>,
    long_term_mean: f64,
    short_term_mean: f64,
}

impl SlippageHistory {
    /// Appends an observation, evicting the oldest beyond capacity.
    pub fn push(&mut self, observation: SlippageObservation, config: &SlippageConfig) {
        if self.observations.len() >= config.history_capacity {
            self.observations.pop_front();
        }
        self.observations.push_back(observation);
        self.recompute_means(config);
    }

    fn recompute_means(&mut self, config: &SlippageConfig) {
        let n = self.observations.len();
        if n == 0 {
            self.long_term_mean = 0.0;
            self.short_term_mean = 0.0;
            return;
        }
        let sum: f64 = self.observations.iter().map(|o| o.predicted_slippage).sum();
        self.long_term_mean = sum / n as f64;

        let short_n = n.min(config.short_window);
        let short_sum: f64 = self
            .observations
            .iter()
            .rev()
            .take(short_n)
            .map(|o| o.predicted_slippage)
            .sum();
        self.short_term_mean = short_sum / short_n as f64;
    }

    /// Number of observations held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// True when no observations are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Mean predicted slippage over the whole window.
    #[must_use]
    pub fn long_term_mean(&self) -> f64 {
        self.long_term_mean
    }

    /// Mean predicted slippage over the most recent observations.
    #[must_use]
    pub fn short_term_mean(&self) -> f64 {
        self.short_term_mean
    }

    /// True when the newest observation is older than the staleness
    /// window.
    #[must_use]
    pub fn is_stale(&self, config: &SlippageConfig, now: DateTime<Utc>) -> bool {
        match self.observations.back() {
            Some(latest) => now - latest.timestamp > Duration::seconds(config.history_stale_secs),
            None => true,
        }
    }

    /// Confidence in the prediction, rising with observation count up to
    /// the configured cap.
    #[must_use]
    pub fn confidence(&self, config: &SlippageConfig) -> f64 {
        let ratio = self.observations.len() as f64 / config.history_capacity as f64;
        ratio.min(config.max_confidence)
    }

    /// Blended prediction, or `None` when empty or stale.
    #[must_use]
    pub fn predicted(&self, config: &SlippageConfig, now: DateTime<Utc>) -> Option<f64> {
        if self.is_stale(config, now) {
            return None;
        }
        Some(
            self.short_term_mean * config.short_window_weight
                + self.long_term_mean * config.long_window_weight,
        )
    }
}

/// Process-wide slippage histories, keyed per (exchange, asset, side).
///
/// Each append replaces the keyed history wholesale under the map's
/// per-key lock, so concurrent estimators never observe a partially
/// updated window.
pub struct SlippageTracker {
    histories: DashMap<HistoryKey, SlippageHistory>,
}

impl SlippageTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self {
            histories: DashMap::new(),
        }
    }

    /// Records an observation for `key`, creating the history lazily.
    pub fn record(&self, key: HistoryKey, observation: SlippageObservation, config: &SlippageConfig) {
        trace!(
            exchange = %key.exchange,
            asset = %key.asset,
            side = %key.side,
            predicted = observation.predicted_slippage,
            "slippage observation recorded"
        );
        self.histories
            .entry(key)
            .or_default()
            .push(observation, config);
    }

    /// Prediction and confidence for `key`, or `None` when no usable
    /// history exists.
    #[must_use]
    pub fn prediction(
        &self,
        key: &HistoryKey,
        config: &SlippageConfig,
        now: DateTime<Utc>,
    ) -> Option<(f64, f64)> {
        let history = self.histories.get(key)?;
        let predicted = history.predicted(config, now)?;
        Some((predicted, history.confidence(config)))
    }

    /// Drops every history whose newest observation is stale. Returns the
    /// number removed.
    pub fn sweep(&self, config: &SlippageConfig, now: DateTime<Utc>) -> usize {
        let before = self.histories.len();
        self.histories.retain(|_, history| !history.is_stale(config, now));
        before - self.histories.len()
    }

    /// Number of tracked markets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.histories.len()
    }

    /// True when no markets are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.histories.is_empty()
    }
}

impl Default for SlippageTracker {
    fn default() -> Self {
        Self::new()
    }
}
