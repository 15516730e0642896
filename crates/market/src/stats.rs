//! Cached statistics facade used by the assessment pipeline.

use std::time::Duration;

use arb_scout_core::cache::TtlCache;
use arb_scout_core::config::MarketConfig;
use arb_scout_core::types::{Candle, OrderBook, Ticker, VolatilityLevel};
use tracing::debug;

use crate::{liquidity, volatility};

/// Cached access to the volatility and liquidity estimators.
///
/// The estimators themselves are pure; this facade adds the per-symbol TTL
/// caches so repeated assessments of the same market within the window do
/// not refetch or recompute. One instance is shared process-wide by the
/// coordinator; fresh instances give deterministic unit tests.
pub struct MarketStatistics {
    config: MarketConfig,
    volatility_cache: TtlCache<String, f64>,
    liquidity_cache: TtlCache<String, f64>,
}

impl MarketStatistics {
    /// Creates a facade with caches sized from `config`.
    #[must_use]
    pub fn new(config: MarketConfig) -> Self {
        let volatility_cache = TtlCache::new(Duration::from_secs(config.volatility_cache_secs));
        let liquidity_cache = TtlCache::new(Duration::from_secs(config.liquidity_cache_secs));
        Self {
            config,
            volatility_cache,
            liquidity_cache,
        }
    }

    /// The configuration this facade was built with.
    #[must_use]
    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    /// 24h range volatility percentage for a ticker. Pure passthrough.
    #[must_use]
    pub fn range_percent(&self, ticker: &Ticker) -> f64 {
        volatility::range_percent(ticker)
    }

    /// Volatility bucket for a ticker. Pure passthrough.
    #[must_use]
    pub fn classify(&self, ticker: &Ticker) -> VolatilityLevel {
        volatility::classify(ticker)
    }

    /// Cached realized volatility for `symbol`, if still live.
    ///
    /// Lets the coordinator skip the candle fetch entirely on a hit.
    #[must_use]
    pub fn cached_volatility(&self, symbol: &str) -> Option<f64> {
        self.volatility_cache.get(&symbol.to_string())
    }

    /// Realized volatility for `symbol`, computing and caching from
    /// `candles` on a miss.
    pub fn realized_volatility(&self, symbol: &str, candles: &[Candle]) -> f64 {
        if let Some(cached) = self.volatility_cache.get(&symbol.to_string()) {
            return cached;
        }
        let vol = volatility::realized(candles, &self.config);
        debug!(symbol, volatility = vol, candles = candles.len(), "realized volatility computed");
        self.volatility_cache.insert(symbol.to_string(), vol);
        vol
    }

    /// Combined liquidity score for an opportunity, cached per
    /// (buy exchange, sell exchange, symbol).
    pub fn liquidity_score(
        &self,
        asset: &str,
        symbol: &str,
        buy_book: Option<&OrderBook>,
        sell_book: Option<&OrderBook>,
    ) -> f64 {
        let key = match (buy_book, sell_book) {
            (Some(b), Some(s)) => format!("{}:{}:{symbol}", b.exchange, s.exchange),
            _ => format!("partial:{symbol}"),
        };
        if let Some(cached) = self.liquidity_cache.get(&key) {
            return cached;
        }
        let score = liquidity::combined_score(asset, buy_book, sell_book, &self.config);
        debug!(symbol, score, "liquidity score computed");
        self.liquidity_cache.insert(key, score);
        score
    }

    /// Market depth score from combined 24h volume in USD. Pure
    /// passthrough to the volume ladder.
    #[must_use]
    pub fn volume_score(&self, volume_usd: f64) -> f64 {
        liquidity::volume_score(volume_usd)
    }

    /// Drops expired cache entries. Returns the number removed.
    pub fn sweep(&self) -> usize {
        self.volatility_cache.sweep() + self.liquidity_cache.sweep()
    }

    /// Clears both caches.
    pub fn clear(&self) {
        self.volatility_cache.clear();
        self.liquidity_cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn candle(close: rust_decimal::Decimal) -> Candle {
        Candle {
            open: close,
            high: close,
            low: close,
            close,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_realized_volatility_is_cached() {
        let stats = MarketStatistics::new(MarketConfig::default());
        let candles: Vec<Candle> = [100, 102, 99, 103]
            .iter()
            .map(|p| candle(rust_decimal::Decimal::from(*p as i64)))
            .collect();

        let first = stats.realized_volatility("BTC/USDT", &candles);
        assert_eq!(stats.cached_volatility("BTC/USDT"), Some(first));
        // A different series must not displace the cached value.
        let second = stats.realized_volatility("BTC/USDT", &[]);
        assert!((first - second).abs() < 1e-12);
    }

    #[test]
    fn test_clear_drops_cached_values() {
        let stats = MarketStatistics::new(MarketConfig::default());
        let candles = vec![candle(dec!(100)), candle(dec!(105))];
        stats.realized_volatility("ETH/USDT", &candles);
        stats.clear();
        assert_eq!(stats.cached_volatility("ETH/USDT"), None);
    }

    #[test]
    fn test_liquidity_score_cached_per_exchange_pair() {
        let stats = MarketStatistics::new(MarketConfig::default());
        let score = stats.liquidity_score("BTC", "BTC/USDT", None, None);
        let again = stats.liquidity_score("BTC", "BTC/USDT", None, None);
        assert!((score - again).abs() < 1e-12);
    }
}
