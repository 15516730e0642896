//! Volatility estimation from tickers and candle series.

use arb_scout_core::config::MarketConfig;
use arb_scout_core::num::decimal_to_f64;
use arb_scout_core::types::{Candle, Ticker, VolatilityLevel};

/// Volatility percentage assumed when a ticker has no usable 24h range.
pub const DEFAULT_RANGE_PERCENT: f64 = 5.0;

/// 24h volatility percentage from a ticker's high/low range.
///
/// Falls back to [`DEFAULT_RANGE_PERCENT`] when the range is missing.
#[must_use]
pub fn range_percent(ticker: &Ticker) -> f64 {
    if !ticker.has_range() {
        return DEFAULT_RANGE_PERCENT;
    }
    decimal_to_f64((ticker.high_price - ticker.low_price) / ticker.low_price) * 100.0
}

/// Classifies a ticker into a volatility bucket.
#[must_use]
pub fn classify(ticker: &Ticker) -> VolatilityLevel {
    VolatilityLevel::from_range_percent(range_percent(ticker))
}

/// Realized volatility from a candle series.
///
/// Standard deviation of consecutive close-to-close returns, scaled by
/// `sqrt(24)` to normalize hourly candles to a daily figure, clamped to
/// the configured range. Fewer than two candles yields the configured
/// default.
#[must_use]
pub fn realized(candles: &[Candle], config: &MarketConfig) -> f64 {
    if candles.len() < 2 {
        return config.default_volatility;
    }

    let closes: Vec<f64> = candles.iter().map(|c| decimal_to_f64(c.close)).collect();
    let returns: Vec<f64> = closes
        .windows(2)
        .filter(|w| w[0] > 0.0)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect();
    if returns.is_empty() {
        return config.default_volatility;
    }

    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let variance =
        returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / returns.len() as f64;
    let daily = variance.sqrt() * 24.0_f64.sqrt();

    daily.clamp(config.min_volatility, config.max_volatility)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn ticker(high: Decimal, low: Decimal) -> Ticker {
        Ticker {
            exchange: "binance".to_string(),
            symbol: "BTC/USDT".to_string(),
            last_price: (high + low) / Decimal::TWO,
            bid_price: low,
            ask_price: high,
            high_price: high,
            low_price: low,
            open_price: low,
            volume_24h: dec!(1000),
            timestamp: Utc::now(),
        }
    }

    fn candle(close: Decimal) -> Candle {
        Candle {
            open: close,
            high: close,
            low: close,
            close,
            timestamp: Utc::now(),
        }
    }

    // ==================== Range Volatility Tests ====================

    #[test]
    fn test_range_percent_from_ticker() {
        let t = ticker(dec!(105), dec!(100));
        assert!((range_percent(&t) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_range_percent_defaults_without_range() {
        let t = ticker(Decimal::ZERO, Decimal::ZERO);
        assert!((range_percent(&t) - DEFAULT_RANGE_PERCENT).abs() < 1e-9);
    }

    #[test]
    fn test_classification_from_ticker() {
        assert_eq!(classify(&ticker(dec!(100.5), dec!(100))), VolatilityLevel::VeryLow);
        assert_eq!(classify(&ticker(dec!(112), dec!(100))), VolatilityLevel::VeryHigh);
    }

    // ==================== Realized Volatility Tests ====================

    #[test]
    fn test_realized_needs_two_candles() {
        let config = MarketConfig::default();
        assert!((realized(&[candle(dec!(100))], &config) - 0.03).abs() < 1e-9);
        assert!((realized(&[], &config) - 0.03).abs() < 1e-9);
    }

    #[test]
    fn test_realized_flat_series_clamps_to_floor() {
        let config = MarketConfig::default();
        let candles = vec![candle(dec!(100)); 10];
        assert!((realized(&candles, &config) - config.min_volatility).abs() < 1e-9);
    }

    #[test]
    fn test_realized_wild_series_clamps_to_ceiling() {
        let config = MarketConfig::default();
        let candles: Vec<Candle> = [100, 150, 90, 160, 80]
            .iter()
            .map(|p| candle(Decimal::from(*p as i64)))
            .collect();
        assert!((realized(&candles, &config) - config.max_volatility).abs() < 1e-9);
    }

    #[test]
    fn test_realized_moderate_series_in_range() {
        let config = MarketConfig::default();
        let candles: Vec<Candle> = [100.0, 100.5, 99.8, 100.2, 100.9, 100.4]
            .iter()
            .map(|p| candle(Decimal::try_from(*p).unwrap()))
            .collect();
        let vol = realized(&candles, &config);
        assert!(vol >= config.min_volatility && vol <= config.max_volatility);
    }
}
