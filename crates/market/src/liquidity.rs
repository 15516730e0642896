//! Order book and volume based liquidity scoring.
//!
//! All scores follow the canonical polarity: 1.0 is deep and tight, 0.0 is
//! empty.

use arb_scout_core::config::MarketConfig;
use arb_scout_core::num::decimal_to_f64;
use arb_scout_core::types::OrderBook;

/// Neutral factor used when a book or one of its sides is missing.
const NEUTRAL: f64 = 0.5;

/// Depth factor for one book: `log10(1 + total volume of the top levels)
/// / 5`, clamped to `[0.1, 1.0]`.
#[must_use]
pub fn depth_factor(book: Option<&OrderBook>, levels: usize) -> f64 {
    let Some(book) = book else {
        return NEUTRAL;
    };
    let total = decimal_to_f64(book.total_depth(levels));
    if total <= 0.0 {
        return 0.1;
    }
    ((1.0 + total).log10() / 5.0).clamp(0.1, 1.0)
}

/// Spread factor for one book from best bid/ask.
///
/// A spread of 0.1% or tighter scores 1.0, 2% or wider scores 0.1, with
/// linear interpolation between.
#[must_use]
pub fn spread_factor(book: Option<&OrderBook>) -> f64 {
    let Some(book) = book else {
        return NEUTRAL;
    };
    let (Some(bid), Some(ask)) = (book.best_bid(), book.best_ask()) else {
        return NEUTRAL;
    };
    if bid.price <= rust_decimal::Decimal::ZERO || ask.price < bid.price {
        return NEUTRAL;
    }
    let spread_percent = decimal_to_f64((ask.price - bid.price) / bid.price) * 100.0;
    if spread_percent <= 0.1 {
        1.0
    } else if spread_percent >= 2.0 {
        0.1
    } else {
        1.0 - (spread_percent - 0.1) / 1.9 * 0.9
    }
}

/// Combined liquidity score for an opportunity spanning two books.
///
/// Blends the asset's base tier, per-side depth, and spread. With both
/// books present the weights are base 40%, each depth 25%, spread 10%;
/// with at most one book the depth and spread shares fold together into
/// base 40%, depth 40%, spread 20%.
#[must_use]
pub fn combined_score(
    asset: &str,
    buy_book: Option<&OrderBook>,
    sell_book: Option<&OrderBook>,
    config: &MarketConfig,
) -> f64 {
    let base = config.asset_tier(asset);
    let buy_depth = depth_factor(buy_book, config.depth_levels);
    let sell_depth = depth_factor(sell_book, config.depth_levels);
    let spread = match (buy_book, sell_book) {
        (Some(b), Some(s)) => (spread_factor(Some(b)) + spread_factor(Some(s))) / 2.0,
        (Some(b), None) => spread_factor(Some(b)),
        (None, Some(s)) => spread_factor(Some(s)),
        (None, None) => NEUTRAL,
    };

    let score = if buy_book.is_some() && sell_book.is_some() {
        base * config.base_liquidity_weight
            + buy_depth * config.buy_depth_weight
            + sell_depth * config.sell_depth_weight
            + spread * config.spread_weight
    } else {
        let depth = (buy_depth + sell_depth) / 2.0;
        base * 0.4 + depth * 0.4 + spread * 0.2
    };

    score.clamp(0.1, 1.0)
}

/// Market depth score from combined 24h traded volume in USD.
///
/// Piecewise-linear ladder: $10k of volume scores 0.1, $100k scores 0.3,
/// $1M scores 0.6, $10M scores 0.9, with the last 0.1 earned slowly up to
/// $100M.
#[must_use]
pub fn volume_score(volume_usd: f64) -> f64 {
    let score = if volume_usd < 10_000.0 {
        (volume_usd / 10_000.0 * 0.1).max(0.01)
    } else if volume_usd < 100_000.0 {
        0.1 + (volume_usd - 10_000.0) / 90_000.0 * 0.2
    } else if volume_usd < 1_000_000.0 {
        0.3 + (volume_usd - 100_000.0) / 900_000.0 * 0.3
    } else if volume_usd < 10_000_000.0 {
        0.6 + (volume_usd - 1_000_000.0) / 9_000_000.0 * 0.3
    } else {
        0.9 + ((volume_usd - 10_000_000.0) / 90_000_000.0).min(0.1)
    };
    score.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arb_scout_core::types::OrderBookLevel;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn book(bid: rust_decimal::Decimal, ask: rust_decimal::Decimal, depth: rust_decimal::Decimal) -> OrderBook {
        OrderBook {
            exchange: "binance".to_string(),
            symbol: "BTC/USDT".to_string(),
            bids: vec![OrderBookLevel { price: bid, volume: depth }],
            asks: vec![OrderBookLevel { price: ask, volume: depth }],
            timestamp: Utc::now(),
        }
    }

    // ==================== Depth Factor Tests ====================

    #[test]
    fn test_depth_factor_missing_book_is_neutral() {
        assert!((depth_factor(None, 10) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_depth_factor_scales_with_volume() {
        let thin = book(dec!(100), dec!(100.1), dec!(1));
        let deep = book(dec!(100), dec!(100.1), dec!(10000));
        assert!(depth_factor(Some(&deep), 10) > depth_factor(Some(&thin), 10));
        assert!(depth_factor(Some(&deep), 10) <= 1.0);
    }

    #[test]
    fn test_depth_factor_empty_book_floors() {
        let empty = OrderBook {
            exchange: "binance".to_string(),
            symbol: "BTC/USDT".to_string(),
            bids: vec![],
            asks: vec![],
            timestamp: Utc::now(),
        };
        assert!((depth_factor(Some(&empty), 10) - 0.1).abs() < 1e-9);
    }

    // ==================== Spread Factor Tests ====================

    #[test]
    fn test_tight_spread_scores_full() {
        let tight = book(dec!(100), dec!(100.05), dec!(10));
        assert!((spread_factor(Some(&tight)) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_wide_spread_scores_floor() {
        let wide = book(dec!(100), dec!(103), dec!(10));
        assert!((spread_factor(Some(&wide)) - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_spread_interpolates_between_bounds() {
        // 1% spread sits a bit above the midpoint of the 0.1..2.0 band.
        let mid = book(dec!(100), dec!(101), dec!(10));
        let factor = spread_factor(Some(&mid));
        assert!(factor > 0.1 && factor < 1.0);
        assert!((factor - (1.0 - 0.9 / 1.9 * 0.9)).abs() < 1e-9);
    }

    // ==================== Combined Score Tests ====================

    #[test]
    fn test_combined_score_in_range() {
        let config = MarketConfig::default();
        let buy = book(dec!(100), dec!(100.05), dec!(500));
        let sell = book(dec!(100.4), dec!(100.5), dec!(500));
        let score = combined_score("BTC", Some(&buy), Some(&sell), &config);
        assert!((0.1..=1.0).contains(&score));
    }

    #[test]
    fn test_unknown_asset_scores_below_btc() {
        let config = MarketConfig::default();
        let buy = book(dec!(100), dec!(100.05), dec!(500));
        let sell = book(dec!(100.4), dec!(100.5), dec!(500));
        let btc = combined_score("BTC", Some(&buy), Some(&sell), &config);
        let unknown = combined_score("OBSCURE", Some(&buy), Some(&sell), &config);
        assert!(unknown < btc);
    }

    #[test]
    fn test_missing_books_give_neutral_leaning_score() {
        let config = MarketConfig::default();
        let score = combined_score("BTC", None, None, &config);
        // base 1.0 * 0.4 + 0.5 * 0.4 + 0.5 * 0.2 = 0.7
        assert!((score - 0.7).abs() < 1e-9);
    }

    // ==================== Volume Ladder Tests ====================

    #[test]
    fn test_volume_ladder_is_monotone() {
        let points = [
            0.0, 5_000.0, 10_000.0, 50_000.0, 100_000.0, 500_000.0, 1_000_000.0, 5_000_000.0,
            10_000_000.0, 50_000_000.0, 200_000_000.0,
        ];
        let mut prev = -1.0;
        for v in points {
            let s = volume_score(v);
            assert!(s >= prev, "ladder decreased at volume {v}");
            assert!((0.0..=1.0).contains(&s));
            prev = s;
        }
    }

    #[test]
    fn test_volume_ladder_band_anchors() {
        assert!((volume_score(10_000.0) - 0.1).abs() < 1e-9);
        assert!((volume_score(100_000.0) - 0.3).abs() < 1e-9);
        assert!((volume_score(1_000_000.0) - 0.6).abs() < 1e-9);
        assert!((volume_score(10_000_000.0) - 0.9).abs() < 1e-9);
        assert!((volume_score(100_000_000.0) - 1.0).abs() < 1e-9);
    }
}
