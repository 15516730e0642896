//! Derived return metrics and display formatting.
//!
//! Pure functions over already-computed values. Everything here is
//! floating point: these are ranking and display figures, not money.

use arb_scout_core::num::clamp_score;
use arb_scout_core::types::VolatilityLevel;

/// Annual volatility risk premium per bucket, percent.
const RISK_PREMIUMS: [f64; 5] = [5.0, 10.0, 15.0, 25.0, 40.0];

/// Execution time stretch factor per volatility bucket.
const TIME_FACTORS: [f64; 5] = [0.85, 0.9, 1.0, 1.2, 1.5];

/// Profit decayed by holding time and the bucket's annual risk premium.
///
/// Monotonically decreasing in both duration and volatility.
#[must_use]
pub fn time_adjusted_profit(profit_percent: f64, minutes: f64, volatility: VolatilityLevel) -> f64 {
    let premium = RISK_PREMIUMS[volatility.index()];
    profit_percent * (1.0 - minutes / 1440.0) - premium / 365.0 / 24.0 * minutes
}

/// Profit compounded to an annual rate.
///
/// Short windows produce astronomically large figures; callers treat
/// this as a ranking signal, not a forecast. Zero when the duration is
/// degenerate.
#[must_use]
pub fn annualized_return(profit_percent: f64, minutes: f64) -> f64 {
    if minutes <= 0.0 {
        return 0.0;
    }
    let periods_per_year = 365.0 * 24.0 * 60.0 / minutes;
    (1.0 + profit_percent / 100.0).powf(periods_per_year) - 1.0
}

/// Annualized return less the risk-free rate, scaled down by the
/// bucket's time stretch factor.
#[must_use]
pub fn risk_adjusted_return(annualized: f64, volatility: VolatilityLevel) -> f64 {
    (annualized - 0.02) / TIME_FACTORS[volatility.index()]
}

/// Composite 0-100 ranking score.
///
/// Weighted 40/20/15/15/10 over profit (0-5% maps to 0-100), execution
/// time (0-120 min maps to 100-0), volatility bucket, liquidity, and
/// exchange quality. `exchange_score` and `liquidity_score` follow the
/// canonical polarity, 1.0 best.
#[must_use]
pub fn opportunity_score(
    profit_percent: f64,
    minutes: f64,
    volatility: VolatilityLevel,
    liquidity_score: f64,
    exchange_score: f64,
) -> f64 {
    let profit_points = (profit_percent * 20.0).clamp(0.0, 100.0);
    let time_points = (100.0 - minutes / 1.2).max(0.0);
    let volatility_points = 100.0 - volatility.index() as f64 * 25.0;
    let liquidity_points = clamp_score(liquidity_score) * 100.0;
    let exchange_points = clamp_score(exchange_score) * 100.0;

    (profit_points * 0.4
        + time_points * 0.2
        + volatility_points * 0.15
        + liquidity_points * 0.15
        + exchange_points * 0.1)
        .clamp(0.0, 100.0)
}

/// Formats an execution time for display: "45m" under an hour, "2.5h"
/// otherwise.
#[must_use]
pub fn format_time(minutes: f64) -> String {
    if minutes < 60.0 {
        format!("{}m", minutes.round() as i64)
    } else {
        format!("{:.1}h", minutes / 60.0)
    }
}

/// Formats ROI efficiency for display, e.g. "12.34%/h".
#[must_use]
pub fn format_roi_efficiency(percent_per_hour: f64) -> String {
    format!("{percent_per_hour:.2}%/h")
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Time Adjustment Tests ====================

    #[test]
    fn test_time_adjustment_decreases_with_duration() {
        let quick = time_adjusted_profit(1.0, 3.0, VolatilityLevel::Medium);
        let slow = time_adjusted_profit(1.0, 60.0, VolatilityLevel::Medium);
        assert!(quick > slow);
        assert!(quick < 1.0);
    }

    #[test]
    fn test_time_adjustment_decreases_with_volatility() {
        let calm = time_adjusted_profit(1.0, 10.0, VolatilityLevel::VeryLow);
        let wild = time_adjusted_profit(1.0, 10.0, VolatilityLevel::VeryHigh);
        assert!(calm > wild);
    }

    // ==================== Annualized Return Tests ====================

    #[test]
    fn test_annualized_return_zero_duration() {
        assert!((annualized_return(1.0, 0.0) - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_annualized_return_grows_with_profit() {
        let small = annualized_return(0.01, 60.0);
        let large = annualized_return(0.05, 60.0);
        assert!(large > small);
        assert!(small > 0.0);
    }

    #[test]
    fn test_risk_adjustment_shrinks_under_volatility() {
        let calm = risk_adjusted_return(1.0, VolatilityLevel::Low);
        let wild = risk_adjusted_return(1.0, VolatilityLevel::VeryHigh);
        assert!(calm > wild);
    }

    // ==================== Opportunity Score Tests ====================

    #[test]
    fn test_opportunity_score_bounds() {
        let best = opportunity_score(10.0, 1.0, VolatilityLevel::VeryLow, 1.0, 1.0);
        let worst = opportunity_score(0.0, 500.0, VolatilityLevel::VeryHigh, 0.0, 0.0);
        assert!(best <= 100.0 && best > 90.0);
        assert!(worst >= 0.0 && worst < 10.0);
    }

    #[test]
    fn test_opportunity_score_prefers_faster_execution() {
        let fast = opportunity_score(1.0, 3.0, VolatilityLevel::Medium, 0.7, 0.8);
        let slow = opportunity_score(1.0, 90.0, VolatilityLevel::Medium, 0.7, 0.8);
        assert!(fast > slow);
    }

    // ==================== Formatting Tests ====================

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(45.0), "45m");
        assert_eq!(format_time(150.0), "2.5h");
        assert_eq!(format_time(3.3), "3m");
    }

    #[test]
    fn test_format_roi_efficiency() {
        assert_eq!(format_roi_efficiency(12.345), "12.35%/h");
    }
}
