//! Profit calculation: basic, slippage-adjusted, and the fee waterfall.
//!
//! All money math is exact decimal arithmetic. Fee rates are decimal
//! ratios (`0.001` for 0.1%); slippage and fill rates arrive as `f64`
//! from the slippage engine and are converted at the boundary.

use arb_scout_core::config::ProfitConfig;
use arb_scout_core::num::decimal_from_f64;
use arb_scout_core::types::ProfitResult;
use rust_decimal::Decimal;
use tracing::debug;

/// Profit calculator over a [`ProfitConfig`].
pub struct ProfitEngine {
    config: ProfitConfig,
}

impl ProfitEngine {
    /// Creates an engine.
    #[must_use]
    pub fn new(config: ProfitConfig) -> Self {
        Self { config }
    }

    /// Fee-aware profit percentage at quoted prices.
    ///
    /// Returns zero when the effective buy cost is non-positive.
    #[must_use]
    pub fn basic_profit_percent(
        &self,
        buy_price: Decimal,
        sell_price: Decimal,
        buy_fee: Decimal,
        sell_fee: Decimal,
    ) -> Decimal {
        let effective_buy = buy_price * (Decimal::ONE + buy_fee);
        if effective_buy <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let effective_sell = sell_price * (Decimal::ONE - sell_fee);
        (effective_sell - effective_buy) / effective_buy * Decimal::ONE_HUNDRED
    }

    /// Profit with both prices shifted by estimated slippage, plus a
    /// haircut when the worse of the two fill rates is poor.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn slippage_adjusted_profit_percent(
        &self,
        buy_price: Decimal,
        sell_price: Decimal,
        buy_fee: Decimal,
        sell_fee: Decimal,
        buy_slippage: f64,
        sell_slippage: f64,
        buy_fill_rate: f64,
        sell_fill_rate: f64,
    ) -> Decimal {
        let slipped_buy = buy_price * (Decimal::ONE + decimal_from_f64(buy_slippage.max(0.0)));
        let slipped_sell = sell_price * (Decimal::ONE - decimal_from_f64(sell_slippage.max(0.0)));
        let mut profit = self.basic_profit_percent(slipped_buy, slipped_sell, buy_fee, sell_fee);

        let fill_rate = buy_fill_rate.min(sell_fill_rate);
        if fill_rate < self.config.fill_penalty_threshold {
            let penalty = (1.0 - (1.0 - fill_rate) * self.config.fill_penalty_multiplier)
                .max(self.config.fill_penalty_floor);
            profit *= decimal_from_f64(penalty);
            debug!(fill_rate, penalty, "partial fill haircut applied");
        }
        profit
    }

    /// Full fee waterfall for a funded round trip.
    ///
    /// Runs as an ordered pipeline because each fee applies to a
    /// different intermediate quantity: trading fees to the traded
    /// amount, withdrawal and network fees to asset units in transit,
    /// the deposit fee to the arriving units.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn comprehensive_profit(
        &self,
        initial_amount: Decimal,
        buy_price: Decimal,
        sell_price: Decimal,
        buy_fee: Decimal,
        sell_fee: Decimal,
        withdrawal_fee: Decimal,
        network_fee: Decimal,
        deposit_fee: Decimal,
    ) -> ProfitResult {
        if initial_amount <= Decimal::ZERO || buy_price <= Decimal::ZERO {
            return ProfitResult {
                absolute_profit: Decimal::ZERO,
                percentage_profit: Decimal::ZERO,
                profit_per_unit: Decimal::ZERO,
            };
        }

        let mut amount = (initial_amount / buy_price) * (Decimal::ONE - buy_fee);
        amount -= withdrawal_fee;
        amount -= network_fee;
        amount -= deposit_fee;
        let final_amount = (amount * sell_price) * (Decimal::ONE - sell_fee);

        let absolute_profit = final_amount - initial_amount;
        ProfitResult {
            absolute_profit,
            percentage_profit: (final_amount / initial_amount - Decimal::ONE)
                * Decimal::ONE_HUNDRED,
            profit_per_unit: absolute_profit / initial_amount,
        }
    }

    /// Transfer fees for moving `amount` units of `asset` between venues,
    /// as (withdrawal, network) in asset units. Assets without a table
    /// entry pay the fractional default.
    #[must_use]
    pub fn transfer_fees(&self, asset: &str, amount: Decimal) -> (Decimal, Decimal) {
        let withdrawal = match self.config.withdrawal_fee(asset) {
            Some(fee) => decimal_from_f64(fee),
            None => amount * decimal_from_f64(self.config.default_withdrawal_fee_fraction),
        };
        let network = match self.config.network_fee(asset) {
            Some(fee) => decimal_from_f64(fee),
            None => amount * decimal_from_f64(self.config.default_network_fee_fraction),
        };
        (withdrawal, network)
    }

    /// True when the profit clears the minimum viable threshold.
    #[must_use]
    pub fn is_viable_profit(&self, profit_percent: Decimal) -> bool {
        profit_percent >= decimal_from_f64(self.config.min_viable_profit_percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn engine() -> ProfitEngine {
        ProfitEngine::new(ProfitConfig::default())
    }

    // ==================== Basic Profit Tests ====================

    #[test]
    fn test_basic_profit_no_fees() {
        let pct = engine().basic_profit_percent(dec!(10), dec!(11), dec!(0), dec!(0));
        assert_eq!(pct, dec!(10));
    }

    #[test]
    fn test_basic_profit_asymmetric_under_price_swap() {
        let e = engine();
        let gain = e.basic_profit_percent(dec!(10), dec!(11), dec!(0), dec!(0));
        let loss = e.basic_profit_percent(dec!(11), dec!(10), dec!(0), dec!(0));
        assert_eq!(gain, dec!(10));
        assert!(loss < dec!(-9.0) && loss > dec!(-9.1));
    }

    #[test]
    fn test_basic_profit_fees_cut_both_legs() {
        let pct = engine().basic_profit_percent(dec!(100), dec!(101), dec!(0.001), dec!(0.001));
        // Gross 1% minus roughly 0.2% of fee drag.
        assert!(pct > dec!(0.7) && pct < dec!(0.9));
    }

    #[test]
    fn test_basic_profit_zero_buy_price() {
        assert_eq!(
            engine().basic_profit_percent(dec!(0), dec!(10), dec!(0), dec!(0)),
            dec!(0)
        );
    }

    // ==================== Slippage Adjustment Tests ====================

    #[test]
    fn test_slippage_reduces_profit() {
        let e = engine();
        let clean = e.basic_profit_percent(dec!(100), dec!(102), dec!(0), dec!(0));
        let slipped = e.slippage_adjusted_profit_percent(
            dec!(100), dec!(102), dec!(0), dec!(0), 0.005, 0.005, 1.0, 1.0,
        );
        assert!(slipped < clean);
    }

    #[test]
    fn test_full_fills_take_no_haircut() {
        let e = engine();
        let adjusted = e.slippage_adjusted_profit_percent(
            dec!(100), dec!(102), dec!(0), dec!(0), 0.0, 0.0, 1.0, 0.96,
        );
        assert_eq!(adjusted, dec!(2));
    }

    #[test]
    fn test_poor_fill_haircut_applied() {
        let e = engine();
        let adjusted = e.slippage_adjusted_profit_percent(
            dec!(100), dec!(102), dec!(0), dec!(0), 0.0, 0.0, 1.0, 0.8,
        );
        // penalty = 1 - 0.2*2 = 0.6
        assert!(adjusted > dec!(1.19) && adjusted < dec!(1.21));
    }

    #[test]
    fn test_haircut_floors_at_half() {
        let e = engine();
        let adjusted = e.slippage_adjusted_profit_percent(
            dec!(100), dec!(102), dec!(0), dec!(0), 0.0, 0.0, 0.1, 1.0,
        );
        assert_eq!(adjusted, dec!(1.0));
    }

    // ==================== Waterfall Tests ====================

    #[test]
    fn test_waterfall_without_fees_is_pure_spread() {
        let result = engine().comprehensive_profit(
            dec!(1000), dec!(100), dec!(110), dec!(0), dec!(0), dec!(0), dec!(0), dec!(0),
        );
        assert_eq!(result.absolute_profit, dec!(100));
        assert_eq!(result.percentage_profit, dec!(10));
        assert_eq!(result.profit_per_unit, dec!(0.1));
    }

    #[test]
    fn test_waterfall_order_of_deductions() {
        // 1000 USD buys 10 units, 0.1% trading fee leaves 9.99; a 0.05
        // unit withdrawal and 0.01 network fee leave 9.93; selling at 110
        // with 0.1% fee nets 1092.3 - 1.0923.
        let result = engine().comprehensive_profit(
            dec!(1000), dec!(100), dec!(110), dec!(0.001), dec!(0.001),
            dec!(0.05), dec!(0.01), dec!(0),
        );
        let expected_final = dec!(9.93) * dec!(110) * dec!(0.999);
        assert_eq!(result.absolute_profit, expected_final - dec!(1000));
    }

    #[test]
    fn test_waterfall_fees_can_sink_the_trade() {
        let result = engine().comprehensive_profit(
            dec!(100), dec!(100), dec!(101), dec!(0.001), dec!(0.001),
            dec!(0.01), dec!(0.005), dec!(0),
        );
        assert!(!result.is_profitable());
    }

    #[test]
    fn test_waterfall_rejects_degenerate_inputs() {
        let result = engine().comprehensive_profit(
            dec!(0), dec!(100), dec!(110), dec!(0), dec!(0), dec!(0), dec!(0), dec!(0),
        );
        assert_eq!(result.absolute_profit, dec!(0));
    }

    // ==================== Transfer Fee Tests ====================

    #[test]
    fn test_transfer_fees_from_table() {
        let (withdrawal, network) = engine().transfer_fees("BTC", dec!(2));
        assert_eq!(withdrawal, dec!(0.0005));
        assert_eq!(network, dec!(0.0001));
    }

    #[test]
    fn test_transfer_fees_fractional_default() {
        let (withdrawal, network) = engine().transfer_fees("DOGE", dec!(1000));
        assert_eq!(withdrawal, dec!(1));
        assert_eq!(network, dec!(1));
    }

    // ==================== Viability Tests ====================

    #[test]
    fn test_minimum_viable_profit() {
        let e = engine();
        assert!(e.is_viable_profit(dec!(0.05)));
        assert!(e.is_viable_profit(dec!(0.5)));
        assert!(!e.is_viable_profit(dec!(0.01)));
    }
}
