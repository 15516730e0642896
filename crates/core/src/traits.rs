//! Core abstractions implemented by exchange adapters.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::error::FetchError;
use crate::types::{Candle, OrderBook, Side, Ticker};

/// Read-only market data source for one exchange.
///
/// Implementations wrap an exchange REST or websocket client. All methods
/// take a normalized symbol ("BTC/USDT"); adapters convert to the venue's
/// native format internally.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Exchange identifier, lowercase (e.g., "binance").
    fn exchange_name(&self) -> &str;

    /// Fetches the current 24h ticker for `symbol`.
    async fn ticker(&self, symbol: &str) -> Result<Ticker, FetchError>;

    /// Fetches an L2 order book snapshot with up to `depth` levels per side.
    async fn order_book(&self, symbol: &str, depth: usize) -> Result<OrderBook, FetchError>;

    /// Fetches the most recent `count` candles at `interval_minutes`
    /// resolution, oldest first.
    async fn candles(
        &self,
        symbol: &str,
        interval_minutes: u32,
        count: usize,
    ) -> Result<Vec<Candle>, FetchError>;

    /// Returns the taker fee rate for the given side as a decimal ratio
    /// (e.g., `0.001` for 0.1%).
    async fn trading_fee(&self, symbol: &str, side: Side) -> Result<Decimal, FetchError>;
}
