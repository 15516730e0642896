//! Concurrent per-exchange snapshot collection.

use std::time::Duration;

use arb_scout_core::config::{AssessmentConfig, MarketConfig};
use arb_scout_core::error::FetchError;
use arb_scout_core::traits::MarketDataProvider;
use arb_scout_core::types::{Candle, OrderBook, Side, Ticker};
use rust_decimal::Decimal;
use tokio::time::timeout;
use tracing::warn;

/// Everything one leg of an assessment needs from one exchange.
///
/// Each field is independently optional: a failed or timed-out fetch
/// leaves its slot empty and the pipeline degrades instead of erroring.
#[derive(Debug, Clone, Default)]
pub struct ExchangeSnapshot {
    /// 24h ticker, if the fetch succeeded.
    pub ticker: Option<Ticker>,
    /// L2 order book, if the fetch succeeded.
    pub order_book: Option<OrderBook>,
    /// Recent candles, empty on failure.
    pub candles: Vec<Candle>,
    /// Taker fee rate for this leg's side, if the fetch succeeded.
    pub fee_rate: Option<Decimal>,
}

impl ExchangeSnapshot {
    /// Fetches ticker, book, candles, and fee concurrently with a
    /// per-request deadline. Failures are logged and left empty.
    pub async fn collect(
        provider: &dyn MarketDataProvider,
        symbol: &str,
        side: Side,
        config: &AssessmentConfig,
        market: &MarketConfig,
        fetch_candles: bool,
    ) -> Self {
        let deadline = Duration::from_secs(config.fetch_timeout_secs);
        let exchange = provider.exchange_name().to_string();

        let (ticker, order_book, candles, fee_rate) = tokio::join!(
            bounded(deadline, &exchange, "ticker", provider.ticker(symbol)),
            bounded(
                deadline,
                &exchange,
                "order_book",
                provider.order_book(symbol, config.order_book_depth),
            ),
            async {
                if fetch_candles {
                    bounded(
                        deadline,
                        &exchange,
                        "candles",
                        provider.candles(symbol, market.candle_interval_minutes, market.candle_count),
                    )
                    .await
                } else {
                    None
                }
            },
            bounded(deadline, &exchange, "trading_fee", provider.trading_fee(symbol, side)),
        );

        Self {
            ticker,
            order_book,
            candles: candles.unwrap_or_default(),
            fee_rate,
        }
    }

    /// True when neither a ticker nor a book arrived; the leg carries no
    /// usable market data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ticker.is_none() && self.order_book.is_none()
    }
}

async fn bounded<T>(
    deadline: Duration,
    exchange: &str,
    what: &str,
    fut: impl std::future::Future<Output = Result<T, FetchError>>,
) -> Option<T> {
    match timeout(deadline, fut).await {
        Ok(Ok(value)) => Some(value),
        Ok(Err(err)) => {
            warn!(exchange, what, error = %err, "fetch failed");
            None
        }
        Err(_) => {
            warn!(exchange, what, timeout_secs = deadline.as_secs(), "fetch timed out");
            None
        }
    }
}
