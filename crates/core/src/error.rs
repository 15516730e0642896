//! Error types for the market data boundary.
//!
//! Scoring engines never return errors: bad or missing inputs degrade to
//! documented fallback values. [`FetchError`] exists only at the provider
//! boundary, where network and exchange failures are genuinely fallible.

use thiserror::Error;

/// Failure while fetching market data from an exchange.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network or transport failure.
    #[error("network error talking to {exchange}: {message}")]
    Network {
        /// Exchange identifier.
        exchange: String,
        /// Underlying error description.
        message: String,
    },

    /// The exchange does not list the requested symbol.
    #[error("symbol {symbol} not available on {exchange}")]
    SymbolNotFound {
        /// Exchange identifier.
        exchange: String,
        /// Requested symbol.
        symbol: String,
    },

    /// The exchange responded with data that could not be interpreted.
    #[error("malformed response from {exchange}: {message}")]
    MalformedResponse {
        /// Exchange identifier.
        exchange: String,
        /// What was wrong with the payload.
        message: String,
    },

    /// The request exceeded its deadline.
    #[error("request to {exchange} timed out after {timeout_secs}s")]
    Timeout {
        /// Exchange identifier.
        exchange: String,
        /// Deadline that was exceeded.
        timeout_secs: u64,
    },

    /// The exchange throttled the request.
    #[error("rate limited by {exchange}")]
    RateLimited {
        /// Exchange identifier.
        exchange: String,
    },
}

impl FetchError {
    /// Exchange the failure came from.
    #[must_use]
    pub fn exchange(&self) -> &str {
        match self {
            Self::Network { exchange, .. }
            | Self::SymbolNotFound { exchange, .. }
            | Self::MalformedResponse { exchange, .. }
            | Self::Timeout { exchange, .. }
            | Self::RateLimited { exchange } => exchange,
        }
    }

    /// True when retrying the same request could plausibly succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::Timeout { .. } | Self::RateLimited { .. }
        )
    }
}
