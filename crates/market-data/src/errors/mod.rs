//! Error types for the market data crate.

use thiserror::Error;

/// Errors that can occur while talking to an upstream stock data provider.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The provider has no data for the symbol.
    /// Providers signal this with sentinel payloads rather than a 404.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The request parameters were rejected before reaching the provider.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The provider rate limited the request (HTTP 429, or 403 on quota exhaustion).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// Transport failure, non-2xx status or malformed body.
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },
}

impl MarketDataError {
    /// True when the provider answered but has nothing for the symbol.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::SymbolNotFound(_))
    }

    pub(crate) fn provider(provider: &str, message: impl Into<String>) -> Self {
        Self::ProviderError {
            provider: provider.to_string(),
            message: message.into(),
        }
    }
}
