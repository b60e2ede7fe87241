//! Error types and retry classification for the market data crate.

mod retry;

pub use retry::RetryClass;

use thiserror::Error;

/// Errors that can occur while talking to a price feed.
///
/// Each variant is classified into a [`RetryClass`] via
/// [`retry_class`](Self::retry_class). The core never retries on its own;
/// the classification is surfaced so that schedulers can decide.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The feed answered but reported a failure in its envelope.
    #[error("Provider error: {provider} - {message}")]
    ProviderError { provider: String, message: String },

    /// The feed returned a non-success HTTP status.
    #[error("HTTP {status} from {provider}")]
    HttpStatus { provider: String, status: u16 },

    /// The feed rate limited the request (HTTP 429).
    #[error("Rate limited: {provider}")]
    RateLimited { provider: String },

    /// The request timed out.
    #[error("Timeout: {provider}")]
    Timeout { provider: String },

    /// The body could not be decoded.
    #[error("Malformed response from {provider}: {message}")]
    MalformedResponse { provider: String, message: String },

    /// The feed had nothing for the requested date.
    #[error("No data for {0}")]
    NoData(String),

    /// A row failed validation (e.g. non-positive close).
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Returns the retry classification for this error.
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::NoData(_)
            | Self::ValidationFailed { .. }
            | Self::MalformedResponse { .. }
            | Self::ProviderError { .. } => RetryClass::Never,

            Self::RateLimited { .. } | Self::Timeout { .. } | Self::Network(_) => {
                RetryClass::WithBackoff
            }

            Self::HttpStatus { status, .. } if *status >= 500 => RetryClass::WithBackoff,
            Self::HttpStatus { .. } => RetryClass::Never,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_data_never_retries() {
        let error = MarketDataError::NoData("2024-03-01".to_string());
        assert_eq!(error.retry_class(), RetryClass::Never);
    }

    #[test]
    fn test_malformed_response_never_retries() {
        let error = MarketDataError::MalformedResponse {
            provider: "INFINA".to_string(),
            message: "expected value at line 1".to_string(),
        };
        assert_eq!(error.retry_class(), RetryClass::Never);
    }

    #[test]
    fn test_rate_limited_retries_with_backoff() {
        let error = MarketDataError::RateLimited {
            provider: "INFINA".to_string(),
        };
        assert_eq!(error.retry_class(), RetryClass::WithBackoff);
    }

    #[test]
    fn test_server_error_retries_with_backoff() {
        let error = MarketDataError::HttpStatus {
            provider: "INFINA".to_string(),
            status: 503,
        };
        assert_eq!(error.retry_class(), RetryClass::WithBackoff);
    }

    #[test]
    fn test_client_error_never_retries() {
        let error = MarketDataError::HttpStatus {
            provider: "INFINA".to_string(),
            status: 401,
        };
        assert_eq!(error.retry_class(), RetryClass::Never);
    }
}
