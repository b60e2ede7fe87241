//! Provider-agnostic feed records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::MarketDataError;

/// A listed instrument as described by the feed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockDefinition {
    pub code: String,
    pub name: String,
    pub exchange_code: Option<String>,
    pub sector: Option<String>,
    pub is_active: bool,
}

/// End-of-day OHLCV for one stock.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosingPrice {
    pub code: String,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
}

impl ClosingPrice {
    /// Builds a row where only the close is known.
    pub fn close_only(code: impl Into<String>, close: Decimal) -> Self {
        Self {
            code: code.into(),
            open: close,
            high: close,
            low: close,
            close,
            volume: Decimal::ZERO,
        }
    }

    /// Checks the OHLC shape of the row.
    pub fn validate(&self) -> Result<(), MarketDataError> {
        if self.code.trim().is_empty() {
            return Err(MarketDataError::ValidationFailed {
                message: "empty stock code".to_string(),
            });
        }
        if self.close <= Decimal::ZERO {
            return Err(MarketDataError::ValidationFailed {
                message: format!("non-positive close for {}", self.code),
            });
        }
        if self.low > self.high {
            return Err(MarketDataError::ValidationFailed {
                message: format!("low above high for {}", self.code),
            });
        }
        Ok(())
    }
}
