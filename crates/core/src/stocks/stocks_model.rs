//! Stock and daily price models.

use backoffice_market_data::{ClosingPrice, StockDefinition};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::decimal_utils::percent_change;
use crate::{Error, Result};

/// Listed instrument that orders can be placed on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stock {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub sector: Option<String>,
    pub exchange_code: Option<String>,
    /// Last known price; refreshed from official closes
    pub current_price: Decimal,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStock {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub exchange_code: Option<String>,
    #[serde(default)]
    pub current_price: Decimal,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl NewStock {
    pub fn validate(&self) -> Result<()> {
        if self.code.trim().is_empty() {
            return Err(Error::invalid("Stock code cannot be empty"));
        }
        if self.name.trim().is_empty() {
            return Err(Error::invalid("Stock name cannot be empty"));
        }
        if self.current_price < Decimal::ZERO {
            return Err(Error::invalid("Stock price cannot be negative"));
        }
        Ok(())
    }
}

impl From<StockDefinition> for NewStock {
    fn from(def: StockDefinition) -> Self {
        NewStock {
            code: def.code.trim().to_uppercase(),
            name: def.name.trim().to_string(),
            sector: def.sector,
            exchange_code: def.exchange_code,
            current_price: Decimal::ZERO,
            is_active: def.is_active,
        }
    }
}

/// Daily OHLC row for one stock. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockDailyPrice {
    pub id: i64,
    pub stock_id: i64,
    pub price_date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
    pub change_percentage: Decimal,
    pub official_close: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStockDailyPrice {
    pub stock_id: i64,
    pub price_date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
    pub change_percentage: Decimal,
    pub official_close: bool,
}

impl NewStockDailyPrice {
    /// Official close row for `stock_id` built from a feed price.
    pub fn official(stock_id: i64, price_date: NaiveDate, price: &ClosingPrice) -> Self {
        NewStockDailyPrice {
            stock_id,
            price_date,
            open: price.open,
            high: price.high,
            low: price.low,
            close: price.close,
            volume: price.volume,
            change_percentage: percent_change(price.open, price.close),
            official_close: true,
        }
    }
}

/// Result of one closing-price fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceFetchOutcome {
    pub date: NaiveDate,
    pub provider: String,
    /// Rows returned by the feed
    pub fetched: usize,
    /// Rows written; existing rows for the date are kept
    pub saved: usize,
    /// Feed codes with no matching stock
    pub unknown_codes: Vec<String>,
}
