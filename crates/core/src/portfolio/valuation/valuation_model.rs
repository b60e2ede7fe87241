//! Portfolio valuation domain models.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::{Error, Result};

/// Locked end-of-day snapshot of one client's portfolio.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioDailyValuation {
    pub id: i64,
    pub client_id: i64,
    pub valuation_date: NaiveDate,
    pub total_portfolio_value: Decimal,
    pub unrealized_profit_loss: Decimal,
    pub daily_change_percentage: Decimal,
    pub total_return_percentage: Decimal,
    pub initial_investment: Decimal,
    pub previous_day_value: Decimal,
    pub locked: bool,
    pub created_by: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewPortfolioDailyValuation {
    pub client_id: i64,
    pub valuation_date: NaiveDate,
    pub total_portfolio_value: Decimal,
    pub unrealized_profit_loss: Decimal,
    pub daily_change_percentage: Decimal,
    pub total_return_percentage: Decimal,
    pub initial_investment: Decimal,
    pub previous_day_value: Decimal,
    pub locked: bool,
    pub created_by: String,
}

/// Where a position's price came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceSource {
    OfficialClose,
    /// No close for the date; the stock's last known price was used
    CurrentPrice,
}

impl PriceSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceSource::OfficialClose => "OFFICIAL_CLOSE",
            PriceSource::CurrentPrice => "CURRENT_PRICE",
        }
    }
}

impl FromStr for PriceSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "OFFICIAL_CLOSE" => Ok(PriceSource::OfficialClose),
            "CURRENT_PRICE" => Ok(PriceSource::CurrentPrice),
            other => Err(Error::invalid(format!("Unknown price source: {}", other))),
        }
    }
}

/// One holding priced on a valuation date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PositionValuation {
    pub stock_id: i64,
    pub stock_code: String,
    pub account_id: i64,
    pub quantity: i64,
    pub avg_price: Decimal,
    pub cost: Decimal,
    pub close_price: Decimal,
    pub market_value: Decimal,
    pub unrealized_profit_loss: Decimal,
    pub change_percentage: Decimal,
    pub price_source: PriceSource,
}

/// Stored snapshot together with the positions it was computed from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClientValuation {
    pub valuation: PortfolioDailyValuation,
    pub positions: Vec<PositionValuation>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValuationRunSummary {
    pub date: Option<NaiveDate>,
    pub valued: usize,
    /// Clients that already had a locked row for the date
    pub skipped: usize,
    pub total_value: Decimal,
}
