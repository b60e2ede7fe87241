//! Portfolio and holding models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Container of a client's holdings. Exactly one per client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub id: i64,
    pub client_id: i64,
    pub created_at: NaiveDateTime,
}

/// Quantity of one stock held through one account.
///
/// Rows with zero quantity are deleted rather than stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioItem {
    pub id: i64,
    pub portfolio_id: i64,
    pub stock_id: i64,
    pub account_id: i64,
    pub quantity: i64,
    /// Quantity-weighted average buy price
    pub avg_price: Decimal,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl PortfolioItem {
    pub fn cost(&self) -> Decimal {
        self.avg_price * Decimal::from(self.quantity)
    }
}

/// Holding joined with its stock for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub item_id: i64,
    pub stock_id: i64,
    pub stock_code: String,
    pub stock_name: String,
    pub account_id: i64,
    pub quantity: i64,
    pub avg_price: Decimal,
    pub current_price: Decimal,
    pub market_value: Decimal,
}
