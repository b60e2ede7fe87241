use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::clients::ClientType;
use crate::portfolio::valuation::PositionValuation;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionLine {
    #[serde(flatten)]
    pub position: PositionValuation,
    /// Share of the portfolio value, in percent
    pub weight: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioReport {
    pub client_id: i64,
    pub client_name: String,
    pub client_type: ClientType,
    pub date: NaiveDate,
    pub positions: Vec<PositionLine>,
    pub portfolio_value: Decimal,
    pub cost_basis: Decimal,
    pub unrealized_profit_loss: Decimal,
    pub cash_balance: Decimal,
    pub total_assets: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientValueLine {
    pub client_id: i64,
    pub client_name: String,
    pub portfolio_value: Decimal,
    pub unrealized_profit_loss: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryReport {
    pub date: NaiveDate,
    pub client_count: usize,
    pub total_assets_under_management: Decimal,
    pub total_unrealized_profit_loss: Decimal,
    pub top_clients: Vec<ClientValueLine>,
}
