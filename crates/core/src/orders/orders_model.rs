//! Trade order domain models.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    Buy,
    Sell,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Buy => "BUY",
            OrderType::Sell => "SELL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionType {
    /// Priced at the stock's current price
    Market,
    /// Priced at the request's limit price
    Limit,
}

impl ExecutionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionType::Market => "MARKET",
            ExecutionType::Limit => "LIMIT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Executed,
    Settled,
    Cancelled,
    Rejected,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Executed => "EXECUTED",
            OrderStatus::Settled => "SETTLED",
            OrderStatus::Cancelled => "CANCELLED",
            OrderStatus::Rejected => "REJECTED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Settled | OrderStatus::Cancelled | OrderStatus::Rejected
        )
    }
}

/// Clearing progress of an executed order.
///
/// Moves forward one step at a time; `Cancelled` is reachable from any
/// non-terminal state and never left again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SettlementStatus {
    Pending,
    T1,
    T2,
    Completed,
    Cancelled,
}

impl SettlementStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettlementStatus::Pending => "PENDING",
            SettlementStatus::T1 => "T1",
            SettlementStatus::T2 => "T2",
            SettlementStatus::Completed => "COMPLETED",
            SettlementStatus::Cancelled => "CANCELLED",
        }
    }

    /// Next forward state, `None` once terminal.
    pub fn next(&self) -> Option<SettlementStatus> {
        match self {
            SettlementStatus::Pending => Some(SettlementStatus::T1),
            SettlementStatus::T1 => Some(SettlementStatus::T2),
            SettlementStatus::T2 => Some(SettlementStatus::Completed),
            SettlementStatus::Completed | SettlementStatus::Cancelled => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SettlementStatus::Completed | SettlementStatus::Cancelled)
    }

    pub fn can_transition_to(&self, to: SettlementStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        to == SettlementStatus::Cancelled || self.next() == Some(to)
    }
}

macro_rules! impl_str_enum {
    ($ty:ident { $($variant:ident),+ $(,)? }) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                $(
                    if s == $ty::$variant.as_str() {
                        return Ok($ty::$variant);
                    }
                )+
                Err(Error::invalid(format!(
                    concat!("Unknown ", stringify!($ty), ": {}"),
                    s
                )))
            }
        }
    };
}

impl_str_enum!(OrderType { Buy, Sell });
impl_str_enum!(ExecutionType { Market, Limit });
impl_str_enum!(OrderStatus { Pending, Executed, Settled, Cancelled, Rejected });
impl_str_enum!(SettlementStatus { Pending, T1, T2, Completed, Cancelled });

/// An executed buy or sell instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeOrder {
    pub id: i64,
    pub order_number: String,
    pub client_id: i64,
    pub account_id: i64,
    pub stock_id: i64,
    pub order_type: OrderType,
    pub execution_type: ExecutionType,
    pub price: Decimal,
    pub quantity: i64,
    pub total_amount: Decimal,
    pub commission: Decimal,
    pub bsmv: Decimal,
    pub net_amount: Decimal,
    pub status: OrderStatus,
    pub settlement_status: SettlementStatus,
    /// Simulation date at execution
    pub trade_date: NaiveDate,
    /// Trade date plus the settlement cycle, the day the order reaches T2.
    /// It is marked COMPLETED by the next business day's batch.
    pub settlement_date: NaiveDate,
    pub submitted_at: NaiveDateTime,
    pub executed_at: Option<NaiveDateTime>,
    pub settled_at: Option<NaiveDateTime>,
    pub portfolio_updated: bool,
    pub created_by: String,
    pub updated_by: Option<String>,
    /// Average price of the holding row before this order, `None` when
    /// the order opened the row
    pub avg_price_before: Option<Decimal>,
    /// Average price the order left on the holding, `None` when it closed
    /// the row
    pub avg_price_after: Option<Decimal>,
}

impl TradeOrder {
    /// Commission plus BSMV.
    pub fn tax_and_commission(&self) -> Decimal {
        self.commission + self.bsmv
    }

    /// Cash that left the account for a buy.
    pub fn total_debit(&self) -> Decimal {
        self.total_amount + self.tax_and_commission()
    }

    pub fn is_cancellable(&self) -> bool {
        self.settlement_status == SettlementStatus::Pending
            && matches!(self.status, OrderStatus::Executed | OrderStatus::Pending)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTradeOrder {
    pub order_number: String,
    pub client_id: i64,
    pub account_id: i64,
    pub stock_id: i64,
    pub order_type: OrderType,
    pub execution_type: ExecutionType,
    pub price: Decimal,
    pub quantity: i64,
    pub total_amount: Decimal,
    pub commission: Decimal,
    pub bsmv: Decimal,
    pub net_amount: Decimal,
    pub trade_date: NaiveDate,
    pub settlement_date: NaiveDate,
    pub submitted_at: NaiveDateTime,
    pub executed_at: NaiveDateTime,
    pub created_by: String,
}

impl NewTradeOrder {
    /// Priced view of the order as handed to the ledger planner.
    pub fn calculation(&self) -> OrderCalculation {
        let total_tax_and_commission = self.commission + self.bsmv;
        OrderCalculation {
            stock_id: self.stock_id,
            stock_code: String::new(),
            execution_type: self.execution_type,
            price: self.price,
            quantity: self.quantity,
            commission_rate: Decimal::ZERO,
            total_amount: self.total_amount,
            commission: self.commission,
            bsmv: self.bsmv,
            total_tax_and_commission,
            net_amount: self.net_amount,
            total_debit: self.total_amount + total_tax_and_commission,
        }
    }
}

/// Caller input for a buy or sell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub client_id: i64,
    pub account_id: i64,
    pub stock_id: i64,
    pub quantity: i64,
    #[serde(default)]
    pub execution_type: Option<ExecutionType>,
    /// Limit price; must be absent for market orders
    #[serde(default)]
    pub price: Option<Decimal>,
}

/// Priced order, amounts rounded to cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCalculation {
    pub stock_id: i64,
    pub stock_code: String,
    pub execution_type: ExecutionType,
    pub price: Decimal,
    pub quantity: i64,
    pub commission_rate: Decimal,
    pub total_amount: Decimal,
    pub commission: Decimal,
    pub bsmv: Decimal,
    pub total_tax_and_commission: Decimal,
    pub net_amount: Decimal,
    /// Cash needed for a buy: total amount plus tax and commission
    pub total_debit: Decimal,
}

/// Staged, priced order awaiting confirmation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPreview {
    pub preview_id: String,
    pub order_type: OrderType,
    pub request: OrderRequest,
    pub calculation: OrderCalculation,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderExecutionResult {
    pub order: TradeOrder,
    pub balance_after: Decimal,
    pub available_balance_after: Decimal,
    /// Quantity of the stock held through the account after the commit
    pub holding_quantity_after: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderFilter {
    #[serde(default)]
    pub client_id: Option<i64>,
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub settlement_status: Option<SettlementStatus>,
}

/// Guarded settlement move for one order.
///
/// Applied as `UPDATE ... WHERE settlement_status = from`, so an order that
/// moved in the meantime is left alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementTransition {
    pub order_id: i64,
    pub from: SettlementStatus,
    pub to: SettlementStatus,
    pub order_status: OrderStatus,
    pub settled_at: Option<NaiveDateTime>,
    pub portfolio_updated: bool,
}
