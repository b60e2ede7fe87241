//! Database model for trade orders.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use backoffice_core::orders::{NewTradeOrder, OrderStatus, SettlementStatus, TradeOrder};

use crate::errors::StorageError;
use rust_decimal::Decimal;

use crate::utils::{decimal_to_text, parse_decimal, parse_enum, parse_optional_decimal};

#[derive(Queryable, Identifiable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::trade_orders)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TradeOrderDB {
    pub id: i64,
    pub order_number: String,
    pub client_id: i64,
    pub account_id: i64,
    pub stock_id: i64,
    pub order_type: String,
    pub execution_type: String,
    pub price: String,
    pub quantity: i64,
    pub total_amount: String,
    pub commission: String,
    pub bsmv: String,
    pub net_amount: String,
    pub status: String,
    pub settlement_status: String,
    pub trade_date: NaiveDate,
    pub settlement_date: NaiveDate,
    pub submitted_at: NaiveDateTime,
    pub executed_at: Option<NaiveDateTime>,
    pub settled_at: Option<NaiveDateTime>,
    pub portfolio_updated: bool,
    pub created_by: String,
    pub updated_by: Option<String>,
    pub avg_price_before: Option<String>,
    pub avg_price_after: Option<String>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::trade_orders)]
pub struct NewTradeOrderDB {
    pub order_number: String,
    pub client_id: i64,
    pub account_id: i64,
    pub stock_id: i64,
    pub order_type: String,
    pub execution_type: String,
    pub price: String,
    pub quantity: i64,
    pub total_amount: String,
    pub commission: String,
    pub bsmv: String,
    pub net_amount: String,
    pub status: String,
    pub settlement_status: String,
    pub trade_date: NaiveDate,
    pub settlement_date: NaiveDate,
    pub submitted_at: NaiveDateTime,
    pub executed_at: Option<NaiveDateTime>,
    pub portfolio_updated: bool,
    pub created_by: String,
    pub avg_price_before: Option<String>,
    pub avg_price_after: Option<String>,
}

impl TryFrom<TradeOrderDB> for TradeOrder {
    type Error = StorageError;

    fn try_from(db: TradeOrderDB) -> Result<Self, Self::Error> {
        Ok(TradeOrder {
            id: db.id,
            order_number: db.order_number,
            client_id: db.client_id,
            account_id: db.account_id,
            stock_id: db.stock_id,
            order_type: parse_enum(&db.order_type, "trade_orders.order_type")?,
            execution_type: parse_enum(&db.execution_type, "trade_orders.execution_type")?,
            price: parse_decimal(&db.price, "trade_orders.price")?,
            quantity: db.quantity,
            total_amount: parse_decimal(&db.total_amount, "trade_orders.total_amount")?,
            commission: parse_decimal(&db.commission, "trade_orders.commission")?,
            bsmv: parse_decimal(&db.bsmv, "trade_orders.bsmv")?,
            net_amount: parse_decimal(&db.net_amount, "trade_orders.net_amount")?,
            status: parse_enum(&db.status, "trade_orders.status")?,
            settlement_status: parse_enum(&db.settlement_status, "trade_orders.settlement_status")?,
            trade_date: db.trade_date,
            settlement_date: db.settlement_date,
            submitted_at: db.submitted_at,
            executed_at: db.executed_at,
            settled_at: db.settled_at,
            portfolio_updated: db.portfolio_updated,
            created_by: db.created_by,
            updated_by: db.updated_by,
            avg_price_before: parse_optional_decimal(
                db.avg_price_before.as_deref(),
                "trade_orders.avg_price_before",
            )?,
            avg_price_after: parse_optional_decimal(
                db.avg_price_after.as_deref(),
                "trade_orders.avg_price_after",
            )?,
        })
    }
}

impl NewTradeOrderDB {
    /// Row for an executed order, written as EXECUTED / PENDING together
    /// with the holding's average price around the trade.
    pub fn from_execution(
        domain: NewTradeOrder,
        avg_price_before: Option<Decimal>,
        avg_price_after: Option<Decimal>,
    ) -> Self {
        Self {
            order_number: domain.order_number,
            client_id: domain.client_id,
            account_id: domain.account_id,
            stock_id: domain.stock_id,
            order_type: domain.order_type.as_str().to_string(),
            execution_type: domain.execution_type.as_str().to_string(),
            price: decimal_to_text(domain.price),
            quantity: domain.quantity,
            total_amount: decimal_to_text(domain.total_amount),
            commission: decimal_to_text(domain.commission),
            bsmv: decimal_to_text(domain.bsmv),
            net_amount: decimal_to_text(domain.net_amount),
            status: OrderStatus::Executed.as_str().to_string(),
            settlement_status: SettlementStatus::Pending.as_str().to_string(),
            trade_date: domain.trade_date,
            settlement_date: domain.settlement_date,
            submitted_at: domain.submitted_at,
            executed_at: Some(domain.executed_at),
            portfolio_updated: false,
            created_by: domain.created_by,
            avg_price_before: avg_price_before.map(decimal_to_text),
            avg_price_after: avg_price_after.map(decimal_to_text),
        }
    }
}
