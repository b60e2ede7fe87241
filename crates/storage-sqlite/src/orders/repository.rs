use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use log::{debug, info};
use std::sync::Arc;

use super::model::{NewTradeOrderDB, TradeOrderDB};
use crate::accounts::{load_account, write_balances};
use crate::db::{get_connection, WriteHandle};
use crate::errors::IntoCore;
use crate::portfolio::{apply_holding_change, find_item, portfolio_id_for};
use crate::schema::trade_orders;
use backoffice_core::errors::{ConflictError, Error, Result};
use backoffice_core::orders::{
    plan_cancellation, plan_execution, NewTradeOrder, OrderExecutionResult, OrderFilter,
    OrderStatus, SettlementStatus, SettlementTransition, TradeOrder, TradeOrderRepositoryTrait,
};

/// Repository for trade orders.
///
/// Execution and cancellation touch three tables; each runs as a single
/// write job so the account, the holding and the order row move together.
pub struct TradeOrderRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl TradeOrderRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }
}

fn load_order(conn: &mut SqliteConnection, order_id: i64) -> Result<TradeOrder> {
    let row = trade_orders::table
        .find(order_id)
        .select(TradeOrderDB::as_select())
        .first::<TradeOrderDB>(conn)
        .optional()
        .into_core()?
        .ok_or_else(|| Error::not_found("order", order_id))?;
    Ok(TradeOrder::try_from(row)?)
}

fn to_orders(rows: Vec<TradeOrderDB>) -> Result<Vec<TradeOrder>> {
    rows.into_iter()
        .map(|r| TradeOrder::try_from(r).map_err(Error::from))
        .collect()
}

impl TradeOrderRepositoryTrait for TradeOrderRepository {
    fn commit_execution(
        &self,
        new_order: NewTradeOrder,
        portfolio_id: i64,
    ) -> Result<OrderExecutionResult> {
        self.writer.exec(move |conn| {
            let account = load_account(conn, new_order.account_id)?;
            let holding = find_item(conn, portfolio_id, new_order.stock_id, account.id)?;

            let plan = plan_execution(
                new_order.order_type,
                &new_order.calculation(),
                &account,
                holding.as_ref(),
            )?;

            let updated = write_balances(conn, account.id, plan.balances)?;
            apply_holding_change(
                conn,
                &plan.holding,
                portfolio_id,
                new_order.stock_id,
                account.id,
            )?;

            let row_values = NewTradeOrderDB::from_execution(
                new_order,
                holding.as_ref().map(|h| h.avg_price),
                plan.holding.avg_price_after(),
            );
            let row = diesel::insert_into(trade_orders::table)
                .values(row_values)
                .returning(TradeOrderDB::as_returning())
                .get_result::<TradeOrderDB>(conn)
                .into_core()?;
            let order = TradeOrder::try_from(row)?;
            debug!(
                "Committed {} order {} on account {}",
                order.order_type, order.order_number, account.account_number
            );

            Ok(OrderExecutionResult {
                order,
                balance_after: updated.balance,
                available_balance_after: updated.available_balance,
                holding_quantity_after: plan.holding.quantity_after(),
            })
        })
    }

    fn commit_cancellation(&self, order_id: i64, acting_user: &str) -> Result<TradeOrder> {
        let acting_user = acting_user.to_string();
        self.writer.exec(move |conn| {
            let order = load_order(conn, order_id)?;
            let account = load_account(conn, order.account_id)?;
            let portfolio_id = portfolio_id_for(conn, order.client_id)?;
            let holding = find_item(conn, portfolio_id, order.stock_id, order.account_id)?;

            let plan = plan_cancellation(&order, &account, holding.as_ref())?;
            write_balances(conn, account.id, plan.balances)?;
            apply_holding_change(
                conn,
                &plan.holding,
                portfolio_id,
                order.stock_id,
                order.account_id,
            )?;

            let moved = diesel::update(
                trade_orders::table
                    .find(order_id)
                    .filter(trade_orders::settlement_status.eq(SettlementStatus::Pending.as_str())),
            )
            .set((
                trade_orders::status.eq(OrderStatus::Cancelled.as_str()),
                trade_orders::settlement_status.eq(SettlementStatus::Cancelled.as_str()),
                trade_orders::updated_by.eq(Some(acting_user.as_str())),
            ))
            .execute(conn)
            .into_core()?;
            if moved == 0 {
                return Err(ConflictError::IllegalTransition {
                    order_id,
                    from: order.settlement_status.to_string(),
                    to: SettlementStatus::Cancelled.to_string(),
                }
                .into());
            }

            info!("Cancelled order {} by {}", order.order_number, acting_user);
            load_order(conn, order_id)
        })
    }

    fn get_by_id(&self, order_id: i64) -> Result<TradeOrder> {
        let mut conn = get_connection(&self.pool)?;
        load_order(&mut conn, order_id)
    }

    fn list(&self, filter: &OrderFilter) -> Result<Vec<TradeOrder>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = trade_orders::table.into_boxed();
        if let Some(client) = filter.client_id {
            query = query.filter(trade_orders::client_id.eq(client));
        }
        if let Some(status) = filter.status {
            query = query.filter(trade_orders::status.eq(status.as_str()));
        }
        if let Some(settlement) = filter.settlement_status {
            query = query.filter(trade_orders::settlement_status.eq(settlement.as_str()));
        }
        let rows = query
            .select(TradeOrderDB::as_select())
            .order(trade_orders::id.desc())
            .load::<TradeOrderDB>(&mut conn)
            .into_core()?;
        to_orders(rows)
    }

    fn list_executed_in(&self, status: SettlementStatus) -> Result<Vec<TradeOrder>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = trade_orders::table
            .filter(trade_orders::status.eq(OrderStatus::Executed.as_str()))
            .filter(trade_orders::settlement_status.eq(status.as_str()))
            .order((trade_orders::trade_date.asc(), trade_orders::id.asc()))
            .select(TradeOrderDB::as_select())
            .load::<TradeOrderDB>(&mut conn)
            .into_core()?;
        to_orders(rows)
    }

    fn apply_transitions(&self, transitions: Vec<SettlementTransition>) -> Result<usize> {
        if transitions.is_empty() {
            return Ok(0);
        }
        self.writer.exec(move |conn| {
            let mut moved = 0;
            for t in &transitions {
                let target = trade_orders::table
                    .find(t.order_id)
                    .filter(trade_orders::settlement_status.eq(t.from.as_str()));
                let changed = match t.settled_at {
                    Some(settled) => diesel::update(target)
                        .set((
                            trade_orders::settlement_status.eq(t.to.as_str()),
                            trade_orders::status.eq(t.order_status.as_str()),
                            trade_orders::portfolio_updated.eq(t.portfolio_updated),
                            trade_orders::settled_at.eq(Some(settled)),
                        ))
                        .execute(conn),
                    None => diesel::update(target)
                        .set((
                            trade_orders::settlement_status.eq(t.to.as_str()),
                            trade_orders::status.eq(t.order_status.as_str()),
                            trade_orders::portfolio_updated.eq(t.portfolio_updated),
                        ))
                        .execute(conn),
                }
                .into_core()?;
                moved += changed;
            }
            debug!("Applied {} of {} settlement transitions", moved, transitions.len());
            Ok(moved)
        })
    }
}
