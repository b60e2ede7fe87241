//! Trade order repository and service traits.

use super::orders_model::{
    NewTradeOrder, OrderExecutionResult, OrderFilter, OrderPreview, OrderRequest,
    SettlementStatus, SettlementTransition, TradeOrder,
};
use crate::errors::Result;

/// Persistence contract for trade orders.
///
/// The two `commit_*` methods are the only writers of account balances and
/// portfolio items on the trading path. Each runs as one write transaction
/// that re-reads the account and holding, plans the effect with
/// [`crate::orders::plan_execution`] or [`crate::orders::plan_cancellation`],
/// and writes everything or nothing.
pub trait TradeOrderRepositoryTrait: Send + Sync {
    /// Applies the order's cash and holding effects and inserts the order
    /// as EXECUTED / PENDING.
    fn commit_execution(
        &self,
        new_order: NewTradeOrder,
        portfolio_id: i64,
    ) -> Result<OrderExecutionResult>;

    /// Reverses the order's effects and marks it CANCELLED / CANCELLED.
    fn commit_cancellation(&self, order_id: i64, acting_user: &str) -> Result<TradeOrder>;

    fn get_by_id(&self, order_id: i64) -> Result<TradeOrder>;

    /// Orders matching the filter, newest first.
    fn list(&self, filter: &OrderFilter) -> Result<Vec<TradeOrder>>;

    /// EXECUTED orders currently in `status`, oldest trade date first.
    fn list_executed_in(&self, status: SettlementStatus) -> Result<Vec<TradeOrder>>;

    /// Applies guarded transitions in one transaction and returns how many
    /// rows actually moved.
    fn apply_transitions(&self, transitions: Vec<SettlementTransition>) -> Result<usize>;
}

pub trait OrderServiceTrait: Send + Sync {
    fn preview_buy(&self, request: OrderRequest) -> Result<OrderPreview>;

    fn preview_sell(&self, request: OrderRequest) -> Result<OrderPreview>;

    fn execute_buy(&self, preview_id: &str, acting_user: &str) -> Result<OrderExecutionResult>;

    fn execute_sell(&self, preview_id: &str, acting_user: &str) -> Result<OrderExecutionResult>;

    fn cancel_order(&self, order_id: i64, acting_user: &str) -> Result<TradeOrder>;

    fn get_order(&self, order_id: i64) -> Result<TradeOrder>;

    fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<TradeOrder>>;
}
