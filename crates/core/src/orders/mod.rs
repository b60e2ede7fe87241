//! Orders module - pricing, previews, execution and cancellation.

mod ledger;
mod order_calculator;
mod order_validator;
mod orders_model;
mod orders_service;
mod orders_traits;
mod preview_cache;

#[cfg(test)]
mod ledger_tests;



pub use ledger::{plan_cancellation, plan_execution, HoldingChange, LedgerPlan};
pub use order_calculator::calculate_order;
pub use order_validator::{
    check_account, check_funds, check_holdings, check_market_hours, check_stock_active,
    validate_request,
};
pub use orders_model::{
    ExecutionType, NewTradeOrder, OrderCalculation, OrderExecutionResult, OrderFilter,
    OrderPreview, OrderRequest, OrderStatus, OrderType, SettlementStatus, SettlementTransition,
    TradeOrder,
};
pub use orders_service::{generate_order_number, OrderService, OrderServiceConfig};
pub use orders_traits::{OrderServiceTrait, TradeOrderRepositoryTrait};
pub use preview_cache::{PreviewCache, PreviewCacheConfig, PreviewStore};
