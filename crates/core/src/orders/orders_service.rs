use chrono::NaiveDate;
use log::{debug, info, warn};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::order_calculator::calculate_order;
use super::order_validator::{
    check_account, check_funds, check_holdings, check_market_hours, check_stock_active,
    validate_request,
};
use super::orders_model::{
    NewTradeOrder, OrderCalculation, OrderExecutionResult, OrderFilter, OrderPreview,
    OrderRequest, OrderType, TradeOrder,
};
use super::orders_traits::{OrderServiceTrait, TradeOrderRepositoryTrait};
use super::preview_cache::PreviewStore;
use crate::accounts::{Account, AccountRepositoryTrait};
use crate::clients::{Client, ClientRepositoryTrait};
use crate::constants::SETTLEMENT_CYCLE_DAYS;
use crate::errors::Result;
use crate::portfolio::PortfolioRepositoryTrait;
use crate::simulation::SimulationServiceTrait;
use crate::stocks::{Stock, StockRepositoryTrait};
use crate::utils::time_utils::{add_business_days, Clock};
use crate::Error;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderServiceConfig {
    /// Reject previews and executions outside trading hours
    pub enforce_market_hours: bool,
}

/// Order number such as `ORD20240304K3F9QZ`.
pub fn generate_order_number(trade_date: NaiveDate) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(|b| char::from(b).to_ascii_uppercase())
        .collect();
    format!("ORD{}{}", trade_date.format("%Y%m%d"), suffix)
}

/// Preview, execution and cancellation of buy and sell orders.
pub struct OrderService {
    order_repository: Arc<dyn TradeOrderRepositoryTrait>,
    client_repository: Arc<dyn ClientRepositoryTrait>,
    account_repository: Arc<dyn AccountRepositoryTrait>,
    stock_repository: Arc<dyn StockRepositoryTrait>,
    portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
    simulation: Arc<dyn SimulationServiceTrait>,
    previews: Arc<dyn PreviewStore>,
    clock: Arc<dyn Clock>,
    config: OrderServiceConfig,
}

/// Entities an order request refers to, loaded and checked.
struct OrderContext {
    client: Client,
    account: Account,
    stock: Stock,
}

impl OrderService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        order_repository: Arc<dyn TradeOrderRepositoryTrait>,
        client_repository: Arc<dyn ClientRepositoryTrait>,
        account_repository: Arc<dyn AccountRepositoryTrait>,
        stock_repository: Arc<dyn StockRepositoryTrait>,
        portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
        simulation: Arc<dyn SimulationServiceTrait>,
        previews: Arc<dyn PreviewStore>,
        clock: Arc<dyn Clock>,
        config: OrderServiceConfig,
    ) -> Self {
        Self {
            order_repository,
            client_repository,
            account_repository,
            stock_repository,
            portfolio_repository,
            simulation,
            previews,
            clock,
            config,
        }
    }

    fn check_trading_window(&self) -> Result<()> {
        if self.config.enforce_market_hours {
            check_market_hours(self.clock.as_ref())?;
        }
        Ok(())
    }

    fn load_context(&self, request: &OrderRequest) -> Result<OrderContext> {
        let client = self.client_repository.get_by_id(request.client_id)?;
        if !client.is_active {
            return Err(Error::invalid(format!("Client {} is not active", client.id)));
        }
        let account = self.account_repository.get_by_id(request.account_id)?;
        check_account(&account, client.id)?;
        let stock = self.stock_repository.get_by_id(request.stock_id)?;
        check_stock_active(&stock)?;
        Ok(OrderContext {
            client,
            account,
            stock,
        })
    }

    fn held_quantity(&self, request: &OrderRequest) -> Result<i64> {
        let portfolio = self.portfolio_repository.get_by_client(request.client_id)?;
        Ok(self
            .portfolio_repository
            .find_item(portfolio.id, request.stock_id, request.account_id)?
            .map_or(0, |item| item.quantity))
    }

    fn preview(&self, order_type: OrderType, request: OrderRequest) -> Result<OrderPreview> {
        validate_request(&request)?;
        self.check_trading_window()?;

        let ctx = self.load_context(&request)?;
        let calculation = calculate_order(ctx.client.client_type, &ctx.stock, &request)?;

        // Advisory; execution re-checks inside its transaction.
        match order_type {
            OrderType::Buy => check_funds(calculation.total_debit, ctx.account.available_balance)?,
            OrderType::Sell => check_holdings(request.quantity, self.held_quantity(&request)?)?,
        }

        let preview = self.previews.cache(order_type, request, calculation);
        debug!(
            "{} preview {} for {} x {} expires at {}",
            order_type,
            preview.preview_id,
            preview.calculation.quantity,
            preview.calculation.stock_code,
            preview.expires_at
        );
        Ok(preview)
    }

    fn execute(
        &self,
        order_type: OrderType,
        preview_id: &str,
        acting_user: &str,
    ) -> Result<OrderExecutionResult> {
        let preview = self.previews.consume(preview_id, order_type)?;
        if !self.previews.remove(preview_id) {
            // Lost the claim to a concurrent execution.
            return Err(Error::not_found("preview", preview_id));
        }

        match self.commit(order_type, &preview, acting_user) {
            Ok(result) => Ok(result),
            Err(e) => {
                warn!("{} execution of preview {} failed: {}", order_type, preview_id, e);
                self.previews.restore(preview);
                Err(e)
            }
        }
    }

    fn commit(
        &self,
        order_type: OrderType,
        preview: &OrderPreview,
        acting_user: &str,
    ) -> Result<OrderExecutionResult> {
        self.check_trading_window()?;

        let ctx = self.load_context(&preview.request)?;
        let calculation = calculate_order(ctx.client.client_type, &ctx.stock, &preview.request)?;
        if calculation.price != preview.calculation.price {
            debug!(
                "Preview {} re-priced from {} to {}",
                preview.preview_id, preview.calculation.price, calculation.price
            );
        }

        let portfolio = self.portfolio_repository.get_by_client(ctx.client.id)?;
        let trade_date = self.simulation.current_date()?;
        let new_order = self.build_order(order_type, preview, &calculation, trade_date, acting_user);
        let result = self
            .order_repository
            .commit_execution(new_order, portfolio.id)?;

        info!(
            "Executed {} {} x {} @ {} for client {} (order {}, balance {})",
            order_type,
            result.order.quantity,
            calculation.stock_code,
            result.order.price,
            result.order.client_id,
            result.order.order_number,
            result.balance_after
        );
        Ok(result)
    }

    fn build_order(
        &self,
        order_type: OrderType,
        preview: &OrderPreview,
        calculation: &OrderCalculation,
        trade_date: NaiveDate,
        acting_user: &str,
    ) -> NewTradeOrder {
        NewTradeOrder {
            order_number: generate_order_number(trade_date),
            client_id: preview.request.client_id,
            account_id: preview.request.account_id,
            stock_id: calculation.stock_id,
            order_type,
            execution_type: calculation.execution_type,
            price: calculation.price,
            quantity: calculation.quantity,
            total_amount: calculation.total_amount,
            commission: calculation.commission,
            bsmv: calculation.bsmv,
            net_amount: calculation.net_amount,
            trade_date,
            settlement_date: add_business_days(trade_date, SETTLEMENT_CYCLE_DAYS),
            submitted_at: preview.created_at.naive_utc(),
            executed_at: self.clock.now_naive(),
            created_by: acting_user.to_string(),
        }
    }
}

impl OrderServiceTrait for OrderService {
    fn preview_buy(&self, request: OrderRequest) -> Result<OrderPreview> {
        self.preview(OrderType::Buy, request)
    }

    fn preview_sell(&self, request: OrderRequest) -> Result<OrderPreview> {
        self.preview(OrderType::Sell, request)
    }

    fn execute_buy(&self, preview_id: &str, acting_user: &str) -> Result<OrderExecutionResult> {
        self.execute(OrderType::Buy, preview_id, acting_user)
    }

    fn execute_sell(&self, preview_id: &str, acting_user: &str) -> Result<OrderExecutionResult> {
        self.execute(OrderType::Sell, preview_id, acting_user)
    }

    fn cancel_order(&self, order_id: i64, acting_user: &str) -> Result<TradeOrder> {
        let order = self.order_repository.commit_cancellation(order_id, acting_user)?;
        info!(
            "Cancelled {} order {} by {}",
            order.order_type, order.order_number, acting_user
        );
        Ok(order)
    }

    fn get_order(&self, order_id: i64) -> Result<TradeOrder> {
        self.order_repository.get_by_id(order_id)
    }

    fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<TradeOrder>> {
        self.order_repository.list(filter)
    }
}
