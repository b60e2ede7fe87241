//! In-memory repositories shared by the service tests.
//!
//! `InMemoryStore` implements every repository trait over one mutex, so a
//! single instance behaves like one database. The trading commits go through
//! the same ledger planners as the SQLite repositories.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::accounts::{
    Account, AccountRepositoryTrait, AccountType, CashTransaction, NewAccount, NewCashTransaction,
};
use crate::clients::{Client, ClientRepositoryTrait, ClientSearch, ClientType, NewClient};
use crate::errors::{ConflictError, Error, Result};
use crate::orders::{
    plan_cancellation, plan_execution, HoldingChange, LedgerPlan, NewTradeOrder,
    OrderExecutionResult, OrderFilter, OrderStatus, SettlementStatus,
    SettlementTransition, TradeOrder, TradeOrderRepositoryTrait,
};
use crate::portfolio::valuation::{
    NewPortfolioDailyValuation, PortfolioDailyValuation, PositionValuation,
    ValuationRepositoryTrait,
};
use crate::portfolio::{Portfolio, PortfolioItem, PortfolioRepositoryTrait};
use crate::simulation::{SimulationDate, SimulationRepositoryTrait};
use crate::stocks::{NewStock, NewStockDailyPrice, Stock, StockDailyPrice, StockRepositoryTrait};

#[derive(Default)]
pub struct State {
    next_id: i64,
    pub clients: BTreeMap<i64, Client>,
    pub portfolios: BTreeMap<i64, Portfolio>,
    pub accounts: BTreeMap<i64, Account>,
    pub transactions: Vec<CashTransaction>,
    pub stocks: BTreeMap<i64, Stock>,
    pub prices: Vec<StockDailyPrice>,
    pub items: BTreeMap<i64, PortfolioItem>,
    pub orders: BTreeMap<i64, TradeOrder>,
    pub valuations: Vec<PortfolioDailyValuation>,
    pub valuation_positions: BTreeMap<i64, Vec<PositionValuation>>,
    pub simulation: Option<SimulationDate>,
}

impl State {
    fn id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn portfolio_of(&self, client_id: i64) -> Option<&Portfolio> {
        self.portfolios.values().find(|p| p.client_id == client_id)
    }

    fn item_for(&self, portfolio_id: i64, stock_id: i64, account_id: i64) -> Option<PortfolioItem> {
        self.items
            .values()
            .find(|i| {
                i.portfolio_id == portfolio_id && i.stock_id == stock_id && i.account_id == account_id
            })
            .cloned()
    }

    fn apply_plan(
        &mut self,
        plan: &LedgerPlan,
        account_id: i64,
        portfolio_id: i64,
        stock_id: i64,
    ) -> Result<()> {
        let account = self
            .accounts
            .get_mut(&account_id)
            .ok_or_else(|| Error::not_found("account", account_id))?;
        account.balance = plan.balances.balance;
        account.available_balance = plan.balances.available_balance;

        match &plan.holding {
            HoldingChange::Create {
                quantity,
                avg_price,
            } => {
                let id = self.id();
                self.items.insert(
                    id,
                    PortfolioItem {
                        id,
                        portfolio_id,
                        stock_id,
                        account_id,
                        quantity: *quantity,
                        avg_price: *avg_price,
                        created_at: ts(),
                        updated_at: ts(),
                    },
                );
            }
            HoldingChange::Update {
                item_id,
                quantity,
                avg_price,
            } => {
                let item = self
                    .items
                    .get_mut(item_id)
                    .ok_or_else(|| Error::not_found("portfolio item", item_id))?;
                item.quantity = *quantity;
                item.avg_price = *avg_price;
            }
            HoldingChange::Delete { item_id } => {
                self.items.remove(item_id);
            }
        }
        Ok(())
    }
}

pub fn ts() -> NaiveDateTime {
    NaiveDateTime::default()
}

#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn add_client(&self, name: &str, client_type: ClientType) -> Client {
        ClientRepositoryTrait::create(
            self,
            NewClient {
            full_name: name.to_string(),
            client_type,
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
                tax_id: Some("1111111111".to_string()),
            },
        )
        .unwrap()
    }

    pub fn add_account(&self, client_id: i64, balance: Decimal) -> Account {
        AccountRepositoryTrait::create(
            self,
            NewAccount {
                client_id,
                account_number: None,
                account_type: AccountType::Settlement,
                currency: None,
                is_primary_settlement: true,
                opening_balance: balance,
            },
        )
        .unwrap()
    }

    pub fn add_stock(&self, code: &str, price: Decimal) -> Stock {
        StockRepositoryTrait::create(
            self,
            NewStock {
                code: code.to_string(),
                name: format!("{} A.S.", code),
                sector: None,
                exchange_code: Some("BIST".to_string()),
                current_price: price,
                is_active: true,
            },
        )
        .unwrap()
    }

    pub fn set_holding(
        &self,
        client_id: i64,
        stock_id: i64,
        account_id: i64,
        quantity: i64,
        avg_price: Decimal,
    ) -> PortfolioItem {
        let mut state = self.state();
        let portfolio_id = state.portfolio_of(client_id).unwrap().id;
        let id = state.id();
        let item = PortfolioItem {
            id,
            portfolio_id,
            stock_id,
            account_id,
            quantity,
            avg_price,
            created_at: ts(),
            updated_at: ts(),
        };
        state.items.insert(id, item.clone());
        item
    }

    pub fn portfolio_for(&self, client_id: i64) -> Option<Portfolio> {
        self.state().portfolio_of(client_id).cloned()
    }

    pub fn account(&self, account_id: i64) -> Account {
        self.state().accounts[&account_id].clone()
    }

    pub fn holding(&self, client_id: i64, stock_id: i64, account_id: i64) -> Option<PortfolioItem> {
        let state = self.state();
        let portfolio_id = state.portfolio_of(client_id)?.id;
        state.item_for(portfolio_id, stock_id, account_id)
    }

    pub fn order(&self, order_id: i64) -> TradeOrder {
        self.state().orders[&order_id].clone()
    }

    pub fn set_settlement_status(&self, order_id: i64, status: SettlementStatus) {
        if let Some(order) = self.state().orders.get_mut(&order_id) {
            order.settlement_status = status;
        }
    }

    pub fn add_close(&self, stock_id: i64, date: NaiveDate, close: Decimal) {
        self.save_closing_prices(vec![NewStockDailyPrice {
            stock_id,
            price_date: date,
            open: close,
            high: close,
            low: close,
            close,
            volume: Decimal::ZERO,
            change_percentage: Decimal::ZERO,
            official_close: true,
        }])
        .unwrap();
    }

    /// Inserts an executed order directly, without touching balances.
    pub fn add_executed_order(
        &self,
        client_id: i64,
        account_id: i64,
        stock_id: i64,
        trade_date: NaiveDate,
    ) -> TradeOrder {
        let mut state = self.state();
        let id = state.id();
        let order = TradeOrder {
            id,
            order_number: format!("ORD-TEST-{}", id),
            client_id,
            account_id,
            stock_id,
            order_type: crate::orders::OrderType::Buy,
            execution_type: crate::orders::ExecutionType::Market,
            price: Decimal::TEN,
            quantity: 10,
            total_amount: Decimal::ONE_HUNDRED,
            commission: Decimal::ZERO,
            bsmv: Decimal::ZERO,
            net_amount: Decimal::ONE_HUNDRED,
            status: OrderStatus::Executed,
            settlement_status: SettlementStatus::Pending,
            trade_date,
            settlement_date: trade_date,
            submitted_at: ts(),
            executed_at: Some(ts()),
            settled_at: None,
            portfolio_updated: false,
            created_by: "test".to_string(),
            updated_by: None,
            avg_price_before: None,
            avg_price_after: None,
        };
        state.orders.insert(id, order.clone());
        order
    }
}

impl ClientRepositoryTrait for InMemoryStore {
    fn create(&self, new_client: NewClient) -> Result<Client> {
        let mut state = self.state();
        let id = state.id();
        let client = Client {
            id,
            full_name: new_client.full_name,
            client_type: new_client.client_type,
            email: new_client.email,
            tax_id: new_client.tax_id,
            is_active: true,
            created_at: ts(),
        };
        state.clients.insert(id, client.clone());
        let portfolio_id = state.id();
        state.portfolios.insert(
            portfolio_id,
            Portfolio {
                id: portfolio_id,
                client_id: id,
                created_at: ts(),
            },
        );
        Ok(client)
    }

    fn get_by_id(&self, client_id: i64) -> Result<Client> {
        self.state()
            .clients
            .get(&client_id)
            .cloned()
            .ok_or_else(|| Error::not_found("client", client_id))
    }

    fn list(&self, active_only: bool) -> Result<Vec<Client>> {
        Ok(self
            .state()
            .clients
            .values()
            .filter(|c| !active_only || c.is_active)
            .cloned()
            .collect())
    }

    fn search(&self, search: &ClientSearch) -> Result<Vec<Client>> {
        let term = search.query.to_lowercase();
        Ok(self
            .state()
            .clients
            .values()
            .filter(|c| !search.active_only || c.is_active)
            .filter(|c| {
                c.full_name.to_lowercase().contains(&term)
                    || c.email.to_lowercase().contains(&term)
                    || c.tax_id.as_deref().is_some_and(|t| t.contains(&term))
            })
            .cloned()
            .collect())
    }
}

impl AccountRepositoryTrait for InMemoryStore {
    fn create(&self, new_account: NewAccount) -> Result<Account> {
        let mut state = self.state();
        let id = state.id();
        let account = Account {
            id,
            client_id: new_account.client_id,
            account_number: new_account
                .account_number
                .unwrap_or_else(|| format!("ACC{:010}", id)),
            balance: new_account.opening_balance,
            available_balance: new_account.opening_balance,
            currency: new_account.currency.unwrap_or_else(|| "TRY".to_string()),
            account_type: new_account.account_type,
            is_primary_settlement: new_account.is_primary_settlement,
            created_at: ts(),
            updated_at: ts(),
        };
        state.accounts.insert(id, account.clone());
        Ok(account)
    }

    fn get_by_id(&self, account_id: i64) -> Result<Account> {
        self.state()
            .accounts
            .get(&account_id)
            .cloned()
            .ok_or_else(|| Error::not_found("account", account_id))
    }

    fn list_by_client(&self, client_id: i64) -> Result<Vec<Account>> {
        Ok(self
            .state()
            .accounts
            .values()
            .filter(|a| a.client_id == client_id)
            .cloned()
            .collect())
    }

    fn apply_cash_movement(&self, transaction: NewCashTransaction) -> Result<CashTransaction> {
        let mut state = self.state();
        let id = state.id();
        let account = state
            .accounts
            .get_mut(&transaction.account_id)
            .ok_or_else(|| Error::not_found("account", transaction.account_id))?;
        let balances = transaction.movement.apply_to(account)?;
        let previous_balance = account.balance;
        account.balance = balances.balance;
        account.available_balance = balances.available_balance;
        let recorded = CashTransaction {
            id,
            transaction_number: transaction.transaction_number,
            account_id: transaction.account_id,
            transaction_type: transaction.movement.transaction_type(),
            amount: transaction.movement.amount(),
            previous_balance,
            new_balance: balances.balance,
            description: transaction.description,
            executed_at: ts(),
            created_by: transaction.created_by,
        };
        state.transactions.push(recorded.clone());
        Ok(recorded)
    }

    fn list_transactions(&self, account_id: i64) -> Result<Vec<CashTransaction>> {
        Ok(self
            .state()
            .transactions
            .iter()
            .rev()
            .filter(|t| t.account_id == account_id)
            .cloned()
            .collect())
    }
}

impl StockRepositoryTrait for InMemoryStore {
    fn get_by_id(&self, stock_id: i64) -> Result<Stock> {
        self.state()
            .stocks
            .get(&stock_id)
            .cloned()
            .ok_or_else(|| Error::not_found("stock", stock_id))
    }

    fn get_by_code(&self, code: &str) -> Result<Stock> {
        self.state()
            .stocks
            .values()
            .find(|s| s.code == code)
            .cloned()
            .ok_or_else(|| Error::not_found("stock", code))
    }

    fn list(&self, active_only: bool) -> Result<Vec<Stock>> {
        Ok(self
            .state()
            .stocks
            .values()
            .filter(|s| !active_only || s.is_active)
            .cloned()
            .collect())
    }

    fn create(&self, new_stock: NewStock) -> Result<Stock> {
        let mut state = self.state();
        let id = state.id();
        let stock = Stock {
            id,
            code: new_stock.code,
            name: new_stock.name,
            sector: new_stock.sector,
            exchange_code: new_stock.exchange_code,
            current_price: new_stock.current_price,
            is_active: new_stock.is_active,
            created_at: ts(),
            updated_at: ts(),
        };
        state.stocks.insert(id, stock.clone());
        Ok(stock)
    }

    fn upsert_definitions(&self, definitions: Vec<NewStock>) -> Result<usize> {
        let count = definitions.len();
        for def in definitions {
            let existing = self
                .state()
                .stocks
                .values()
                .find(|s| s.code == def.code)
                .map(|s| s.id);
            match existing {
                Some(id) => {
                    let mut state = self.state();
                    if let Some(stock) = state.stocks.get_mut(&id) {
                        stock.name = def.name;
                        stock.sector = def.sector;
                        stock.exchange_code = def.exchange_code;
                        stock.is_active = def.is_active;
                    }
                }
                None => {
                    StockRepositoryTrait::create(self, def)?;
                }
            }
        }
        Ok(count)
    }

    fn save_closing_prices(&self, prices: Vec<NewStockDailyPrice>) -> Result<usize> {
        let mut state = self.state();
        let mut saved = 0;
        for price in prices {
            if state
                .prices
                .iter()
                .any(|p| p.stock_id == price.stock_id && p.price_date == price.price_date)
            {
                continue;
            }
            let id = state.id();
            if let Some(stock) = state.stocks.get_mut(&price.stock_id) {
                stock.current_price = price.close;
            }
            state.prices.push(StockDailyPrice {
                id,
                stock_id: price.stock_id,
                price_date: price.price_date,
                open: price.open,
                high: price.high,
                low: price.low,
                close: price.close,
                volume: price.volume,
                change_percentage: price.change_percentage,
                official_close: price.official_close,
                created_at: ts(),
            });
            saved += 1;
        }
        Ok(saved)
    }

    fn get_daily_prices(&self, date: NaiveDate) -> Result<Vec<StockDailyPrice>> {
        Ok(self
            .state()
            .prices
            .iter()
            .filter(|p| p.price_date == date)
            .cloned()
            .collect())
    }

    fn has_official_close(&self, date: NaiveDate) -> Result<bool> {
        Ok(self
            .state()
            .prices
            .iter()
            .any(|p| p.price_date == date && p.official_close))
    }

    fn delete_prices_for_date(&self, date: NaiveDate) -> Result<usize> {
        let mut state = self.state();
        let before = state.prices.len();
        state.prices.retain(|p| p.price_date != date);
        Ok(before - state.prices.len())
    }
}

impl PortfolioRepositoryTrait for InMemoryStore {
    fn get_by_client(&self, client_id: i64) -> Result<Portfolio> {
        self.portfolio_for(client_id)
            .ok_or_else(|| Error::not_found("portfolio", client_id))
    }

    fn list(&self) -> Result<Vec<Portfolio>> {
        Ok(self.state().portfolios.values().cloned().collect())
    }

    fn get_items(&self, portfolio_id: i64) -> Result<Vec<PortfolioItem>> {
        Ok(self
            .state()
            .items
            .values()
            .filter(|i| i.portfolio_id == portfolio_id)
            .cloned()
            .collect())
    }

    fn find_item(
        &self,
        portfolio_id: i64,
        stock_id: i64,
        account_id: i64,
    ) -> Result<Option<PortfolioItem>> {
        Ok(self.state().item_for(portfolio_id, stock_id, account_id))
    }
}

impl TradeOrderRepositoryTrait for InMemoryStore {
    fn commit_execution(
        &self,
        new_order: NewTradeOrder,
        portfolio_id: i64,
    ) -> Result<OrderExecutionResult> {
        let mut state = self.state();
        let account = state
            .accounts
            .get(&new_order.account_id)
            .cloned()
            .ok_or_else(|| Error::not_found("account", new_order.account_id))?;
        let holding = state.item_for(portfolio_id, new_order.stock_id, new_order.account_id);

        let calculation = new_order.calculation();
        let plan = plan_execution(new_order.order_type, &calculation, &account, holding.as_ref())?;
        state.apply_plan(&plan, account.id, portfolio_id, new_order.stock_id)?;

        let id = state.id();
        let order = TradeOrder {
            id,
            order_number: new_order.order_number,
            client_id: new_order.client_id,
            account_id: new_order.account_id,
            stock_id: new_order.stock_id,
            order_type: new_order.order_type,
            execution_type: new_order.execution_type,
            price: new_order.price,
            quantity: new_order.quantity,
            total_amount: new_order.total_amount,
            commission: new_order.commission,
            bsmv: new_order.bsmv,
            net_amount: new_order.net_amount,
            status: OrderStatus::Executed,
            settlement_status: SettlementStatus::Pending,
            trade_date: new_order.trade_date,
            settlement_date: new_order.settlement_date,
            submitted_at: new_order.submitted_at,
            executed_at: Some(new_order.executed_at),
            settled_at: None,
            portfolio_updated: false,
            created_by: new_order.created_by,
            updated_by: None,
            avg_price_before: holding.as_ref().map(|h| h.avg_price),
            avg_price_after: plan.holding.avg_price_after(),
        };
        state.orders.insert(id, order.clone());

        Ok(OrderExecutionResult {
            order,
            balance_after: plan.balances.balance,
            available_balance_after: plan.balances.available_balance,
            holding_quantity_after: plan.holding.quantity_after(),
        })
    }

    fn commit_cancellation(&self, order_id: i64, acting_user: &str) -> Result<TradeOrder> {
        let mut state = self.state();
        let order = state
            .orders
            .get(&order_id)
            .cloned()
            .ok_or_else(|| Error::not_found("order", order_id))?;
        let account = state
            .accounts
            .get(&order.account_id)
            .cloned()
            .ok_or_else(|| Error::not_found("account", order.account_id))?;
        let portfolio_id = state
            .portfolio_of(order.client_id)
            .map(|p| p.id)
            .ok_or_else(|| Error::not_found("portfolio", order.client_id))?;
        let holding = state.item_for(portfolio_id, order.stock_id, order.account_id);

        let plan = plan_cancellation(&order, &account, holding.as_ref())?;
        state.apply_plan(&plan, account.id, portfolio_id, order.stock_id)?;

        let stored = state
            .orders
            .get_mut(&order_id)
            .ok_or_else(|| Error::not_found("order", order_id))?;
        stored.status = OrderStatus::Cancelled;
        stored.settlement_status = SettlementStatus::Cancelled;
        stored.updated_by = Some(acting_user.to_string());
        Ok(stored.clone())
    }

    fn get_by_id(&self, order_id: i64) -> Result<TradeOrder> {
        self.state()
            .orders
            .get(&order_id)
            .cloned()
            .ok_or_else(|| Error::not_found("order", order_id))
    }

    fn list(&self, filter: &OrderFilter) -> Result<Vec<TradeOrder>> {
        Ok(self
            .state()
            .orders
            .values()
            .rev()
            .filter(|o| filter.client_id.map_or(true, |c| o.client_id == c))
            .filter(|o| filter.status.map_or(true, |s| o.status == s))
            .filter(|o| filter.settlement_status.map_or(true, |s| o.settlement_status == s))
            .cloned()
            .collect())
    }

    fn list_executed_in(&self, status: SettlementStatus) -> Result<Vec<TradeOrder>> {
        let mut orders: Vec<TradeOrder> = self
            .state()
            .orders
            .values()
            .filter(|o| o.status == OrderStatus::Executed && o.settlement_status == status)
            .cloned()
            .collect();
        orders.sort_by_key(|o| (o.trade_date, o.id));
        Ok(orders)
    }

    fn apply_transitions(&self, transitions: Vec<SettlementTransition>) -> Result<usize> {
        let mut state = self.state();
        let mut moved = 0;
        for t in transitions {
            if let Some(order) = state.orders.get_mut(&t.order_id) {
                if order.settlement_status != t.from {
                    continue;
                }
                order.settlement_status = t.to;
                order.status = t.order_status;
                order.settled_at = t.settled_at.or(order.settled_at);
                order.portfolio_updated = t.portfolio_updated;
                moved += 1;
            }
        }
        Ok(moved)
    }
}

impl ValuationRepositoryTrait for InMemoryStore {
    fn insert_locked(
        &self,
        valuation: NewPortfolioDailyValuation,
        positions: Vec<PositionValuation>,
    ) -> Result<PortfolioDailyValuation> {
        let mut state = self.state();
        if state
            .valuations
            .iter()
            .any(|v| v.client_id == valuation.client_id && v.valuation_date == valuation.valuation_date)
        {
            return Err(ConflictError::ValuationLocked {
                client_id: valuation.client_id,
                date: valuation.valuation_date,
            }
            .into());
        }
        let id = state.id();
        let stored = PortfolioDailyValuation {
            id,
            client_id: valuation.client_id,
            valuation_date: valuation.valuation_date,
            total_portfolio_value: valuation.total_portfolio_value,
            unrealized_profit_loss: valuation.unrealized_profit_loss,
            daily_change_percentage: valuation.daily_change_percentage,
            total_return_percentage: valuation.total_return_percentage,
            initial_investment: valuation.initial_investment,
            previous_day_value: valuation.previous_day_value,
            locked: valuation.locked,
            created_by: valuation.created_by,
            created_at: ts(),
        };
        state.valuations.push(stored.clone());
        state.valuation_positions.insert(id, positions);
        Ok(stored)
    }

    fn get_positions(&self, valuation_id: i64) -> Result<Vec<PositionValuation>> {
        Ok(self
            .state()
            .valuation_positions
            .get(&valuation_id)
            .cloned()
            .unwrap_or_default())
    }

    fn get(&self, client_id: i64, date: NaiveDate) -> Result<Option<PortfolioDailyValuation>> {
        Ok(self
            .state()
            .valuations
            .iter()
            .find(|v| v.client_id == client_id && v.valuation_date == date)
            .cloned())
    }

    fn get_latest_before(
        &self,
        client_id: i64,
        date: NaiveDate,
    ) -> Result<Option<PortfolioDailyValuation>> {
        Ok(self
            .state()
            .valuations
            .iter()
            .filter(|v| v.client_id == client_id && v.valuation_date < date && v.locked)
            .max_by_key(|v| v.valuation_date)
            .cloned())
    }

    fn list_for_date(&self, date: NaiveDate) -> Result<Vec<PortfolioDailyValuation>> {
        Ok(self
            .state()
            .valuations
            .iter()
            .filter(|v| v.valuation_date == date)
            .cloned()
            .collect())
    }

    fn history(
        &self,
        client_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PortfolioDailyValuation>> {
        let mut rows: Vec<_> = self
            .state()
            .valuations
            .iter()
            .filter(|v| v.client_id == client_id && v.valuation_date >= from && v.valuation_date <= to)
            .cloned()
            .collect();
        rows.sort_by_key(|v| v.valuation_date);
        Ok(rows)
    }

    fn exists_for_date(&self, date: NaiveDate) -> Result<bool> {
        Ok(self.state().valuations.iter().any(|v| v.valuation_date == date))
    }

    fn delete_for_date(&self, date: NaiveDate) -> Result<usize> {
        let mut state = self.state();
        let removed: Vec<i64> = state
            .valuations
            .iter()
            .filter(|v| v.valuation_date == date)
            .map(|v| v.id)
            .collect();
        state.valuations.retain(|v| v.valuation_date != date);
        for id in &removed {
            state.valuation_positions.remove(id);
        }
        Ok(removed.len())
    }
}

impl SimulationRepositoryTrait for InMemoryStore {
    fn get(&self) -> Result<Option<SimulationDate>> {
        Ok(self.state().simulation.clone())
    }

    fn save(&self, next: SimulationDate, expected_version: Option<i64>) -> Result<SimulationDate> {
        let mut state = self.state();
        let stored_version = state.simulation.as_ref().map(|s| s.version);
        if stored_version != expected_version {
            return Err(ConflictError::StaleSimulationDate {
                expected: expected_version.unwrap_or(0),
            }
            .into());
        }
        let saved = SimulationDate {
            version: expected_version.unwrap_or(0) + 1,
            ..next
        };
        state.simulation = Some(saved.clone());
        Ok(saved)
    }
}
