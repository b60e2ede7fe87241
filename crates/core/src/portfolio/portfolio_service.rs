use rust_decimal::Decimal;
use std::sync::Arc;

use super::portfolio_model::{Holding, Portfolio};
use super::portfolio_traits::{PortfolioRepositoryTrait, PortfolioServiceTrait};
use crate::errors::Result;
use crate::stocks::StockRepositoryTrait;
use crate::utils::decimal_utils::round_money;

pub struct PortfolioService {
    repository: Arc<dyn PortfolioRepositoryTrait>,
    stock_repository: Arc<dyn StockRepositoryTrait>,
}

impl PortfolioService {
    pub fn new(
        repository: Arc<dyn PortfolioRepositoryTrait>,
        stock_repository: Arc<dyn StockRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            stock_repository,
        }
    }
}

impl PortfolioServiceTrait for PortfolioService {
    fn get_portfolio(&self, client_id: i64) -> Result<Portfolio> {
        self.repository.get_by_client(client_id)
    }

    fn get_holdings(&self, client_id: i64) -> Result<Vec<Holding>> {
        let portfolio = self.repository.get_by_client(client_id)?;
        let mut holdings = Vec::new();
        for item in self.repository.get_items(portfolio.id)? {
            let stock = self.stock_repository.get_by_id(item.stock_id)?;
            holdings.push(Holding {
                item_id: item.id,
                stock_id: stock.id,
                market_value: round_money(stock.current_price * Decimal::from(item.quantity)),
                stock_code: stock.code,
                stock_name: stock.name,
                account_id: item.account_id,
                quantity: item.quantity,
                avg_price: item.avg_price,
                current_price: stock.current_price,
            });
        }
        holdings.sort_by(|a, b| a.stock_code.cmp(&b.stock_code));
        Ok(holdings)
    }

    fn held_quantity(&self, client_id: i64, stock_id: i64, account_id: i64) -> Result<i64> {
        let portfolio = self.repository.get_by_client(client_id)?;
        Ok(self
            .repository
            .find_item(portfolio.id, stock_id, account_id)?
            .map_or(0, |item| item.quantity))
    }
}
