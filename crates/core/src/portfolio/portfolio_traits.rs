use super::portfolio_model::{Holding, Portfolio, PortfolioItem};
use crate::errors::Result;

/// Read access to portfolios and their items.
///
/// Items are only written by the order execution and cancellation
/// transactions, so this trait carries no mutators.
pub trait PortfolioRepositoryTrait: Send + Sync {
    fn get_by_client(&self, client_id: i64) -> Result<Portfolio>;

    fn list(&self) -> Result<Vec<Portfolio>>;

    fn get_items(&self, portfolio_id: i64) -> Result<Vec<PortfolioItem>>;

    fn find_item(
        &self,
        portfolio_id: i64,
        stock_id: i64,
        account_id: i64,
    ) -> Result<Option<PortfolioItem>>;
}

pub trait PortfolioServiceTrait: Send + Sync {
    fn get_portfolio(&self, client_id: i64) -> Result<Portfolio>;

    /// Current holdings priced at each stock's current price.
    fn get_holdings(&self, client_id: i64) -> Result<Vec<Holding>>;

    /// Quantity of `stock_id` held through `account_id`, zero when absent.
    fn held_quantity(&self, client_id: i64, stock_id: i64, account_id: i64) -> Result<i64>;
}
