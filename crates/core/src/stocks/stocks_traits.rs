use chrono::NaiveDate;
use std::collections::HashMap;

use rust_decimal::Decimal;

use super::stocks_model::{NewStock, NewStockDailyPrice, PriceFetchOutcome, Stock, StockDailyPrice};
use crate::errors::Result;

/// Persistence contract for stocks and their daily prices.
pub trait StockRepositoryTrait: Send + Sync {
    fn get_by_id(&self, stock_id: i64) -> Result<Stock>;

    fn get_by_code(&self, code: &str) -> Result<Stock>;

    fn list(&self, active_only: bool) -> Result<Vec<Stock>>;

    fn create(&self, new_stock: NewStock) -> Result<Stock>;

    /// Inserts unknown codes and refreshes name, sector, exchange and
    /// activity of known ones. Prices are left untouched.
    fn upsert_definitions(&self, definitions: Vec<NewStock>) -> Result<usize>;

    /// Writes the rows and moves each stock's current price to its close,
    /// all in one transaction. Rows already present for (stock, date) are
    /// kept as they are. Returns the number of rows inserted.
    fn save_closing_prices(&self, prices: Vec<NewStockDailyPrice>) -> Result<usize>;

    fn get_daily_prices(&self, date: NaiveDate) -> Result<Vec<StockDailyPrice>>;

    /// True when at least one official close exists for `date`.
    fn has_official_close(&self, date: NaiveDate) -> Result<bool>;

    fn delete_prices_for_date(&self, date: NaiveDate) -> Result<usize>;
}

/// Stock lookups and the price feed ingestion path.
pub trait StockServiceTrait: Send + Sync {
    fn get_stock(&self, stock_id: i64) -> Result<Stock>;

    fn get_stock_by_code(&self, code: &str) -> Result<Stock>;

    fn list_stocks(&self, active_only: bool) -> Result<Vec<Stock>>;

    fn create_stock(&self, new_stock: NewStock) -> Result<Stock>;

    /// Upserts stock definitions from the feed. Returns the count.
    fn sync_stock_definitions(&self) -> Result<usize>;

    /// Pulls closing prices from the feed and persists them for `date`.
    ///
    /// A failed or empty feed is an error and nothing is written.
    fn fetch_closing_prices(&self, date: NaiveDate) -> Result<PriceFetchOutcome>;

    fn get_daily_prices(&self, date: NaiveDate) -> Result<Vec<StockDailyPrice>>;

    /// Official closes for `date` keyed by stock id.
    fn closing_prices_by_stock(&self, date: NaiveDate) -> Result<HashMap<i64, Decimal>>;

    fn has_official_close(&self, date: NaiveDate) -> Result<bool>;

    fn delete_prices_for_date(&self, date: NaiveDate) -> Result<usize>;
}
