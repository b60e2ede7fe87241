use backoffice_market_data::PriceFeed;
use chrono::NaiveDate;
use log::{debug, info, warn};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

use super::stocks_model::{NewStock, NewStockDailyPrice, PriceFetchOutcome, Stock, StockDailyPrice};
use super::stocks_traits::{StockRepositoryTrait, StockServiceTrait};
use crate::errors::Result;

/// Stock catalogue backed by a repository and an external price feed.
pub struct StockService {
    repository: Arc<dyn StockRepositoryTrait>,
    feed: Arc<dyn PriceFeed>,
}

impl StockService {
    pub fn new(repository: Arc<dyn StockRepositoryTrait>, feed: Arc<dyn PriceFeed>) -> Self {
        Self { repository, feed }
    }
}

impl StockServiceTrait for StockService {
    fn get_stock(&self, stock_id: i64) -> Result<Stock> {
        self.repository.get_by_id(stock_id)
    }

    fn get_stock_by_code(&self, code: &str) -> Result<Stock> {
        self.repository.get_by_code(&code.trim().to_uppercase())
    }

    fn list_stocks(&self, active_only: bool) -> Result<Vec<Stock>> {
        self.repository.list(active_only)
    }

    fn create_stock(&self, new_stock: NewStock) -> Result<Stock> {
        new_stock.validate()?;
        self.repository.create(NewStock {
            code: new_stock.code.trim().to_uppercase(),
            ..new_stock
        })
    }

    fn sync_stock_definitions(&self) -> Result<usize> {
        let definitions = self.feed.fetch_definitions().map_err(|e| {
            warn!("Stock definitions fetch from {} failed: {}", self.feed.id(), e);
            e
        })?;

        let new_stocks: Vec<NewStock> = definitions
            .into_iter()
            .map(NewStock::from)
            .filter(|s| match s.validate() {
                Ok(()) => true,
                Err(e) => {
                    debug!("Skipping stock definition {}: {}", s.code, e);
                    false
                }
            })
            .collect();

        let count = self.repository.upsert_definitions(new_stocks)?;
        info!("Synced {} stock definitions from {}", count, self.feed.id());
        Ok(count)
    }

    fn fetch_closing_prices(&self, date: NaiveDate) -> Result<PriceFetchOutcome> {
        let prices = self.feed.fetch_closing_prices(date).map_err(|e| {
            warn!(
                "Closing price fetch from {} for {} failed ({:?}): {}",
                self.feed.id(),
                date,
                e.retry_class(),
                e
            );
            e
        })?;

        let by_code: HashMap<String, i64> = self
            .repository
            .list(false)?
            .into_iter()
            .map(|s| (s.code, s.id))
            .collect();

        let mut rows = Vec::with_capacity(prices.len());
        let mut unknown_codes = Vec::new();
        for price in &prices {
            let code = price.code.trim().to_uppercase();
            match by_code.get(&code) {
                Some(stock_id) => rows.push(NewStockDailyPrice::official(*stock_id, date, price)),
                None => unknown_codes.push(code),
            }
        }
        if !unknown_codes.is_empty() {
            debug!(
                "{} feed codes have no stock definition: {:?}",
                unknown_codes.len(),
                unknown_codes
            );
        }

        let saved = self.repository.save_closing_prices(rows)?;
        info!(
            "Saved {} of {} closing prices for {} from {}",
            saved,
            prices.len(),
            date,
            self.feed.id()
        );

        Ok(PriceFetchOutcome {
            date,
            provider: self.feed.id().to_string(),
            fetched: prices.len(),
            saved,
            unknown_codes,
        })
    }

    fn get_daily_prices(&self, date: NaiveDate) -> Result<Vec<StockDailyPrice>> {
        self.repository.get_daily_prices(date)
    }

    fn closing_prices_by_stock(&self, date: NaiveDate) -> Result<HashMap<i64, Decimal>> {
        Ok(self
            .repository
            .get_daily_prices(date)?
            .into_iter()
            .filter(|p| p.official_close)
            .map(|p| (p.stock_id, p.close))
            .collect())
    }

    fn has_official_close(&self, date: NaiveDate) -> Result<bool> {
        self.repository.has_official_close(date)
    }

    fn delete_prices_for_date(&self, date: NaiveDate) -> Result<usize> {
        self.repository.delete_prices_for_date(date)
    }
}
