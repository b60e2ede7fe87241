//! In-memory price feed for demos and tests.

use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::errors::MarketDataError;
use crate::models::{ClosingPrice, StockDefinition};
use crate::provider::PriceFeed;

const PROVIDER_ID: &str = "STATIC";

/// Serves a fixed set of definitions and per-date closing prices.
///
/// A date without prices yields [`MarketDataError::NoData`]. When
/// `fallback` is set, dates without explicit prices get the fallback list.
#[derive(Default)]
pub struct StaticPriceFeed {
    definitions: RwLock<Vec<StockDefinition>>,
    prices: RwLock<HashMap<NaiveDate, Vec<ClosingPrice>>>,
    fallback: RwLock<Option<Vec<ClosingPrice>>>,
}

impl StaticPriceFeed {
    pub fn new(definitions: Vec<StockDefinition>) -> Self {
        Self {
            definitions: RwLock::new(definitions),
            ..Default::default()
        }
    }

    pub fn set_prices(&self, date: NaiveDate, prices: Vec<ClosingPrice>) {
        if let Ok(mut map) = self.prices.write() {
            map.insert(date, prices);
        }
    }

    pub fn set_fallback(&self, prices: Vec<ClosingPrice>) {
        if let Ok(mut slot) = self.fallback.write() {
            *slot = Some(prices);
        }
    }
}

impl PriceFeed for StaticPriceFeed {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn fetch_definitions(&self) -> Result<Vec<StockDefinition>, MarketDataError> {
        self.definitions
            .read()
            .map(|d| d.clone())
            .map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: e.to_string(),
            })
    }

    fn fetch_closing_prices(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<ClosingPrice>, MarketDataError> {
        let poisoned = |e: String| MarketDataError::ProviderError {
            provider: PROVIDER_ID.to_string(),
            message: e,
        };

        let explicit = self
            .prices
            .read()
            .map_err(|e| poisoned(e.to_string()))?
            .get(&date)
            .cloned();

        let prices = match explicit {
            Some(p) => p,
            None => self
                .fallback
                .read()
                .map_err(|e| poisoned(e.to_string()))?
                .clone()
                .unwrap_or_default(),
        };

        if prices.is_empty() {
            return Err(MarketDataError::NoData(date.to_string()));
        }
        for p in &prices {
            p.validate()?;
        }
        Ok(prices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_missing_date_is_no_data() {
        let feed = StaticPriceFeed::default();
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        assert!(matches!(
            feed.fetch_closing_prices(date),
            Err(MarketDataError::NoData(_))
        ));
    }

    #[test]
    fn test_explicit_prices_win_over_fallback() {
        let feed = StaticPriceFeed::default();
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        feed.set_fallback(vec![ClosingPrice::close_only("THYAO", dec!(1))]);
        feed.set_prices(date, vec![ClosingPrice::close_only("THYAO", dec!(2))]);

        let prices = feed.fetch_closing_prices(date).unwrap();
        assert_eq!(prices[0].close, dec!(2));

        let other = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let prices = feed.fetch_closing_prices(other).unwrap();
        assert_eq!(prices[0].close, dec!(1));
    }
}
