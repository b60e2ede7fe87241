//! Price feed trait definition.

use chrono::NaiveDate;

use crate::errors::MarketDataError;
use crate::models::{ClosingPrice, StockDefinition};

/// Trait for end-of-day price sources.
///
/// Calls block the calling thread. Callers that live on an async runtime
/// must hop onto a blocking thread first.
///
/// # Example
///
/// ```ignore
/// struct MyFeed;
///
/// impl PriceFeed for MyFeed {
///     fn id(&self) -> &'static str {
///         "MY_FEED"
///     }
///
///     fn fetch_definitions(&self) -> Result<Vec<StockDefinition>, MarketDataError> {
///         Ok(vec![])
///     }
///
///     fn fetch_closing_prices(
///         &self,
///         date: NaiveDate,
///     ) -> Result<Vec<ClosingPrice>, MarketDataError> {
///         Err(MarketDataError::NoData(date.to_string()))
///     }
/// }
/// ```
pub trait PriceFeed: Send + Sync {
    /// Unique identifier used in logs, e.g. "INFINA".
    fn id(&self) -> &'static str;

    /// Lists the instruments known to the feed.
    fn fetch_definitions(&self) -> Result<Vec<StockDefinition>, MarketDataError>;

    /// Returns closing prices for `date`.
    ///
    /// Either the whole list is returned or an error; partial lists are never
    /// surfaced.
    fn fetch_closing_prices(&self, date: NaiveDate)
        -> Result<Vec<ClosingPrice>, MarketDataError>;
}
