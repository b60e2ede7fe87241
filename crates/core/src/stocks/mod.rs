//! Stocks module - catalogue, daily prices and feed ingestion.

mod stocks_model;
mod stocks_service;
mod stocks_traits;

#[cfg(test)]
mod stocks_service_tests;

pub use stocks_model::{
    NewStock, NewStockDailyPrice, PriceFetchOutcome, Stock, StockDailyPrice,
};
pub use stocks_service::StockService;
pub use stocks_traits::{StockRepositoryTrait, StockServiceTrait};
