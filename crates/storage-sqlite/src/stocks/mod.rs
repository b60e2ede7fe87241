//! SQLite storage implementation for stocks and daily prices.

mod model;
mod repository;

pub use model::{NewStockDB, NewStockDailyPriceDB, StockDB, StockDailyPriceDB};
pub use repository::StockRepository;
