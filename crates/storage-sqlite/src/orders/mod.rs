//! SQLite storage implementation for trade orders.

mod model;
mod repository;

pub use model::{NewTradeOrderDB, TradeOrderDB};
pub use repository::TradeOrderRepository;
