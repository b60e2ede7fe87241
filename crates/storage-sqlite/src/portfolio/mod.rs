//! SQLite storage implementation for portfolios, holdings and valuations.

mod model;
mod repository;

pub mod valuation;

pub use model::{NewPortfolioItemDB, PortfolioItemDB};
pub use repository::{apply_holding_change, find_item, portfolio_id_for, PortfolioRepository};
