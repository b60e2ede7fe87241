//! Portfolio module - holdings and end-of-day valuation.

mod portfolio_model;
mod portfolio_service;
mod portfolio_traits;

pub mod valuation;

pub use portfolio_model::{Holding, Portfolio, PortfolioItem};
pub use portfolio_service::PortfolioService;
pub use portfolio_traits::{PortfolioRepositoryTrait, PortfolioServiceTrait};
