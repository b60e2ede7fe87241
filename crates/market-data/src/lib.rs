//! Back Office Market Data Crate
//!
//! This crate provides the end-of-day price feed consumed by the settlement
//! and valuation batch jobs.
//!
//! # Overview
//!
//! The feed supplies two things:
//! - Stock definitions (code, name, exchange, sector, active flag)
//! - Daily closing prices (open, high, low, close, volume) for a trading date
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! |  EOD batch jobs  |  (backoffice-core)
//! +------------------+
//!          |
//!          v
//! +------------------+
//! |    PriceFeed     |  (trait, blocking)
//! +------------------+
//!     |          |
//!     v          v
//! +--------+ +--------+
//! | Infina | | Static |
//! +--------+ +--------+
//! ```
//!
//! Calls are blocking; the core has no async runtime.

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::{MarketDataError, RetryClass};
pub use models::{ClosingPrice, StockDefinition};
pub use provider::{InfinaProvider, PriceFeed, StaticPriceFeed};
