//! Back-office core - domain entities, services, and traits.
//!
//! This crate holds the order-lifecycle and settlement engine together with
//! the end-of-day valuation pipeline. It is database-agnostic and defines
//! repository traits that are implemented by the `storage-sqlite` crate.
//!
//! All services are synchronous; callers running inside an async runtime
//! are expected to move calls onto a blocking thread.

pub mod accounts;
pub mod clients;
pub mod constants;
pub mod end_of_day;
pub mod errors;
pub mod orders;
pub mod portfolio;
pub mod reports;
pub mod settlement;
pub mod simulation;
pub mod stocks;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_mocks;

// Re-export error types
pub use errors::Error;
pub use errors::ErrorKind;
pub use errors::Result;
