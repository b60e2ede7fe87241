//! HTTP server for the brokerage back office.
//!
//! Exposes the core services as a JSON API under `/api/v1` and optionally
//! drives the end-of-day cycle on a timer.

pub mod api;
pub mod config;
pub mod error;
pub mod main_lib;
pub mod scheduler;

pub use main_lib::{build_state, build_state_with, init_tracing, AppState};
