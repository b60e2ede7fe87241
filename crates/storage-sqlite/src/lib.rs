//! SQLite storage implementation for the back office.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `backoffice-core` and contains:
//! - Database connection pooling and the single-writer thread
//! - Diesel migrations
//! - Repository implementations for all domain entities
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the workspace where Diesel dependencies exist.
//! The core crate is database-agnostic and works with traits.
//!
//! ```text
//!        core (domain)
//!              │
//!              ▼
//!   storage-sqlite (this crate)
//!              │
//!              ▼
//!          SQLite DB
//! ```
//!
//! Reads take a pooled connection. Every write goes through [`WriteHandle`],
//! which runs it inside `BEGIN IMMEDIATE` on one dedicated connection.

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod accounts;
pub mod clients;
pub mod orders;
pub mod portfolio;
pub mod simulation;
pub mod stocks;

pub use db::{
    create_pool, get_connection, get_db_path, init, run_migrations, spawn_writer, DbConnection,
    DbPool, WriteHandle,
};

pub use errors::{IntoCore, StorageError};

pub use accounts::AccountRepository;
pub use clients::ClientRepository;
pub use orders::TradeOrderRepository;
pub use portfolio::valuation::ValuationRepository;
pub use portfolio::PortfolioRepository;
pub use simulation::SimulationRepository;
pub use stocks::StockRepository;

pub use backoffice_core::errors::{DatabaseError, Error, Result};

use std::sync::Arc;

/// Every repository over one pool and one writer.
pub struct Repositories {
    pub clients: Arc<ClientRepository>,
    pub accounts: Arc<AccountRepository>,
    pub stocks: Arc<StockRepository>,
    pub portfolios: Arc<PortfolioRepository>,
    pub valuations: Arc<ValuationRepository>,
    pub orders: Arc<TradeOrderRepository>,
    pub simulation: Arc<SimulationRepository>,
}

impl Repositories {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self {
            clients: Arc::new(ClientRepository::new(pool.clone(), writer.clone())),
            accounts: Arc::new(AccountRepository::new(pool.clone(), writer.clone())),
            stocks: Arc::new(StockRepository::new(pool.clone(), writer.clone())),
            portfolios: Arc::new(PortfolioRepository::new(pool.clone())),
            valuations: Arc::new(ValuationRepository::new(pool.clone(), writer.clone())),
            orders: Arc::new(TradeOrderRepository::new(pool.clone(), writer.clone())),
            simulation: Arc::new(SimulationRepository::new(pool, writer)),
        }
    }

    /// Creates the database under `data_dir`, migrates it and starts the writer.
    pub fn open(data_dir: &str) -> Result<Self> {
        let db_path = init(data_dir)?;
        let pool = create_pool(&db_path)?;
        run_migrations(&pool)?;
        let writer = spawn_writer((*pool).clone())?;
        Ok(Self::new(pool, writer))
    }
}
