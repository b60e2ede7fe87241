//! SQLite storage implementation for clients.

mod model;
mod repository;

pub use model::{ClientDB, NewClientDB, PortfolioDB};
pub use repository::ClientRepository;
