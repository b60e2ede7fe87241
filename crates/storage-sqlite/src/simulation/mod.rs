//! SQLite storage for the single-row simulation clock.

mod model;
mod repository;

pub use model::SimulationDateDB;
pub use repository::SimulationRepository;
