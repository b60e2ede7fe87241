//! Simulation clock - the versioned business date.

mod simulation_model;
mod simulation_service;
mod simulation_traits;

pub use simulation_model::SimulationDate;
pub use simulation_service::SimulationService;
pub use simulation_traits::{SimulationRepositoryTrait, SimulationServiceTrait};
