//! Clients module - onboarding and lookup.

mod clients_model;
mod clients_service;
mod clients_traits;

pub use clients_model::{Client, ClientSearch, ClientType, NewClient};
pub use clients_service::ClientService;
pub use clients_traits::{ClientRepositoryTrait, ClientServiceTrait};
