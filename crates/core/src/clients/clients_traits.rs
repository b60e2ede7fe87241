//! Client repository and service traits.

use super::clients_model::{Client, ClientSearch, NewClient};
use crate::errors::Result;

/// Persistence contract for clients.
pub trait ClientRepositoryTrait: Send + Sync {
    /// Inserts the client together with its portfolio in one transaction.
    fn create(&self, new_client: NewClient) -> Result<Client>;

    fn get_by_id(&self, client_id: i64) -> Result<Client>;

    /// Lists clients, optionally only active ones, ordered by id.
    fn list(&self, active_only: bool) -> Result<Vec<Client>>;

    /// Clients whose name, email or tax id contains the query, ignoring
    /// case, ordered by id.
    fn search(&self, search: &ClientSearch) -> Result<Vec<Client>>;
}

pub trait ClientServiceTrait: Send + Sync {
    fn create_client(&self, new_client: NewClient) -> Result<Client>;

    fn get_client(&self, client_id: i64) -> Result<Client>;

    fn list_clients(&self, active_only: bool) -> Result<Vec<Client>>;

    fn search_clients(&self, search: ClientSearch) -> Result<Vec<Client>>;
}
