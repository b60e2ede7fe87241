use log::{debug, info};
use std::sync::Arc;

use super::clients_model::{Client, ClientSearch, NewClient};
use super::clients_traits::{ClientRepositoryTrait, ClientServiceTrait};
use crate::errors::Result;

/// Service for onboarding and looking up clients.
pub struct ClientService {
    repository: Arc<dyn ClientRepositoryTrait>,
}

impl ClientService {
    pub fn new(repository: Arc<dyn ClientRepositoryTrait>) -> Self {
        Self { repository }
    }
}

impl ClientServiceTrait for ClientService {
    fn create_client(&self, new_client: NewClient) -> Result<Client> {
        new_client.validate()?;
        let normalized = NewClient {
            full_name: new_client.full_name.trim().to_string(),
            email: new_client.email.trim().to_lowercase(),
            tax_id: new_client
                .tax_id
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
            ..new_client
        };
        let client = self.repository.create(normalized)?;
        info!("Onboarded client {} ({})", client.id, client.client_type);
        Ok(client)
    }

    fn get_client(&self, client_id: i64) -> Result<Client> {
        self.repository.get_by_id(client_id)
    }

    fn list_clients(&self, active_only: bool) -> Result<Vec<Client>> {
        self.repository.list(active_only)
    }

    fn search_clients(&self, search: ClientSearch) -> Result<Vec<Client>> {
        let query = search.query.trim();
        if query.is_empty() {
            return self.repository.list(search.active_only);
        }
        debug!("Searching clients for '{}'", query);
        self.repository.search(&ClientSearch {
            query: query.to_string(),
            ..search
        })
    }
}
