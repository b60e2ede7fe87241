use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use log::debug;
use std::sync::Arc;

use super::model::{ClientDB, NewClientDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::{is_unique_violation, IntoCore, StorageError};
use crate::schema::{clients, portfolios};
use crate::utils::contains_pattern;
use backoffice_core::clients::{Client, ClientRepositoryTrait, ClientSearch, NewClient};
use backoffice_core::errors::{Error, Result};

/// Repository for clients. Creating a client also opens its portfolio.
pub struct ClientRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl ClientRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }
}

impl ClientRepositoryTrait for ClientRepository {
    fn create(&self, new_client: NewClient) -> Result<Client> {
        self.writer.exec(move |conn| {
            let now = chrono::Utc::now().naive_utc();
            let email = new_client.email.clone();
            let row = NewClientDB {
                full_name: new_client.full_name,
                client_type: new_client.client_type.as_str().to_string(),
                email: new_client.email,
                tax_id: new_client.tax_id,
                is_active: true,
                created_at: now,
            };

            let client_db = diesel::insert_into(clients::table)
                .values(&row)
                .returning(ClientDB::as_returning())
                .get_result::<ClientDB>(conn)
                .map_err(|e| {
                    if is_unique_violation(&e) {
                        Error::invalid(format!("Email already registered: {}", email))
                    } else {
                        StorageError::from(e).into()
                    }
                })?;

            diesel::insert_into(portfolios::table)
                .values((
                    portfolios::client_id.eq(client_db.id),
                    portfolios::created_at.eq(now),
                ))
                .execute(conn)
                .into_core()?;

            debug!("Inserted client {} with its portfolio", client_db.id);
            Ok(Client::try_from(client_db)?)
        })
    }

    fn get_by_id(&self, client_id: i64) -> Result<Client> {
        let mut conn = get_connection(&self.pool)?;
        let row = clients::table
            .find(client_id)
            .select(ClientDB::as_select())
            .first::<ClientDB>(&mut conn)
            .optional()
            .into_core()?
            .ok_or_else(|| Error::not_found("client", client_id))?;
        Ok(Client::try_from(row)?)
    }

    fn list(&self, active_only: bool) -> Result<Vec<Client>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = clients::table.into_boxed();
        if active_only {
            query = query.filter(clients::is_active.eq(true));
        }
        let rows = query
            .select(ClientDB::as_select())
            .order(clients::id.asc())
            .load::<ClientDB>(&mut conn)
            .into_core()?;
        rows.into_iter()
            .map(|r| Client::try_from(r).map_err(Error::from))
            .collect()
    }

    fn search(&self, search: &ClientSearch) -> Result<Vec<Client>> {
        let mut conn = get_connection(&self.pool)?;
        let pattern = contains_pattern(&search.query);
        let mut query = clients::table
            .filter(
                clients::full_name
                    .like(pattern.clone())
                    .escape('\\')
                    .or(clients::email.like(pattern.clone()).escape('\\'))
                    .or(clients::tax_id.assume_not_null().like(pattern).escape('\\')),
            )
            .into_boxed();
        if search.active_only {
            query = query.filter(clients::is_active.eq(true));
        }
        let rows = query
            .select(ClientDB::as_select())
            .order(clients::id.asc())
            .load::<ClientDB>(&mut conn)
            .into_core()?;
        rows.into_iter()
            .map(|r| Client::try_from(r).map_err(Error::from))
            .collect()
    }
}
