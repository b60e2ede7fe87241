//! Database models for clients and their portfolios.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use backoffice_core::clients::Client;
use backoffice_core::portfolio::Portfolio;

use crate::errors::StorageError;
use crate::utils::parse_enum;

#[derive(Queryable, Identifiable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::clients)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ClientDB {
    pub id: i64,
    pub full_name: String,
    pub client_type: String,
    pub email: String,
    pub tax_id: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::clients)]
pub struct NewClientDB {
    pub full_name: String,
    pub client_type: String,
    pub email: String,
    pub tax_id: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

impl TryFrom<ClientDB> for Client {
    type Error = StorageError;

    fn try_from(db: ClientDB) -> Result<Self, Self::Error> {
        Ok(Client {
            id: db.id,
            full_name: db.full_name,
            client_type: parse_enum(&db.client_type, "clients.client_type")?,
            email: db.email,
            tax_id: db.tax_id,
            is_active: db.is_active,
            created_at: db.created_at,
        })
    }
}

#[derive(Queryable, Identifiable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::portfolios)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PortfolioDB {
    pub id: i64,
    pub client_id: i64,
    pub created_at: NaiveDateTime,
}

impl From<PortfolioDB> for Portfolio {
    fn from(db: PortfolioDB) -> Self {
        Portfolio {
            id: db.id,
            client_id: db.client_id,
            created_at: db.created_at,
        }
    }
}
