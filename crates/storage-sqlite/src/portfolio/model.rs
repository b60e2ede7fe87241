//! Database model for portfolio items.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use backoffice_core::portfolio::PortfolioItem;

use crate::errors::StorageError;
use crate::utils::parse_decimal;

#[derive(Queryable, Identifiable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::portfolio_items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PortfolioItemDB {
    pub id: i64,
    pub portfolio_id: i64,
    pub stock_id: i64,
    pub account_id: i64,
    pub quantity: i64,
    pub avg_price: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::portfolio_items)]
pub struct NewPortfolioItemDB {
    pub portfolio_id: i64,
    pub stock_id: i64,
    pub account_id: i64,
    pub quantity: i64,
    pub avg_price: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<PortfolioItemDB> for PortfolioItem {
    type Error = StorageError;

    fn try_from(db: PortfolioItemDB) -> Result<Self, Self::Error> {
        Ok(PortfolioItem {
            id: db.id,
            portfolio_id: db.portfolio_id,
            stock_id: db.stock_id,
            account_id: db.account_id,
            quantity: db.quantity,
            avg_price: parse_decimal(&db.avg_price, "portfolio_items.avg_price")?,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}
