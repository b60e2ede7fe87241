use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use super::model::{NewPortfolioItemDB, PortfolioItemDB};
use crate::clients::PortfolioDB;
use crate::db::get_connection;
use crate::errors::IntoCore;
use crate::schema::{portfolio_items, portfolios};
use crate::utils::decimal_to_text;
use backoffice_core::errors::{Error, Result};
use backoffice_core::orders::HoldingChange;
use backoffice_core::portfolio::{Portfolio, PortfolioItem, PortfolioRepositoryTrait};

/// Read side of portfolios. Items are written by the order repository.
pub struct PortfolioRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
}

impl PortfolioRepository {
    pub fn new(pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }
}

pub fn portfolio_id_for(conn: &mut SqliteConnection, client_id: i64) -> Result<i64> {
    portfolios::table
        .filter(portfolios::client_id.eq(client_id))
        .select(portfolios::id)
        .first::<i64>(conn)
        .optional()
        .into_core()?
        .ok_or_else(|| Error::not_found("portfolio", client_id))
}

pub fn find_item(
    conn: &mut SqliteConnection,
    portfolio_id: i64,
    stock_id: i64,
    account_id: i64,
) -> Result<Option<PortfolioItem>> {
    let row = portfolio_items::table
        .filter(portfolio_items::portfolio_id.eq(portfolio_id))
        .filter(portfolio_items::stock_id.eq(stock_id))
        .filter(portfolio_items::account_id.eq(account_id))
        .select(PortfolioItemDB::as_select())
        .first::<PortfolioItemDB>(conn)
        .optional()
        .into_core()?;
    match row {
        Some(r) => Ok(Some(PortfolioItem::try_from(r)?)),
        None => Ok(None),
    }
}

/// Writes a planned holding change. Must run inside the write transaction
/// that produced the plan.
pub fn apply_holding_change(
    conn: &mut SqliteConnection,
    change: &HoldingChange,
    portfolio_id: i64,
    stock_id: i64,
    account_id: i64,
) -> Result<()> {
    let now = chrono::Utc::now().naive_utc();
    match change {
        HoldingChange::Create {
            quantity,
            avg_price,
        } => {
            diesel::insert_into(portfolio_items::table)
                .values(NewPortfolioItemDB {
                    portfolio_id,
                    stock_id,
                    account_id,
                    quantity: *quantity,
                    avg_price: decimal_to_text(*avg_price),
                    created_at: now,
                    updated_at: now,
                })
                .execute(conn)
                .into_core()?;
        }
        HoldingChange::Update {
            item_id,
            quantity,
            avg_price,
        } => {
            let updated = diesel::update(portfolio_items::table.find(*item_id))
                .set((
                    portfolio_items::quantity.eq(*quantity),
                    portfolio_items::avg_price.eq(decimal_to_text(*avg_price)),
                    portfolio_items::updated_at.eq(now),
                ))
                .execute(conn)
                .into_core()?;
            if updated == 0 {
                return Err(Error::not_found("portfolio item", item_id));
            }
        }
        HoldingChange::Delete { item_id } => {
            diesel::delete(portfolio_items::table.find(*item_id))
                .execute(conn)
                .into_core()?;
        }
    }
    Ok(())
}

impl PortfolioRepositoryTrait for PortfolioRepository {
    fn get_by_client(&self, client_id: i64) -> Result<Portfolio> {
        let mut conn = get_connection(&self.pool)?;
        let row = portfolios::table
            .filter(portfolios::client_id.eq(client_id))
            .select(PortfolioDB::as_select())
            .first::<PortfolioDB>(&mut conn)
            .optional()
            .into_core()?
            .ok_or_else(|| Error::not_found("portfolio", client_id))?;
        Ok(row.into())
    }

    fn list(&self) -> Result<Vec<Portfolio>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = portfolios::table
            .select(PortfolioDB::as_select())
            .order(portfolios::id.asc())
            .load::<PortfolioDB>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(Portfolio::from).collect())
    }

    fn get_items(&self, portfolio_id: i64) -> Result<Vec<PortfolioItem>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = portfolio_items::table
            .filter(portfolio_items::portfolio_id.eq(portfolio_id))
            .select(PortfolioItemDB::as_select())
            .order((portfolio_items::stock_id.asc(), portfolio_items::account_id.asc()))
            .load::<PortfolioItemDB>(&mut conn)
            .into_core()?;
        rows.into_iter()
            .map(|r| PortfolioItem::try_from(r).map_err(Error::from))
            .collect()
    }

    fn find_item(
        &self,
        portfolio_id: i64,
        stock_id: i64,
        account_id: i64,
    ) -> Result<Option<PortfolioItem>> {
        let mut conn = get_connection(&self.pool)?;
        find_item(&mut conn, portfolio_id, stock_id, account_id)
    }
}
