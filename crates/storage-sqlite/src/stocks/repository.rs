use chrono::NaiveDate;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use log::debug;
use std::sync::Arc;

use super::model::{NewStockDB, NewStockDailyPriceDB, StockDB, StockDailyPriceDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::{is_unique_violation, IntoCore, StorageError};
use crate::schema::{stock_daily_prices, stocks};
use crate::utils::decimal_to_text;
use backoffice_core::errors::{Error, Result};
use backoffice_core::stocks::{
    NewStock, NewStockDailyPrice, Stock, StockDailyPrice, StockRepositoryTrait,
};

pub struct StockRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl StockRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }
}

fn to_stocks(rows: Vec<StockDB>) -> Result<Vec<Stock>> {
    rows.into_iter()
        .map(|r| Stock::try_from(r).map_err(Error::from))
        .collect()
}

fn insert_stock(conn: &mut SqliteConnection, new_stock: NewStock) -> Result<Stock> {
    let row = NewStockDB::from_domain(new_stock, chrono::Utc::now().naive_utc());
    let code = row.code.clone();
    let inserted = diesel::insert_into(stocks::table)
        .values(&row)
        .returning(StockDB::as_returning())
        .get_result::<StockDB>(conn)
        .map_err(|e| {
            if is_unique_violation(&e) {
                Error::invalid(format!("Stock code already exists: {}", code))
            } else {
                StorageError::from(e).into()
            }
        })?;
    Ok(Stock::try_from(inserted)?)
}

impl StockRepositoryTrait for StockRepository {
    fn get_by_id(&self, stock_id: i64) -> Result<Stock> {
        let mut conn = get_connection(&self.pool)?;
        let row = stocks::table
            .find(stock_id)
            .select(StockDB::as_select())
            .first::<StockDB>(&mut conn)
            .optional()
            .into_core()?
            .ok_or_else(|| Error::not_found("stock", stock_id))?;
        Ok(Stock::try_from(row)?)
    }

    fn get_by_code(&self, code: &str) -> Result<Stock> {
        let mut conn = get_connection(&self.pool)?;
        let row = stocks::table
            .filter(stocks::code.eq(code))
            .select(StockDB::as_select())
            .first::<StockDB>(&mut conn)
            .optional()
            .into_core()?
            .ok_or_else(|| Error::not_found("stock", code))?;
        Ok(Stock::try_from(row)?)
    }

    fn list(&self, active_only: bool) -> Result<Vec<Stock>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = stocks::table.into_boxed();
        if active_only {
            query = query.filter(stocks::is_active.eq(true));
        }
        let rows = query
            .select(StockDB::as_select())
            .order(stocks::code.asc())
            .load::<StockDB>(&mut conn)
            .into_core()?;
        to_stocks(rows)
    }

    fn create(&self, new_stock: NewStock) -> Result<Stock> {
        self.writer.exec(move |conn| insert_stock(conn, new_stock))
    }

    fn upsert_definitions(&self, definitions: Vec<NewStock>) -> Result<usize> {
        self.writer.exec(move |conn| {
            let count = definitions.len();
            let now = chrono::Utc::now().naive_utc();
            for def in definitions {
                let updated = diesel::update(stocks::table.filter(stocks::code.eq(&def.code)))
                    .set((
                        stocks::name.eq(&def.name),
                        stocks::sector.eq(&def.sector),
                        stocks::exchange_code.eq(&def.exchange_code),
                        stocks::is_active.eq(def.is_active),
                        stocks::updated_at.eq(now),
                    ))
                    .execute(conn)
                    .into_core()?;
                if updated == 0 {
                    insert_stock(conn, def)?;
                }
            }
            Ok(count)
        })
    }

    fn save_closing_prices(&self, prices: Vec<NewStockDailyPrice>) -> Result<usize> {
        self.writer.exec(move |conn| {
            let now = chrono::Utc::now().naive_utc();
            let mut saved = 0;
            for price in &prices {
                let inserted = diesel::insert_or_ignore_into(stock_daily_prices::table)
                    .values(NewStockDailyPriceDB::from_domain(price, now))
                    .execute(conn)
                    .into_core()?;
                if inserted == 0 {
                    continue;
                }
                diesel::update(stocks::table.find(price.stock_id))
                    .set((
                        stocks::current_price.eq(decimal_to_text(price.close)),
                        stocks::updated_at.eq(now),
                    ))
                    .execute(conn)
                    .into_core()?;
                saved += 1;
            }
            debug!("Saved {} of {} closing prices", saved, prices.len());
            Ok(saved)
        })
    }

    fn get_daily_prices(&self, date: NaiveDate) -> Result<Vec<StockDailyPrice>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = stock_daily_prices::table
            .filter(stock_daily_prices::price_date.eq(date))
            .select(StockDailyPriceDB::as_select())
            .order(stock_daily_prices::stock_id.asc())
            .load::<StockDailyPriceDB>(&mut conn)
            .into_core()?;
        rows.into_iter()
            .map(|r| StockDailyPrice::try_from(r).map_err(Error::from))
            .collect()
    }

    fn has_official_close(&self, date: NaiveDate) -> Result<bool> {
        let mut conn = get_connection(&self.pool)?;
        diesel::select(exists(
            stock_daily_prices::table
                .filter(stock_daily_prices::price_date.eq(date))
                .filter(stock_daily_prices::official_close.eq(true)),
        ))
        .get_result::<bool>(&mut conn)
        .into_core()
    }

    fn delete_prices_for_date(&self, date: NaiveDate) -> Result<usize> {
        self.writer.exec(move |conn| {
            diesel::delete(
                stock_daily_prices::table.filter(stock_daily_prices::price_date.eq(date)),
            )
            .execute(conn)
            .into_core()
        })
    }
}
