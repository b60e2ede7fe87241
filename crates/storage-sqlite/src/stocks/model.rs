//! Database models for stocks and their daily price rows.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use backoffice_core::stocks::{NewStock, NewStockDailyPrice, Stock, StockDailyPrice};

use crate::errors::StorageError;
use crate::utils::{decimal_to_text, parse_decimal};

#[derive(Queryable, Identifiable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::stocks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StockDB {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub sector: Option<String>,
    pub exchange_code: Option<String>,
    pub current_price: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::stocks)]
pub struct NewStockDB {
    pub code: String,
    pub name: String,
    pub sector: Option<String>,
    pub exchange_code: Option<String>,
    pub current_price: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<StockDB> for Stock {
    type Error = StorageError;

    fn try_from(db: StockDB) -> Result<Self, Self::Error> {
        Ok(Stock {
            id: db.id,
            code: db.code,
            name: db.name,
            sector: db.sector,
            exchange_code: db.exchange_code,
            current_price: parse_decimal(&db.current_price, "stocks.current_price")?,
            is_active: db.is_active,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl NewStockDB {
    pub fn from_domain(domain: NewStock, now: NaiveDateTime) -> Self {
        Self {
            code: domain.code,
            name: domain.name,
            sector: domain.sector,
            exchange_code: domain.exchange_code,
            current_price: decimal_to_text(domain.current_price),
            is_active: domain.is_active,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Queryable, Identifiable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::stock_daily_prices)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StockDailyPriceDB {
    pub id: i64,
    pub stock_id: i64,
    pub price_date: NaiveDate,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: String,
    pub change_percentage: String,
    pub official_close: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::stock_daily_prices)]
pub struct NewStockDailyPriceDB {
    pub stock_id: i64,
    pub price_date: NaiveDate,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: String,
    pub change_percentage: String,
    pub official_close: bool,
    pub created_at: NaiveDateTime,
}

impl TryFrom<StockDailyPriceDB> for StockDailyPrice {
    type Error = StorageError;

    fn try_from(db: StockDailyPriceDB) -> Result<Self, Self::Error> {
        Ok(StockDailyPrice {
            id: db.id,
            stock_id: db.stock_id,
            price_date: db.price_date,
            open: parse_decimal(&db.open, "stock_daily_prices.open")?,
            high: parse_decimal(&db.high, "stock_daily_prices.high")?,
            low: parse_decimal(&db.low, "stock_daily_prices.low")?,
            close: parse_decimal(&db.close, "stock_daily_prices.close")?,
            volume: parse_decimal(&db.volume, "stock_daily_prices.volume")?,
            change_percentage: parse_decimal(
                &db.change_percentage,
                "stock_daily_prices.change_percentage",
            )?,
            official_close: db.official_close,
            created_at: db.created_at,
        })
    }
}

impl NewStockDailyPriceDB {
    pub fn from_domain(domain: &NewStockDailyPrice, now: NaiveDateTime) -> Self {
        Self {
            stock_id: domain.stock_id,
            price_date: domain.price_date,
            open: decimal_to_text(domain.open),
            high: decimal_to_text(domain.high),
            low: decimal_to_text(domain.low),
            close: decimal_to_text(domain.close),
            volume: decimal_to_text(domain.volume),
            change_percentage: decimal_to_text(domain.change_percentage),
            official_close: domain.official_close,
            created_at: now,
        }
    }
}
