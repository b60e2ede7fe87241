use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use backoffice_core::portfolio::valuation::{
    NewPortfolioDailyValuation, PortfolioDailyValuation, PositionValuation,
};

use crate::errors::StorageError;
use crate::utils::{decimal_to_text, parse_decimal, parse_enum};

#[derive(Queryable, Identifiable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::portfolio_daily_valuations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PortfolioDailyValuationDB {
    pub id: i64,
    pub client_id: i64,
    pub valuation_date: NaiveDate,
    pub total_portfolio_value: String,
    pub unrealized_profit_loss: String,
    pub daily_change_percentage: String,
    pub total_return_percentage: String,
    pub initial_investment: String,
    pub previous_day_value: String,
    pub locked: bool,
    pub created_by: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::portfolio_daily_valuations)]
pub struct NewPortfolioDailyValuationDB {
    pub client_id: i64,
    pub valuation_date: NaiveDate,
    pub total_portfolio_value: String,
    pub unrealized_profit_loss: String,
    pub daily_change_percentage: String,
    pub total_return_percentage: String,
    pub initial_investment: String,
    pub previous_day_value: String,
    pub locked: bool,
    pub created_by: String,
    pub created_at: NaiveDateTime,
}

impl TryFrom<PortfolioDailyValuationDB> for PortfolioDailyValuation {
    type Error = StorageError;

    fn try_from(db: PortfolioDailyValuationDB) -> Result<Self, Self::Error> {
        let col = |v: &str, name: &str| parse_decimal(v, name);
        Ok(PortfolioDailyValuation {
            id: db.id,
            client_id: db.client_id,
            valuation_date: db.valuation_date,
            total_portfolio_value: col(&db.total_portfolio_value, "total_portfolio_value")?,
            unrealized_profit_loss: col(&db.unrealized_profit_loss, "unrealized_profit_loss")?,
            daily_change_percentage: col(&db.daily_change_percentage, "daily_change_percentage")?,
            total_return_percentage: col(&db.total_return_percentage, "total_return_percentage")?,
            initial_investment: col(&db.initial_investment, "initial_investment")?,
            previous_day_value: col(&db.previous_day_value, "previous_day_value")?,
            locked: db.locked,
            created_by: db.created_by,
            created_at: db.created_at,
        })
    }
}

impl NewPortfolioDailyValuationDB {
    pub fn from_domain(domain: NewPortfolioDailyValuation, now: NaiveDateTime) -> Self {
        Self {
            client_id: domain.client_id,
            valuation_date: domain.valuation_date,
            total_portfolio_value: decimal_to_text(domain.total_portfolio_value),
            unrealized_profit_loss: decimal_to_text(domain.unrealized_profit_loss),
            daily_change_percentage: decimal_to_text(domain.daily_change_percentage),
            total_return_percentage: decimal_to_text(domain.total_return_percentage),
            initial_investment: decimal_to_text(domain.initial_investment),
            previous_day_value: decimal_to_text(domain.previous_day_value),
            locked: domain.locked,
            created_by: domain.created_by,
            created_at: now,
        }
    }
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::portfolio_valuation_positions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ValuationPositionDB {
    pub id: i64,
    pub valuation_id: i64,
    pub stock_id: i64,
    pub stock_code: String,
    pub account_id: i64,
    pub quantity: i64,
    pub avg_price: String,
    pub cost: String,
    pub close_price: String,
    pub market_value: String,
    pub unrealized_profit_loss: String,
    pub change_percentage: String,
    pub price_source: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::portfolio_valuation_positions)]
pub struct NewValuationPositionDB {
    pub valuation_id: i64,
    pub stock_id: i64,
    pub stock_code: String,
    pub account_id: i64,
    pub quantity: i64,
    pub avg_price: String,
    pub cost: String,
    pub close_price: String,
    pub market_value: String,
    pub unrealized_profit_loss: String,
    pub change_percentage: String,
    pub price_source: String,
}

impl TryFrom<ValuationPositionDB> for PositionValuation {
    type Error = StorageError;

    fn try_from(db: ValuationPositionDB) -> Result<Self, Self::Error> {
        let col = |v: &str, name: &str| parse_decimal(v, name);
        Ok(PositionValuation {
            stock_id: db.stock_id,
            stock_code: db.stock_code,
            account_id: db.account_id,
            quantity: db.quantity,
            avg_price: col(&db.avg_price, "avg_price")?,
            cost: col(&db.cost, "cost")?,
            close_price: col(&db.close_price, "close_price")?,
            market_value: col(&db.market_value, "market_value")?,
            unrealized_profit_loss: col(&db.unrealized_profit_loss, "unrealized_profit_loss")?,
            change_percentage: col(&db.change_percentage, "change_percentage")?,
            price_source: parse_enum(&db.price_source, "price_source")?,
        })
    }
}

impl NewValuationPositionDB {
    pub fn from_domain(valuation_id: i64, domain: PositionValuation) -> Self {
        Self {
            valuation_id,
            stock_id: domain.stock_id,
            stock_code: domain.stock_code,
            account_id: domain.account_id,
            quantity: domain.quantity,
            avg_price: decimal_to_text(domain.avg_price),
            cost: decimal_to_text(domain.cost),
            close_price: decimal_to_text(domain.close_price),
            market_value: decimal_to_text(domain.market_value),
            unrealized_profit_loss: decimal_to_text(domain.unrealized_profit_loss),
            change_percentage: decimal_to_text(domain.change_percentage),
            price_source: domain.price_source.as_str().to_string(),
        }
    }
}
