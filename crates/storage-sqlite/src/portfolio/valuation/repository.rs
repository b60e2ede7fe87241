use chrono::NaiveDate;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use super::model::{
    NewPortfolioDailyValuationDB, NewValuationPositionDB, PortfolioDailyValuationDB,
    ValuationPositionDB,
};
use crate::db::{get_connection, WriteHandle};
use crate::errors::{is_unique_violation, IntoCore, StorageError};
use crate::schema::portfolio_daily_valuations as valuations;
use crate::schema::portfolio_valuation_positions as positions;
use backoffice_core::errors::{ConflictError, Error, Result};
use backoffice_core::portfolio::valuation::{
    NewPortfolioDailyValuation, PortfolioDailyValuation, PositionValuation,
    ValuationRepositoryTrait,
};

pub struct ValuationRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl ValuationRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn to_domain(rows: Vec<PortfolioDailyValuationDB>) -> Result<Vec<PortfolioDailyValuation>> {
    rows.into_iter()
        .map(|r| PortfolioDailyValuation::try_from(r).map_err(Error::from))
        .collect()
}

impl ValuationRepositoryTrait for ValuationRepository {
    fn insert_locked(
        &self,
        valuation: NewPortfolioDailyValuation,
        position_rows: Vec<PositionValuation>,
    ) -> Result<PortfolioDailyValuation> {
        self.writer.exec(move |conn| {
            let (client, date) = (valuation.client_id, valuation.valuation_date);
            let row = NewPortfolioDailyValuationDB::from_domain(
                valuation,
                chrono::Utc::now().naive_utc(),
            );
            let inserted = diesel::insert_into(valuations::table)
                .values(&row)
                .returning(PortfolioDailyValuationDB::as_returning())
                .get_result::<PortfolioDailyValuationDB>(conn)
                .map_err(|e| -> Error {
                    if is_unique_violation(&e) {
                        ConflictError::ValuationLocked {
                            client_id: client,
                            date,
                        }
                        .into()
                    } else {
                        StorageError::from(e).into()
                    }
                })?;

            let rows: Vec<NewValuationPositionDB> = position_rows
                .into_iter()
                .map(|p| NewValuationPositionDB::from_domain(inserted.id, p))
                .collect();
            if !rows.is_empty() {
                diesel::insert_into(positions::table)
                    .values(&rows)
                    .execute(conn)
                    .into_core()?;
            }
            Ok(PortfolioDailyValuation::try_from(inserted)?)
        })
    }

    fn get_positions(&self, valuation_id: i64) -> Result<Vec<PositionValuation>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = positions::table
            .filter(positions::valuation_id.eq(valuation_id))
            .order(positions::id.asc())
            .select(ValuationPositionDB::as_select())
            .load::<ValuationPositionDB>(&mut conn)
            .into_core()?;
        rows.into_iter()
            .map(|r| PositionValuation::try_from(r).map_err(Error::from))
            .collect()
    }

    fn get(&self, client: i64, date: NaiveDate) -> Result<Option<PortfolioDailyValuation>> {
        let mut conn = get_connection(&self.pool)?;
        let row = valuations::table
            .filter(valuations::client_id.eq(client))
            .filter(valuations::valuation_date.eq(date))
            .select(PortfolioDailyValuationDB::as_select())
            .first::<PortfolioDailyValuationDB>(&mut conn)
            .optional()
            .into_core()?;
        match row {
            Some(r) => Ok(Some(PortfolioDailyValuation::try_from(r)?)),
            None => Ok(None),
        }
    }

    fn get_latest_before(
        &self,
        client: i64,
        date: NaiveDate,
    ) -> Result<Option<PortfolioDailyValuation>> {
        let mut conn = get_connection(&self.pool)?;
        let row = valuations::table
            .filter(valuations::client_id.eq(client))
            .filter(valuations::valuation_date.lt(date))
            .filter(valuations::locked.eq(true))
            .order(valuations::valuation_date.desc())
            .select(PortfolioDailyValuationDB::as_select())
            .first::<PortfolioDailyValuationDB>(&mut conn)
            .optional()
            .into_core()?;
        match row {
            Some(r) => Ok(Some(PortfolioDailyValuation::try_from(r)?)),
            None => Ok(None),
        }
    }

    fn list_for_date(&self, date: NaiveDate) -> Result<Vec<PortfolioDailyValuation>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = valuations::table
            .filter(valuations::valuation_date.eq(date))
            .order(valuations::client_id.asc())
            .select(PortfolioDailyValuationDB::as_select())
            .load::<PortfolioDailyValuationDB>(&mut conn)
            .into_core()?;
        to_domain(rows)
    }

    fn history(
        &self,
        client: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PortfolioDailyValuation>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = valuations::table
            .filter(valuations::client_id.eq(client))
            .filter(valuations::valuation_date.ge(from))
            .filter(valuations::valuation_date.le(to))
            .order(valuations::valuation_date.asc())
            .select(PortfolioDailyValuationDB::as_select())
            .load::<PortfolioDailyValuationDB>(&mut conn)
            .into_core()?;
        to_domain(rows)
    }

    fn exists_for_date(&self, date: NaiveDate) -> Result<bool> {
        let mut conn = get_connection(&self.pool)?;
        diesel::select(exists(
            valuations::table.filter(valuations::valuation_date.eq(date)),
        ))
        .get_result::<bool>(&mut conn)
        .into_core()
    }

    fn delete_for_date(&self, date: NaiveDate) -> Result<usize> {
        self.writer.exec(move |conn| {
            let ids = valuations::table
                .filter(valuations::valuation_date.eq(date))
                .select(valuations::id);
            diesel::delete(positions::table.filter(positions::valuation_id.eq_any(ids)))
                .execute(conn)
                .into_core()?;
            diesel::delete(valuations::table.filter(valuations::valuation_date.eq(date)))
                .execute(conn)
                .into_core()
        })
    }
}
