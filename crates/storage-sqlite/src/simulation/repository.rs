use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use super::model::{SimulationDateDB, SIMULATION_ROW_ID};
use crate::db::{get_connection, WriteHandle};
use crate::errors::{is_unique_violation, IntoCore, StorageError};
use crate::schema::simulation_date;
use backoffice_core::errors::{ConflictError, Error, Result};
use backoffice_core::simulation::{SimulationDate, SimulationRepositoryTrait};

pub struct SimulationRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl SimulationRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }
}

fn stale(expected: Option<i64>) -> Error {
    ConflictError::StaleSimulationDate {
        expected: expected.unwrap_or(0),
    }
    .into()
}

impl SimulationRepositoryTrait for SimulationRepository {
    fn get(&self) -> Result<Option<SimulationDate>> {
        let mut conn = get_connection(&self.pool)?;
        let row = simulation_date::table
            .find(SIMULATION_ROW_ID)
            .select(SimulationDateDB::as_select())
            .first::<SimulationDateDB>(&mut conn)
            .optional()
            .into_core()?;
        Ok(row.map(SimulationDate::from))
    }

    fn save(&self, next: SimulationDate, expected_version: Option<i64>) -> Result<SimulationDate> {
        self.writer.exec(move |conn| {
            let row = match expected_version {
                None => {
                    let row = SimulationDateDB::from_domain(next, 1);
                    diesel::insert_into(simulation_date::table)
                        .values(&row)
                        .execute(conn)
                        .map_err(|e| {
                            if is_unique_violation(&e) {
                                stale(expected_version)
                            } else {
                                StorageError::from(e).into()
                            }
                        })?;
                    row
                }
                Some(expected) => {
                    let row = SimulationDateDB::from_domain(next, expected + 1);
                    let updated = diesel::update(
                        simulation_date::table
                            .find(SIMULATION_ROW_ID)
                            .filter(simulation_date::version.eq(expected)),
                    )
                    .set(&row)
                    .execute(conn)
                    .into_core()?;
                    if updated == 0 {
                        return Err(stale(expected_version));
                    }
                    row
                }
            };
            Ok(SimulationDate::from(row))
        })
    }
}
