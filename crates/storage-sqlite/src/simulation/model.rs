use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use backoffice_core::simulation::SimulationDate;

/// The only row of `simulation_date`; `id` is always 1.
#[derive(Queryable, Insertable, Selectable, AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::simulation_date)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SimulationDateDB {
    pub id: i64,
    pub business_date: NaiveDate,
    pub initial_date: NaiveDate,
    pub days_advanced: i64,
    pub version: i64,
    pub updated_by: String,
    pub last_updated_at: NaiveDateTime,
    pub description: Option<String>,
}

pub const SIMULATION_ROW_ID: i64 = 1;

impl From<SimulationDateDB> for SimulationDate {
    fn from(db: SimulationDateDB) -> Self {
        SimulationDate {
            current_date: db.business_date,
            initial_date: db.initial_date,
            days_advanced: db.days_advanced,
            version: db.version,
            updated_by: db.updated_by,
            last_updated_at: db.last_updated_at,
            description: db.description,
        }
    }
}

impl SimulationDateDB {
    pub fn from_domain(domain: SimulationDate, version: i64) -> Self {
        Self {
            id: SIMULATION_ROW_ID,
            business_date: domain.current_date,
            initial_date: domain.initial_date,
            days_advanced: domain.days_advanced,
            version,
            updated_by: domain.updated_by,
            last_updated_at: domain.last_updated_at,
            description: domain.description,
        }
    }
}
