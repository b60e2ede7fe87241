use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Process-wide "today" used for trade dates, settlement and valuation.
///
/// Only moves when advanced explicitly. Every save bumps `version`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationDate {
    pub current_date: NaiveDate,
    pub initial_date: NaiveDate,
    pub days_advanced: i64,
    pub version: i64,
    pub updated_by: String,
    pub last_updated_at: NaiveDateTime,
    pub description: Option<String>,
}

impl SimulationDate {
    pub fn initial(date: NaiveDate, acting_user: &str, now: NaiveDateTime) -> Self {
        SimulationDate {
            current_date: date,
            initial_date: date,
            days_advanced: 0,
            version: 0,
            updated_by: acting_user.to_string(),
            last_updated_at: now,
            description: Some("Simulation started".to_string()),
        }
    }
}
