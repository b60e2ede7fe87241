use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::portfolio::valuation::ValuationRunSummary;
use crate::settlement::SettlementRunSummary;
use crate::simulation::SimulationDate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndOfDayStatus {
    pub date: NaiveDate,
    pub prices_updated: bool,
    pub valuation_completed: bool,
    pub status_message: String,
}

impl EndOfDayStatus {
    pub fn new(date: NaiveDate, prices_updated: bool, valuation_completed: bool) -> Self {
        let status_message = match (prices_updated, valuation_completed) {
            (true, true) => "End-of-day processing completed",
            (true, false) => "Closing prices loaded, valuation pending",
            (false, true) => "Valuation stored but closing prices are missing",
            (false, false) => "Closing prices not loaded",
        };
        Self {
            date,
            prices_updated,
            valuation_completed,
            status_message: status_message.to_string(),
        }
    }
}

/// Outcome of advancing the simulation by one full business day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayAdvanceSummary {
    pub previous_date: NaiveDate,
    pub simulation: SimulationDate,
    pub settlement: SettlementRunSummary,
    pub valuation: Option<ValuationRunSummary>,
    /// Why the valuation did not run, when it did not
    pub valuation_error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndOfDayReset {
    pub date: Option<NaiveDate>,
    pub prices_deleted: usize,
    pub valuations_deleted: usize,
}
