use chrono::NaiveDate;

use super::simulation_model::SimulationDate;
use crate::errors::Result;

pub trait SimulationRepositoryTrait: Send + Sync {
    fn get(&self) -> Result<Option<SimulationDate>>;

    /// Writes `next` when the stored version still equals `expected_version`
    /// (`None` meaning no row yet). The stored version becomes
    /// `expected_version + 1`. A lost race yields `StaleSimulationDate`.
    fn save(&self, next: SimulationDate, expected_version: Option<i64>) -> Result<SimulationDate>;
}

pub trait SimulationServiceTrait: Send + Sync {
    /// The stored simulation date, created on first use.
    fn current(&self) -> Result<SimulationDate>;

    fn current_date(&self) -> Result<NaiveDate> {
        Ok(self.current()?.current_date)
    }

    /// Moves to the next weekday.
    fn advance(&self, acting_user: &str) -> Result<SimulationDate>;

    /// Starts over from the local date, rolled forward past weekends.
    fn reset(&self, acting_user: &str) -> Result<SimulationDate>;
}
