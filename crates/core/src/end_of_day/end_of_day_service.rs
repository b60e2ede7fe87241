use chrono::NaiveDate;
use log::{info, warn};
use std::sync::Arc;

use super::end_of_day_model::{DayAdvanceSummary, EndOfDayReset, EndOfDayStatus};
use crate::errors::{ConflictError, Error, Result};
use crate::portfolio::valuation::{ValuationRunSummary, ValuationServiceTrait};
use crate::settlement::{SettlementRunSummary, SettlementServiceTrait, SettlementStep, StepOutcome};
use crate::simulation::{SimulationDate, SimulationServiceTrait};
use crate::stocks::StockServiceTrait;

pub trait EndOfDayServiceTrait: Send + Sync {
    fn get_status(&self, date: Option<NaiveDate>) -> Result<EndOfDayStatus>;

    fn fetch_closing_prices(&self, date: Option<NaiveDate>) -> Result<StepOutcome>;

    fn run_settlement_step(&self, step: SettlementStep, date: Option<NaiveDate>)
        -> Result<StepOutcome>;

    fn run_all_settlement_steps(&self, date: Option<NaiveDate>) -> Result<SettlementRunSummary>;

    fn run_valuation(&self, date: Option<NaiveDate>, acting_user: &str)
        -> Result<ValuationRunSummary>;

    /// Advance date, settle, make sure prices are in, then value.
    fn advance_full_day(&self, acting_user: &str) -> Result<DayAdvanceSummary>;

    /// Deletes the date's closing prices and valuations.
    fn reset_end_of_day(&self, date: Option<NaiveDate>) -> Result<EndOfDayReset>;

    fn reset_simulation(&self, acting_user: &str) -> Result<SimulationDate>;
}

/// Orchestrates the batch jobs around the simulation date.
///
/// Operations taking an optional date default to the current simulation
/// date.
pub struct EndOfDayService {
    simulation: Arc<dyn SimulationServiceTrait>,
    settlement: Arc<dyn SettlementServiceTrait>,
    valuation: Arc<dyn ValuationServiceTrait>,
    stocks: Arc<dyn StockServiceTrait>,
}

impl EndOfDayService {
    pub fn new(
        simulation: Arc<dyn SimulationServiceTrait>,
        settlement: Arc<dyn SettlementServiceTrait>,
        valuation: Arc<dyn ValuationServiceTrait>,
        stocks: Arc<dyn StockServiceTrait>,
    ) -> Self {
        Self {
            simulation,
            settlement,
            valuation,
            stocks,
        }
    }

    fn resolve(&self, date: Option<NaiveDate>) -> Result<NaiveDate> {
        match date {
            Some(d) => Ok(d),
            None => self.simulation.current_date(),
        }
    }
}

impl EndOfDayServiceTrait for EndOfDayService {
    fn get_status(&self, date: Option<NaiveDate>) -> Result<EndOfDayStatus> {
        let date = self.resolve(date)?;
        Ok(EndOfDayStatus::new(
            date,
            self.stocks.has_official_close(date)?,
            self.valuation.is_valuation_completed(date)?,
        ))
    }

    fn fetch_closing_prices(&self, date: Option<NaiveDate>) -> Result<StepOutcome> {
        let date = self.resolve(date)?;
        self.settlement.fetch_latest_closing_prices(date)
    }

    fn run_settlement_step(
        &self,
        step: SettlementStep,
        date: Option<NaiveDate>,
    ) -> Result<StepOutcome> {
        let date = self.resolve(date)?;
        self.settlement.run_step(step, date)
    }

    fn run_all_settlement_steps(&self, date: Option<NaiveDate>) -> Result<SettlementRunSummary> {
        let date = self.resolve(date)?;
        self.settlement.process_all_settlement_steps(date)
    }

    fn run_valuation(
        &self,
        date: Option<NaiveDate>,
        acting_user: &str,
    ) -> Result<ValuationRunSummary> {
        let date = self.resolve(date)?;
        self.valuation.run_end_of_day_valuation(date, acting_user)
    }

    fn advance_full_day(&self, acting_user: &str) -> Result<DayAdvanceSummary> {
        let previous_date = self.simulation.current_date()?;
        let simulation = self.simulation.advance(acting_user)?;
        let date = simulation.current_date;

        let settlement = self.settlement.process_all_settlement_steps(date)?;
        if !settlement.success {
            let step = settlement
                .failed_step
                .map_or_else(|| "unknown".to_string(), |s| s.to_string());
            return Err(Error::Unexpected(format!(
                "Settlement step {} failed for {}",
                step, date
            )));
        }

        if !settlement.prices_fetched {
            // One retry; the composite already tried once.
            if let Err(e) = self.settlement.fetch_latest_closing_prices(date) {
                warn!("Closing prices for {} still unavailable: {}", date, e);
            }
        }

        let (valuation, valuation_error) =
            match self.valuation.run_end_of_day_valuation(date, acting_user) {
                Ok(summary) => (Some(summary), None),
                Err(e @ Error::StateConflict(ConflictError::ClosingPricesMissing(_))) => {
                    warn!("Valuation for {} skipped: {}", date, e);
                    (None, Some(e.to_string()))
                }
                Err(e) => return Err(e),
            };

        info!(
            "Advanced full day {} -> {}: {} orders settled forward, valuation {}",
            previous_date,
            date,
            settlement.orders_advanced(),
            if valuation.is_some() { "stored" } else { "pending" }
        );
        Ok(DayAdvanceSummary {
            previous_date,
            simulation,
            settlement,
            valuation,
            valuation_error,
        })
    }

    fn reset_end_of_day(&self, date: Option<NaiveDate>) -> Result<EndOfDayReset> {
        let date = self.resolve(date)?;
        let valuations_deleted = self.valuation.delete_valuations_for_date(date)?;
        let prices_deleted = self.stocks.delete_prices_for_date(date)?;
        warn!(
            "End-of-day reset for {}: {} prices and {} valuations deleted",
            date, prices_deleted, valuations_deleted
        );
        Ok(EndOfDayReset {
            date: Some(date),
            prices_deleted,
            valuations_deleted,
        })
    }

    fn reset_simulation(&self, acting_user: &str) -> Result<SimulationDate> {
        self.simulation.reset(acting_user)
    }
}
