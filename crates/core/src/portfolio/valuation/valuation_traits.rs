//! Repository and service traits for portfolio valuations.

use chrono::NaiveDate;

use super::valuation_model::{
    ClientValuation, NewPortfolioDailyValuation, PortfolioDailyValuation, PositionValuation,
    ValuationRunSummary,
};
use crate::errors::Result;

/// Repository trait for locked daily valuations.
pub trait ValuationRepositoryTrait: Send + Sync {
    /// Inserts a locked row together with the positions it was computed
    /// from. A row already present for (client, date) yields
    /// `ConflictError::ValuationLocked` and nothing changes.
    fn insert_locked(
        &self,
        valuation: NewPortfolioDailyValuation,
        positions: Vec<PositionValuation>,
    ) -> Result<PortfolioDailyValuation>;

    fn get(&self, client_id: i64, date: NaiveDate) -> Result<Option<PortfolioDailyValuation>>;

    /// Positions stored with a locked row.
    fn get_positions(&self, valuation_id: i64) -> Result<Vec<PositionValuation>>;

    /// Most recent locked row strictly before `date`.
    fn get_latest_before(
        &self,
        client_id: i64,
        date: NaiveDate,
    ) -> Result<Option<PortfolioDailyValuation>>;

    fn list_for_date(&self, date: NaiveDate) -> Result<Vec<PortfolioDailyValuation>>;

    /// Rows for one client within `[from, to]`, oldest first.
    fn history(
        &self,
        client_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PortfolioDailyValuation>>;

    fn exists_for_date(&self, date: NaiveDate) -> Result<bool>;

    fn delete_for_date(&self, date: NaiveDate) -> Result<usize>;
}

pub trait ValuationServiceTrait: Send + Sync {
    /// Values every active client for `date` and stores locked rows.
    ///
    /// Fails with `ClosingPricesMissing` when no official close exists for
    /// the date. Clients already valued for the date are skipped.
    fn run_end_of_day_valuation(
        &self,
        date: NaiveDate,
        acting_user: &str,
    ) -> Result<ValuationRunSummary>;

    /// Prices the client's current holdings on `date` without storing.
    fn value_client_positions(
        &self,
        client_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<PositionValuation>>;

    /// Locked row for the date with the positions stored alongside it.
    fn get_client_valuation(&self, client_id: i64, date: NaiveDate) -> Result<ClientValuation>;

    fn get_all_client_valuations(&self, date: NaiveDate) -> Result<Vec<PortfolioDailyValuation>>;

    fn get_valuation_history(
        &self,
        client_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PortfolioDailyValuation>>;

    fn is_valuation_completed(&self, date: NaiveDate) -> Result<bool>;

    fn delete_valuations_for_date(&self, date: NaiveDate) -> Result<usize>;
}
