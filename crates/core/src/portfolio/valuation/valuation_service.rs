use chrono::NaiveDate;
use log::{debug, info, warn};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use super::valuation_calculator::{compute_snapshot, value_positions};
use super::valuation_model::{
    ClientValuation, PortfolioDailyValuation, PositionValuation, ValuationRunSummary,
};
use super::valuation_traits::{ValuationRepositoryTrait, ValuationServiceTrait};
use crate::clients::ClientRepositoryTrait;
use crate::errors::{ConflictError, Error, Result};
use crate::portfolio::PortfolioRepositoryTrait;
use crate::stocks::{Stock, StockRepositoryTrait};

/// End-of-day valuation pipeline.
pub struct ValuationService {
    valuation_repository: Arc<dyn ValuationRepositoryTrait>,
    client_repository: Arc<dyn ClientRepositoryTrait>,
    portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
    stock_repository: Arc<dyn StockRepositoryTrait>,
}

impl ValuationService {
    pub fn new(
        valuation_repository: Arc<dyn ValuationRepositoryTrait>,
        client_repository: Arc<dyn ClientRepositoryTrait>,
        portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
        stock_repository: Arc<dyn StockRepositoryTrait>,
    ) -> Self {
        Self {
            valuation_repository,
            client_repository,
            portfolio_repository,
            stock_repository,
        }
    }

    fn load_stocks(&self) -> Result<HashMap<i64, Stock>> {
        Ok(self
            .stock_repository
            .list(false)?
            .into_iter()
            .map(|s| (s.id, s))
            .collect())
    }

    fn load_closes(&self, date: NaiveDate) -> Result<HashMap<i64, Decimal>> {
        Ok(self
            .stock_repository
            .get_daily_prices(date)?
            .into_iter()
            .filter(|p| p.official_close)
            .map(|p| (p.stock_id, p.close))
            .collect())
    }

    fn positions_for(
        &self,
        client_id: i64,
        stocks: &HashMap<i64, Stock>,
        closes: &HashMap<i64, Decimal>,
    ) -> Result<Vec<PositionValuation>> {
        let portfolio = self.portfolio_repository.get_by_client(client_id)?;
        let items = self.portfolio_repository.get_items(portfolio.id)?;
        value_positions(&items, stocks, closes)
    }
}

impl ValuationServiceTrait for ValuationService {
    fn run_end_of_day_valuation(
        &self,
        date: NaiveDate,
        acting_user: &str,
    ) -> Result<ValuationRunSummary> {
        if !self.stock_repository.has_official_close(date)? {
            return Err(ConflictError::ClosingPricesMissing(date).into());
        }

        let started = Instant::now();
        let stocks = self.load_stocks()?;
        let closes = self.load_closes(date)?;
        let mut summary = ValuationRunSummary {
            date: Some(date),
            ..Default::default()
        };

        for client in self.client_repository.list(true)? {
            if self.valuation_repository.get(client.id, date)?.is_some() {
                debug!("Client {} already valued for {}", client.id, date);
                summary.skipped += 1;
                continue;
            }

            let positions = self.positions_for(client.id, &stocks, &closes)?;
            let previous_day_value = self
                .valuation_repository
                .get_latest_before(client.id, date)?
                .map_or(Decimal::ZERO, |v| v.total_portfolio_value);
            let snapshot =
                compute_snapshot(client.id, date, &positions, previous_day_value, acting_user);

            match self.valuation_repository.insert_locked(snapshot, positions) {
                Ok(stored) => {
                    summary.valued += 1;
                    summary.total_value += stored.total_portfolio_value;
                }
                // Another run stored the row between the check and the insert.
                Err(Error::StateConflict(ConflictError::ValuationLocked { .. })) => {
                    warn!("Valuation for client {} on {} was locked concurrently", client.id, date);
                    summary.skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            "End-of-day valuation for {}: {} valued, {} skipped, total {} in {:?}",
            date,
            summary.valued,
            summary.skipped,
            summary.total_value,
            started.elapsed()
        );
        Ok(summary)
    }

    fn value_client_positions(
        &self,
        client_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<PositionValuation>> {
        let stocks = self.load_stocks()?;
        let closes = self.load_closes(date)?;
        self.positions_for(client_id, &stocks, &closes)
    }

    fn get_client_valuation(&self, client_id: i64, date: NaiveDate) -> Result<ClientValuation> {
        let valuation = self
            .valuation_repository
            .get(client_id, date)?
            .ok_or_else(|| Error::not_found("valuation", format!("{}@{}", client_id, date)))?;
        let positions = self.valuation_repository.get_positions(valuation.id)?;
        Ok(ClientValuation {
            valuation,
            positions,
        })
    }

    fn get_all_client_valuations(&self, date: NaiveDate) -> Result<Vec<PortfolioDailyValuation>> {
        self.valuation_repository.list_for_date(date)
    }

    fn get_valuation_history(
        &self,
        client_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PortfolioDailyValuation>> {
        if from > to {
            return Err(Error::invalid(format!(
                "Invalid range: {} is after {}",
                from, to
            )));
        }
        self.valuation_repository.history(client_id, from, to)
    }

    fn is_valuation_completed(&self, date: NaiveDate) -> Result<bool> {
        self.valuation_repository.exists_for_date(date)
    }

    fn delete_valuations_for_date(&self, date: NaiveDate) -> Result<usize> {
        let deleted = self.valuation_repository.delete_for_date(date)?;
        warn!("Deleted {} locked valuations for {}", deleted, date);
        Ok(deleted)
    }
}
