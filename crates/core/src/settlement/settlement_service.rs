use chrono::{NaiveDate, NaiveDateTime};
use log::{debug, error, info, warn};
use std::sync::Arc;

use super::settlement_model::{SettlementRunSummary, SettlementStep, StepOutcome, StepReport};
use crate::errors::Result;
use crate::orders::{
    OrderStatus, SettlementStatus, SettlementTransition, TradeOrder, TradeOrderRepositoryTrait,
};
use crate::stocks::StockServiceTrait;
use crate::utils::time_utils::{business_days_between, Clock};

pub trait SettlementServiceTrait: Send + Sync {
    fn run_step(&self, step: SettlementStep, date: NaiveDate) -> Result<StepOutcome>;

    fn fetch_latest_closing_prices(&self, date: NaiveDate) -> Result<StepOutcome> {
        self.run_step(SettlementStep::FetchPrices, date)
    }

    fn process_t0_to_t1(&self, date: NaiveDate) -> Result<StepOutcome> {
        self.run_step(SettlementStep::T0ToT1, date)
    }

    fn process_t1_to_t2(&self, date: NaiveDate) -> Result<StepOutcome> {
        self.run_step(SettlementStep::T1ToT2, date)
    }

    fn process_t2_completion(&self, date: NaiveDate) -> Result<StepOutcome> {
        self.run_step(SettlementStep::T2Completion, date)
    }

    /// Runs every step in order. Stops at the first failing transition
    /// step; a failed price fetch is reported but does not stop the run.
    fn process_all_settlement_steps(&self, date: NaiveDate) -> Result<SettlementRunSummary>;
}

/// Transitions for EXECUTED orders in `from` whose age on `date` is at
/// least `min_age` business days.
pub fn plan_transitions(
    orders: &[TradeOrder],
    date: NaiveDate,
    from: SettlementStatus,
    to: SettlementStatus,
    min_age: i64,
    now: NaiveDateTime,
) -> Vec<SettlementTransition> {
    orders
        .iter()
        .filter(|o| o.status == OrderStatus::Executed && o.settlement_status == from)
        .filter(|o| business_days_between(o.trade_date, date) >= min_age)
        .map(|o| {
            let completes = to == SettlementStatus::Completed;
            SettlementTransition {
                order_id: o.id,
                from,
                to,
                order_status: if completes {
                    OrderStatus::Settled
                } else {
                    o.status
                },
                settled_at: completes.then_some(now),
                portfolio_updated: completes || o.portfolio_updated,
            }
        })
        .collect()
}

pub struct SettlementService {
    order_repository: Arc<dyn TradeOrderRepositoryTrait>,
    stock_service: Arc<dyn StockServiceTrait>,
    clock: Arc<dyn Clock>,
}

impl SettlementService {
    pub fn new(
        order_repository: Arc<dyn TradeOrderRepositoryTrait>,
        stock_service: Arc<dyn StockServiceTrait>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            order_repository,
            stock_service,
            clock,
        }
    }

    fn advance_orders(
        &self,
        step: SettlementStep,
        date: NaiveDate,
        from: SettlementStatus,
        to: SettlementStatus,
        min_age: i64,
    ) -> Result<StepOutcome> {
        let orders = self.order_repository.list_executed_in(from)?;
        let transitions =
            plan_transitions(&orders, date, from, to, min_age, self.clock.now_naive());
        let candidates = transitions.len();

        let processed = if transitions.is_empty() {
            0
        } else {
            self.order_repository.apply_transitions(transitions)?
        };
        if processed < candidates {
            debug!(
                "{}: {} of {} orders moved concurrently and were skipped",
                step,
                candidates - processed,
                candidates
            );
        }
        info!("{} for {}: {} orders {} -> {}", step, date, processed, from, to);

        Ok(StepOutcome {
            step,
            date,
            candidates,
            processed,
            prices: None,
        })
    }
}

impl SettlementServiceTrait for SettlementService {
    fn run_step(&self, step: SettlementStep, date: NaiveDate) -> Result<StepOutcome> {
        match step.transition() {
            Some((from, to, min_age)) => self.advance_orders(step, date, from, to, min_age),
            None => {
                let prices = self.stock_service.fetch_closing_prices(date)?;
                Ok(StepOutcome {
                    step,
                    date,
                    candidates: prices.fetched,
                    processed: 0,
                    prices: Some(prices),
                })
            }
        }
    }

    fn process_all_settlement_steps(&self, date: NaiveDate) -> Result<SettlementRunSummary> {
        let mut summary = SettlementRunSummary {
            date,
            steps: Vec::with_capacity(SettlementStep::ALL.len()),
            prices_fetched: false,
            failed_step: None,
            success: true,
        };

        for step in SettlementStep::ALL {
            if summary.failed_step.is_some() {
                summary.steps.push(StepReport::NotRun { step });
                continue;
            }
            match self.run_step(step, date) {
                Ok(outcome) => {
                    if step == SettlementStep::FetchPrices {
                        summary.prices_fetched = true;
                    }
                    summary.steps.push(StepReport::Completed { outcome });
                }
                Err(e) => {
                    let report = StepReport::Failed {
                        step,
                        code: e.code().to_string(),
                        message: e.to_string(),
                    };
                    summary.steps.push(report);
                    if step == SettlementStep::FetchPrices {
                        warn!("Price fetch for {} failed, continuing settlement: {}", date, e);
                    } else {
                        error!("Settlement step {} for {} failed: {}", step, date, e);
                        summary.failed_step = Some(step);
                        summary.success = false;
                    }
                }
            }
        }

        info!(
            "Settlement run for {}: {} orders advanced, prices fetched: {}, success: {}",
            date,
            summary.orders_advanced(),
            summary.prices_fetched,
            summary.success
        );
        Ok(summary)
    }
}
