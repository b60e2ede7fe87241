use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::orders::SettlementStatus;
use crate::stocks::PriceFetchOutcome;
use crate::{Error, Result};

/// One batch job of the end-of-day settlement cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SettlementStep {
    FetchPrices,
    T0ToT1,
    T1ToT2,
    T2Completion,
}

impl SettlementStep {
    /// Composite run order.
    pub const ALL: [SettlementStep; 4] = [
        SettlementStep::FetchPrices,
        SettlementStep::T0ToT1,
        SettlementStep::T1ToT2,
        SettlementStep::T2Completion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SettlementStep::FetchPrices => "FETCH_PRICES",
            SettlementStep::T0ToT1 => "T0_TO_T1",
            SettlementStep::T1ToT2 => "T1_TO_T2",
            SettlementStep::T2Completion => "T2_COMPLETION",
        }
    }

    /// `(from, to, minimum business-day age)` for order transition steps.
    pub fn transition(&self) -> Option<(SettlementStatus, SettlementStatus, i64)> {
        use crate::constants::{
            COMPLETION_MIN_BUSINESS_DAYS, T1_MIN_BUSINESS_DAYS, T2_MIN_BUSINESS_DAYS,
        };
        match self {
            SettlementStep::FetchPrices => None,
            SettlementStep::T0ToT1 => Some((
                SettlementStatus::Pending,
                SettlementStatus::T1,
                T1_MIN_BUSINESS_DAYS,
            )),
            SettlementStep::T1ToT2 => Some((
                SettlementStatus::T1,
                SettlementStatus::T2,
                T2_MIN_BUSINESS_DAYS,
            )),
            SettlementStep::T2Completion => Some((
                SettlementStatus::T2,
                SettlementStatus::Completed,
                COMPLETION_MIN_BUSINESS_DAYS,
            )),
        }
    }
}

impl fmt::Display for SettlementStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettlementStep {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        SettlementStep::ALL
            .into_iter()
            .find(|step| step.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::invalid(format!("Unknown settlement step: {}", s)))
    }
}

/// Result of one step that ran.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepOutcome {
    pub step: SettlementStep,
    pub date: NaiveDate,
    /// Orders eligible by age
    pub candidates: usize,
    /// Orders actually moved
    pub processed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prices: Option<PriceFetchOutcome>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", tag = "state")]
pub enum StepReport {
    Completed { outcome: StepOutcome },
    Failed { step: SettlementStep, code: String, message: String },
    NotRun { step: SettlementStep },
}

impl StepReport {
    pub fn step(&self) -> SettlementStep {
        match self {
            StepReport::Completed { outcome } => outcome.step,
            StepReport::Failed { step, .. } | StepReport::NotRun { step } => *step,
        }
    }

    pub fn processed(&self) -> usize {
        match self {
            StepReport::Completed { outcome } => outcome.processed,
            _ => 0,
        }
    }
}

/// Per-step report of a composite settlement run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementRunSummary {
    pub date: NaiveDate,
    pub steps: Vec<StepReport>,
    pub prices_fetched: bool,
    /// First order-transition step that failed
    pub failed_step: Option<SettlementStep>,
    pub success: bool,
}

impl SettlementRunSummary {
    /// Orders moved across all steps.
    pub fn orders_advanced(&self) -> usize {
        self.steps.iter().map(StepReport::processed).sum()
    }

    pub fn processed_by(&self, step: SettlementStep) -> usize {
        self.steps
            .iter()
            .find(|r| r.step() == step)
            .map_or(0, StepReport::processed)
    }
}
