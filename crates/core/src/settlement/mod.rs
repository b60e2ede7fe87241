//! Settlement module - T0 to T1 to T2 to completion batch steps.

mod settlement_model;
mod settlement_service;


pub use settlement_model::{SettlementRunSummary, SettlementStep, StepOutcome, StepReport};
pub use settlement_service::{plan_transitions, SettlementService, SettlementServiceTrait};
