//! Reports module - portfolio and summary reports.

mod reports_model;
mod reports_service;

#[cfg(test)]
mod reports_service_tests;

pub use reports_model::{ClientValueLine, PortfolioReport, PositionLine, SummaryReport};
pub use reports_service::{ReportService, ReportServiceTrait};
