//! End-of-day orchestration over settlement, prices and valuation.

mod end_of_day_model;
mod end_of_day_service;


pub use end_of_day_model::{DayAdvanceSummary, EndOfDayReset, EndOfDayStatus};
pub use end_of_day_service::{EndOfDayService, EndOfDayServiceTrait};
