//! Batch endpoints: price fetch, settlement steps, valuation and the
//! simulation clock.

use std::sync::Arc;

use crate::{
    api::{run_blocking, ActingUser, DateQuery},
    error::ApiResult,
    main_lib::AppState,
};
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use backoffice_core::{
    end_of_day::{DayAdvanceSummary, EndOfDayReset, EndOfDayStatus},
    portfolio::valuation::ValuationRunSummary,
    settlement::{SettlementRunSummary, SettlementStep, StepOutcome},
    simulation::SimulationDate,
};

async fn get_status(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DateQuery>,
) -> ApiResult<Json<EndOfDayStatus>> {
    let status = run_blocking(move || state.end_of_day_service.get_status(query.date)).await?;
    Ok(Json(status))
}

async fn fetch_prices(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DateQuery>,
) -> ApiResult<Json<StepOutcome>> {
    let outcome =
        run_blocking(move || state.end_of_day_service.fetch_closing_prices(query.date)).await?;
    Ok(Json(outcome))
}

async fn run_step(
    Path(step): Path<SettlementStep>,
    State(state): State<Arc<AppState>>,
    Query(query): Query<DateQuery>,
) -> ApiResult<Json<StepOutcome>> {
    let outcome =
        run_blocking(move || state.end_of_day_service.run_settlement_step(step, query.date))
            .await?;
    Ok(Json(outcome))
}

async fn run_all_steps(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DateQuery>,
) -> ApiResult<Json<SettlementRunSummary>> {
    let summary =
        run_blocking(move || state.end_of_day_service.run_all_settlement_steps(query.date))
            .await?;
    Ok(Json(summary))
}

async fn run_valuation(
    State(state): State<Arc<AppState>>,
    ActingUser(user): ActingUser,
    Query(query): Query<DateQuery>,
) -> ApiResult<Json<ValuationRunSummary>> {
    let summary =
        run_blocking(move || state.end_of_day_service.run_valuation(query.date, &user)).await?;
    Ok(Json(summary))
}

async fn advance_full_day(
    State(state): State<Arc<AppState>>,
    ActingUser(user): ActingUser,
) -> ApiResult<Json<DayAdvanceSummary>> {
    let summary = run_blocking(move || state.end_of_day_service.advance_full_day(&user)).await?;
    Ok(Json(summary))
}

/// Test-only: removes the date's prices and valuations.
async fn reset_end_of_day(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DateQuery>,
) -> ApiResult<Json<EndOfDayReset>> {
    let reset = run_blocking(move || state.end_of_day_service.reset_end_of_day(query.date)).await?;
    Ok(Json(reset))
}

async fn get_simulation(State(state): State<Arc<AppState>>) -> ApiResult<Json<SimulationDate>> {
    let current = run_blocking(move || state.simulation_service.current()).await?;
    Ok(Json(current))
}

async fn advance_simulation(
    State(state): State<Arc<AppState>>,
    ActingUser(user): ActingUser,
) -> ApiResult<Json<SimulationDate>> {
    let next = run_blocking(move || state.simulation_service.advance(&user)).await?;
    Ok(Json(next))
}

async fn reset_simulation(
    State(state): State<Arc<AppState>>,
    ActingUser(user): ActingUser,
) -> ApiResult<Json<SimulationDate>> {
    let fresh = run_blocking(move || state.end_of_day_service.reset_simulation(&user)).await?;
    Ok(Json(fresh))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/eod/status", get(get_status))
        .route("/eod/prices", post(fetch_prices))
        .route("/eod/settlement", post(run_all_steps))
        .route("/eod/settlement/{step}", post(run_step))
        .route("/eod/valuation", post(run_valuation))
        .route("/eod/advance", post(advance_full_day))
        .route("/eod/reset", post(reset_end_of_day))
        .route("/simulation", get(get_simulation))
        .route("/simulation/advance", post(advance_simulation))
        .route("/simulation/reset", post(reset_simulation))
}
