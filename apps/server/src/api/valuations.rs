use std::sync::Arc;

use crate::{
    api::{resolve_date, run_blocking, DateQuery},
    error::ApiResult,
    main_lib::AppState,
};
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use backoffice_core::portfolio::valuation::{
    ClientValuation, PortfolioDailyValuation, PositionValuation,
};
use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    from: NaiveDate,
    to: NaiveDate,
}

async fn get_all_valuations(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DateQuery>,
) -> ApiResult<Json<Vec<PortfolioDailyValuation>>> {
    let valuations = run_blocking(move || {
        let date = resolve_date(&state, query.date)?;
        state.valuation_service.get_all_client_valuations(date)
    })
    .await?;
    Ok(Json(valuations))
}

async fn get_client_valuation(
    Path(client_id): Path<i64>,
    State(state): State<Arc<AppState>>,
    Query(query): Query<DateQuery>,
) -> ApiResult<Json<ClientValuation>> {
    let valuation = run_blocking(move || {
        let date = resolve_date(&state, query.date)?;
        state.valuation_service.get_client_valuation(client_id, date)
    })
    .await?;
    Ok(Json(valuation))
}

async fn get_client_positions(
    Path(client_id): Path<i64>,
    State(state): State<Arc<AppState>>,
    Query(query): Query<DateQuery>,
) -> ApiResult<Json<Vec<PositionValuation>>> {
    let positions = run_blocking(move || {
        let date = resolve_date(&state, query.date)?;
        state.valuation_service.value_client_positions(client_id, date)
    })
    .await?;
    Ok(Json(positions))
}

async fn get_valuation_history(
    Path(client_id): Path<i64>,
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<Vec<PortfolioDailyValuation>>> {
    let history = run_blocking(move || {
        state
            .valuation_service
            .get_valuation_history(client_id, query.from, query.to)
    })
    .await?;
    Ok(Json(history))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/valuations", get(get_all_valuations))
        .route("/valuations/clients/{id}", get(get_client_valuation))
        .route("/valuations/clients/{id}/positions", get(get_client_positions))
        .route("/valuations/clients/{id}/history", get(get_valuation_history))
}
