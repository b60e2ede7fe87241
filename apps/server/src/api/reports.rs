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
use backoffice_core::reports::{PortfolioReport, SummaryReport};

async fn portfolio_report(
    Path(client_id): Path<i64>,
    State(state): State<Arc<AppState>>,
    Query(query): Query<DateQuery>,
) -> ApiResult<Json<PortfolioReport>> {
    let report = run_blocking(move || {
        let date = resolve_date(&state, query.date)?;
        state.report_service.portfolio_report(client_id, date)
    })
    .await?;
    Ok(Json(report))
}

async fn summary_report(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DateQuery>,
) -> ApiResult<Json<SummaryReport>> {
    let report = run_blocking(move || {
        let date = resolve_date(&state, query.date)?;
        state.report_service.summary_report(date)
    })
    .await?;
    Ok(Json(report))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/reports/portfolio/{id}", get(portfolio_report))
        .route("/reports/summary", get(summary_report))
}
