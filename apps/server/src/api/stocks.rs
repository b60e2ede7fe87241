use std::sync::Arc;

use crate::{
    api::{resolve_date, run_blocking, ActiveQuery, DateQuery},
    error::ApiResult,
    main_lib::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use backoffice_core::stocks::{NewStock, Stock, StockDailyPrice};

async fn list_stocks(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ActiveQuery>,
) -> ApiResult<Json<Vec<Stock>>> {
    let stocks = run_blocking(move || state.stock_service.list_stocks(query.active_only)).await?;
    Ok(Json(stocks))
}

async fn create_stock(
    State(state): State<Arc<AppState>>,
    Json(new_stock): Json<NewStock>,
) -> ApiResult<(StatusCode, Json<Stock>)> {
    let stock = run_blocking(move || state.stock_service.create_stock(new_stock)).await?;
    Ok((StatusCode::CREATED, Json(stock)))
}

async fn get_stock(
    Path(id): Path<i64>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Stock>> {
    let stock = run_blocking(move || state.stock_service.get_stock(id)).await?;
    Ok(Json(stock))
}

async fn sync_definitions(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<serde_json::Value>> {
    let synced = run_blocking(move || state.stock_service.sync_stock_definitions()).await?;
    Ok(Json(serde_json::json!({ "synced": synced })))
}

async fn get_daily_prices(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DateQuery>,
) -> ApiResult<Json<Vec<StockDailyPrice>>> {
    let prices = run_blocking(move || {
        let date = resolve_date(&state, query.date)?;
        state.stock_service.get_daily_prices(date)
    })
    .await?;
    Ok(Json(prices))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/stocks", get(list_stocks).post(create_stock))
        .route("/stocks/sync", post(sync_definitions))
        .route("/stocks/prices", get(get_daily_prices))
        .route("/stocks/{id}", get(get_stock))
}
