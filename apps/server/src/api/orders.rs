use std::sync::Arc;

use crate::{
    api::{run_blocking, ActingUser},
    error::ApiResult,
    main_lib::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use backoffice_core::orders::{
    OrderExecutionResult, OrderFilter, OrderPreview, OrderRequest, TradeOrder,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExecuteBody {
    preview_id: String,
}

async fn preview_buy(
    State(state): State<Arc<AppState>>,
    Json(request): Json<OrderRequest>,
) -> ApiResult<Json<OrderPreview>> {
    let preview = run_blocking(move || state.order_service.preview_buy(request)).await?;
    Ok(Json(preview))
}

async fn preview_sell(
    State(state): State<Arc<AppState>>,
    Json(request): Json<OrderRequest>,
) -> ApiResult<Json<OrderPreview>> {
    let preview = run_blocking(move || state.order_service.preview_sell(request)).await?;
    Ok(Json(preview))
}

async fn execute_buy(
    State(state): State<Arc<AppState>>,
    ActingUser(user): ActingUser,
    Json(body): Json<ExecuteBody>,
) -> ApiResult<(StatusCode, Json<OrderExecutionResult>)> {
    let result =
        run_blocking(move || state.order_service.execute_buy(&body.preview_id, &user)).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

async fn execute_sell(
    State(state): State<Arc<AppState>>,
    ActingUser(user): ActingUser,
    Json(body): Json<ExecuteBody>,
) -> ApiResult<(StatusCode, Json<OrderExecutionResult>)> {
    let result =
        run_blocking(move || state.order_service.execute_sell(&body.preview_id, &user)).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

async fn cancel_order(
    Path(id): Path<i64>,
    State(state): State<Arc<AppState>>,
    ActingUser(user): ActingUser,
) -> ApiResult<Json<TradeOrder>> {
    let order = run_blocking(move || state.order_service.cancel_order(id, &user)).await?;
    Ok(Json(order))
}

async fn get_order(
    Path(id): Path<i64>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<TradeOrder>> {
    let order = run_blocking(move || state.order_service.get_order(id)).await?;
    Ok(Json(order))
}

async fn list_orders(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<OrderFilter>,
) -> ApiResult<Json<Vec<TradeOrder>>> {
    let orders = run_blocking(move || state.order_service.list_orders(&filter)).await?;
    Ok(Json(orders))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/orders", get(list_orders))
        .route("/orders/buy/preview", post(preview_buy))
        .route("/orders/buy/execute", post(execute_buy))
        .route("/orders/sell/preview", post(preview_sell))
        .route("/orders/sell/execute", post(execute_sell))
        .route("/orders/{id}", get(get_order))
        .route("/orders/{id}/cancel", post(cancel_order))
}
