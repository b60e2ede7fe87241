use std::sync::Arc;

use crate::{
    api::{run_blocking, ActingUser},
    error::ApiResult,
    main_lib::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use backoffice_core::accounts::{Account, CashTransaction, NewAccount};
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CashMovementBody {
    amount: Decimal,
    #[serde(default)]
    description: Option<String>,
}

async fn create_account(
    State(state): State<Arc<AppState>>,
    Json(new_account): Json<NewAccount>,
) -> ApiResult<(StatusCode, Json<Account>)> {
    let account = run_blocking(move || state.account_service.create_account(new_account)).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

async fn get_account(
    Path(id): Path<i64>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Account>> {
    let account = run_blocking(move || state.account_service.get_account(id)).await?;
    Ok(Json(account))
}

async fn deposit(
    Path(id): Path<i64>,
    State(state): State<Arc<AppState>>,
    ActingUser(user): ActingUser,
    Json(body): Json<CashMovementBody>,
) -> ApiResult<(StatusCode, Json<CashTransaction>)> {
    let transaction = run_blocking(move || {
        state
            .account_service
            .deposit(id, body.amount, body.description, &user)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

async fn withdraw(
    Path(id): Path<i64>,
    State(state): State<Arc<AppState>>,
    ActingUser(user): ActingUser,
    Json(body): Json<CashMovementBody>,
) -> ApiResult<(StatusCode, Json<CashTransaction>)> {
    let transaction = run_blocking(move || {
        state
            .account_service
            .withdraw(id, body.amount, body.description, &user)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

async fn list_transactions(
    Path(id): Path<i64>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<CashTransaction>>> {
    let transactions =
        run_blocking(move || state.account_service.list_account_transactions(id)).await?;
    Ok(Json(transactions))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/accounts", post(create_account))
        .route("/accounts/{id}", get(get_account))
        .route("/accounts/{id}/deposit", post(deposit))
        .route("/accounts/{id}/withdraw", post(withdraw))
        .route("/accounts/{id}/transactions", get(list_transactions))
}
