use std::sync::Arc;

use crate::{api::run_blocking, error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use backoffice_core::{
    accounts::Account,
    clients::{Client, ClientSearch, NewClient},
    portfolio::Holding,
};
use serde::Deserialize;

async fn create_client(
    State(state): State<Arc<AppState>>,
    Json(new_client): Json<NewClient>,
) -> ApiResult<(StatusCode, Json<Client>)> {
    let client = run_blocking(move || state.client_service.create_client(new_client)).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClientListQuery {
    /// Matched against name, email and tax id
    #[serde(default)]
    q: Option<String>,
    #[serde(default)]
    active_only: bool,
}

async fn list_clients(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ClientListQuery>,
) -> ApiResult<Json<Vec<Client>>> {
    let clients = run_blocking(move || match query.q {
        Some(q) => state.client_service.search_clients(ClientSearch {
            query: q,
            active_only: query.active_only,
        }),
        None => state.client_service.list_clients(query.active_only),
    })
    .await?;
    Ok(Json(clients))
}

async fn get_client(
    Path(id): Path<i64>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Client>> {
    let client = run_blocking(move || state.client_service.get_client(id)).await?;
    Ok(Json(client))
}

async fn get_client_accounts(
    Path(id): Path<i64>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Account>>> {
    let accounts = run_blocking(move || state.account_service.list_client_accounts(id)).await?;
    Ok(Json(accounts))
}

async fn get_client_holdings(
    Path(id): Path<i64>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Holding>>> {
    let holdings = run_blocking(move || state.portfolio_service.get_holdings(id)).await?;
    Ok(Json(holdings))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/clients", get(list_clients).post(create_client))
        .route("/clients/{id}", get(get_client))
        .route("/clients/{id}/accounts", get(get_client_accounts))
        .route("/clients/{id}/holdings", get(get_client_holdings))
}
