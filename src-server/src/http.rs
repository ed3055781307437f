//! HTTP Routes
//!
//! JSON endpoints over the command layer. Every failure is a non-2xx status
//! with an `ApiError` body.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use reorder::{OrderedItem, RankAssignment};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::commands;
use crate::domain::{DomainError, Station};
use crate::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

type ApiRejection = (StatusCode, Json<ApiError>);

fn reject(err: DomainError) -> ApiRejection {
    let status = match err {
        DomainError::NotFound(_) => StatusCode::NOT_FOUND,
        DomainError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ApiError { code: err.code().to_string(), message: err.to_string() }))
}

#[derive(Debug, Deserialize)]
struct CreateStationRequest {
    name: String,
}

#[derive(Debug, Deserialize)]
struct CreateQueueItemRequest {
    label: String,
    #[serde(default)]
    dimensions: Option<String>,
    #[serde(default)]
    species: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SubmitRanksRequest {
    ranks: Vec<RankAssignment>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SubmitRanksResponse {
    ok: bool,
    items: Vec<OrderedItem>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/stations", get(http_list_stations).post(http_create_station))
        .route("/stations/:station_id/queue", get(http_list_queue).post(http_create_queue_item))
        .route("/stations/:station_id/ranks", post(http_submit_ranks))
        .route("/queue/:item_id", delete(http_delete_queue_item))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn http_list_stations(State(state): State<AppState>) -> Result<Json<Vec<Station>>, ApiRejection> {
    commands::list_stations(&state).await.map(Json).map_err(reject)
}

async fn http_create_station(
    State(state): State<AppState>,
    Json(req): Json<CreateStationRequest>,
) -> Result<Json<Station>, ApiRejection> {
    commands::create_station(&state, req.name).await.map(Json).map_err(reject)
}

async fn http_list_queue(
    State(state): State<AppState>,
    Path(station_id): Path<u32>,
) -> Result<Json<Vec<OrderedItem>>, ApiRejection> {
    commands::list_queue(&state, station_id).await.map(Json).map_err(reject)
}

async fn http_create_queue_item(
    State(state): State<AppState>,
    Path(station_id): Path<u32>,
    Json(req): Json<CreateQueueItemRequest>,
) -> Result<Json<OrderedItem>, ApiRejection> {
    commands::create_queue_item(&state, station_id, req.label, req.dimensions, req.species)
        .await
        .map(Json)
        .map_err(reject)
}

async fn http_submit_ranks(
    State(state): State<AppState>,
    Path(station_id): Path<u32>,
    Json(req): Json<SubmitRanksRequest>,
) -> Result<Json<SubmitRanksResponse>, ApiRejection> {
    let items = commands::submit_ranks(&state, station_id, req.ranks).await.map_err(reject)?;
    Ok(Json(SubmitRanksResponse { ok: true, items }))
}

async fn http_delete_queue_item(
    State(state): State<AppState>,
    Path(item_id): Path<u32>,
) -> Result<StatusCode, ApiRejection> {
    commands::delete_queue_item(&state, item_id).await.map_err(reject)?;
    Ok(StatusCode::NO_CONTENT)
}
