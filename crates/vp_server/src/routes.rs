//! HTTP routes under `/api`.

use crate::error::{Result, ServerError};
use crate::store::{PickRow, PickStore, RecapRow};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub const DEFAULT_PAGE_LIMIT: u32 = 20;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PickStore>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

fn default_limit() -> u32 {
    DEFAULT_PAGE_LIMIT
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub id: String,
}

/// Missing or non-string mode is stored as `unknown`.
fn mode_of(body: &Value) -> &str {
    body.get("mode").and_then(Value::as_str).unwrap_or("unknown")
}

async fn create_pick(
    State(state): State<AppState>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<PickRow>)> {
    let Json(body) = body.map_err(|_| ServerError::InvalidPayload)?;
    let agents = body.get("picked_agents").filter(|v| v.is_array()).ok_or(ServerError::InvalidPayload)?;
    let row = state.store.insert(mode_of(&body), agents)?;
    Ok((StatusCode::CREATED, Json(row)))
}

async fn list_picks(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<PickRow>>> {
    Ok(Json(state.store.list(query.limit, query.offset)?))
}

async fn delete_pick(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<DeleteResponse>> {
    if !state.store.delete(&id)? {
        return Err(ServerError::NotFound);
    }
    tracing::info!(id = %id, "pick deleted");
    Ok(Json(DeleteResponse { success: true, id }))
}

async fn recap(State(state): State<AppState>) -> Result<Json<Vec<RecapRow>>> {
    Ok(Json(state.store.recap()?))
}

/// Build the API router.
pub fn router(store: Arc<PickStore>) -> Router {
    let state = AppState { store };
    Router::new()
        .route("/api/picks", get(list_picks).post(create_pick))
        .route("/api/picks/{id}", delete(delete_pick))
        .route("/api/stats/recap", get(recap))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
