use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use serde::Deserialize;

use super::{ApiError, AppState, ok_json};
use crate::layout::{ConflictReport, DEFAULT_SUGGESTION_LIMIT, PanelStats, PositionCheck, PositionalGrid};
use crate::service::{PositionSuggestions, ValidatePositionRequest};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/panels/{id}/conflicts", get(conflicts))
        .route("/panels/{id}/positions/validate", post(validate_position))
        .route("/panels/{id}/positions/suggest", get(suggest_positions))
        .route("/panels/{id}/grid", get(grid))
        .route("/panels/{id}/stats", get(stats))
}

#[derive(Deserialize)]
struct SuggestQuery {
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_SUGGESTION_LIMIT
}

async fn conflicts(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ConflictReport>, ApiError> {
    ok_json(svc.panel_conflicts(&id))
}

async fn validate_position(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ValidatePositionRequest>,
) -> Result<Json<PositionCheck>, ApiError> {
    ok_json(svc.validate_position(&id, &body))
}

async fn suggest_positions(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    Query(q): Query<SuggestQuery>,
) -> Result<Json<PositionSuggestions>, ApiError> {
    ok_json(svc.suggest_positions(&id, q.limit))
}

async fn grid(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PositionalGrid>, ApiError> {
    ok_json(svc.panel_grid(&id))
}

async fn stats(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PanelStats>, ApiError> {
    ok_json(svc.panel_stats(&id))
}
