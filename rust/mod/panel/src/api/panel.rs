use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};

use tvpanel_core::{ListParams, ListResult};

use super::{ApiError, AppState, no_content, ok_json};
use crate::model::{CreatePanel, Panel};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/panels", post(create_panel).get(list_panels))
        .route(
            "/panels/{id}",
            get(get_panel).patch(update_panel).delete(delete_panel),
        )
}

async fn create_panel(
    State(svc): State<AppState>,
    Json(body): Json<CreatePanel>,
) -> Result<Json<Panel>, ApiError> {
    ok_json(svc.create_panel(body))
}

async fn list_panels(
    State(svc): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResult<Panel>>, ApiError> {
    ok_json(svc.list_panels(&params))
}

async fn get_panel(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Panel>, ApiError> {
    ok_json(svc.get_panel(&id))
}

async fn update_panel(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<serde_json::Value>,
) -> Result<Json<Panel>, ApiError> {
    ok_json(svc.update_panel(&id, patch))
}

async fn delete_panel(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    no_content(svc.delete_panel(&id))
}
