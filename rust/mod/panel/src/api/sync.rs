use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};

use super::{ApiError, AppState, ok_json};
use crate::service::{AutoCategorizeRequest, AutoCategorizeResult, SyncRequest, SyncResult};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/departments/{id}/panels/{panel_id}/sync", post(sync_panel))
        .route("/products/auto-categorize", post(auto_categorize))
}

/// Body is optional; without one the match is exact.
async fn sync_panel(
    State(svc): State<AppState>,
    Path((dep, panel)): Path<(String, String)>,
    body: Option<Json<SyncRequest>>,
) -> Result<Json<SyncResult>, ApiError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    ok_json(svc.sync_panel(&dep, &panel, &request))
}

async fn auto_categorize(
    State(svc): State<AppState>,
    Json(body): Json<AutoCategorizeRequest>,
) -> Result<Json<AutoCategorizeResult>, ApiError> {
    ok_json(svc.auto_categorize(&body))
}
