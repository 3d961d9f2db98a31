use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};

use tvpanel_core::{ListParams, ListResult};

use super::{ApiError, AppState, no_content, ok_json};
use crate::model::{CreateDepartment, Department, Panel, PanelView};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/departments", post(create_department).get(list_departments))
        .route(
            "/departments/{id}",
            get(get_department)
                .patch(update_department)
                .delete(delete_department),
        )
        .route("/departments/{id}/panels", get(list_department_panels))
        .route("/departments/{id}/panels/{panel_id}/view", get(view_panel))
}

async fn create_department(
    State(svc): State<AppState>,
    Json(body): Json<CreateDepartment>,
) -> Result<Json<Department>, ApiError> {
    ok_json(svc.create_department(body))
}

async fn list_departments(
    State(svc): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResult<Department>>, ApiError> {
    ok_json(svc.list_departments(&params))
}

async fn get_department(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Department>, ApiError> {
    ok_json(svc.get_department(&id))
}

async fn update_department(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<serde_json::Value>,
) -> Result<Json<Department>, ApiError> {
    ok_json(svc.update_department(&id, patch))
}

async fn delete_department(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    no_content(svc.delete_department(&id))
}

async fn list_department_panels(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Panel>>, ApiError> {
    ok_json(svc.list_department_panels(&id))
}

/// Public endpoint polled by the TVs.
async fn view_panel(
    State(svc): State<AppState>,
    Path((dep, panel)): Path<(String, String)>,
) -> Result<Json<PanelView>, ApiError> {
    ok_json(svc.view_panel(&dep, &panel))
}
