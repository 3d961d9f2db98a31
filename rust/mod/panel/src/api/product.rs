use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};

use tvpanel_core::{ListParams, ListResult};

use super::{ApiError, AppState, no_content, ok_json};
use crate::model::{CreateProduct, Product};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", post(create_product).get(list_products))
        .route(
            "/products/{id}",
            get(get_product).patch(update_product).delete(delete_product),
        )
}

async fn create_product(
    State(svc): State<AppState>,
    Json(body): Json<CreateProduct>,
) -> Result<Json<Product>, ApiError> {
    ok_json(svc.create_product(body))
}

async fn list_products(
    State(svc): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResult<Product>>, ApiError> {
    ok_json(svc.list_products(&params))
}

async fn get_product(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    ok_json(svc.get_product(&id))
}

async fn update_product(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<serde_json::Value>,
) -> Result<Json<Product>, ApiError> {
    ok_json(svc.update_product(&id, patch))
}

async fn delete_product(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    no_content(svc.delete_product(&id))
}
