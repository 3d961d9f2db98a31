pub mod association;
pub mod department;
pub mod layout;
pub mod panel;
pub mod product;
pub mod sync;

use std::sync::Arc;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use tvpanel_core::ServiceError;

use crate::service::PanelService;

/// Shared application state.
pub type AppState = Arc<PanelService>;

/// Build the panel API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/panel/v1", api_routes())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(product::routes())
        .merge(department::routes())
        .merge(panel::routes())
        .merge(association::routes())
        .merge(layout::routes())
        .merge(sync::routes())
}

/// Standard API error response body.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: u16,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = Json(serde_json::json!({
            "error": {
                "code": self.code,
                "message": self.message,
            }
        }));
        (status, body).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError {
            code: err.status_code().as_u16(),
            message: err.to_string(),
        }
    }
}

/// Wrap a Result<T, ServiceError> into an API response.
pub(crate) fn ok_json<T: Serialize>(result: Result<T, ServiceError>) -> Result<Json<T>, ApiError> {
    result.map(Json).map_err(ApiError::from)
}

/// `204 No Content` on success.
pub(crate) fn no_content(result: Result<(), ServiceError>) -> Result<StatusCode, ApiError> {
    result.map(|()| StatusCode::NO_CONTENT).map_err(ApiError::from)
}
