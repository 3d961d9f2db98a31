use axum::http::StatusCode;
use thiserror::Error;

/// Error type shared by the panel service, its HTTP API and the display
/// client.
///
/// `Display` is the bare message; the API wraps it as
/// `{"error": {"code": <http status>, "message": ..}}`.
///
/// Position collisions are not errors: the layout core reports them as
/// structured values. `Conflict` covers duplicate keys and deletes that
/// would orphan a panel.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// HTTP 404.
    #[error("{0}")]
    NotFound(String),

    /// Duplicate key or resource still referenced. HTTP 409.
    #[error("{0}")]
    Conflict(String),

    /// Input data is invalid. HTTP 400.
    #[error("{0}")]
    Validation(String),

    /// Storage backend failure. HTTP 500.
    #[error("{0}")]
    Storage(String),

    /// The panel server could not be reached. HTTP 502.
    #[error("{0}")]
    Unavailable(String),

    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Storage(_) | ServiceError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ServiceError::Unavailable(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Worth retrying on the next poll.
    pub fn is_transient(&self) -> bool {
        matches!(self, ServiceError::Unavailable(_) | ServiceError::Storage(_))
    }
}
