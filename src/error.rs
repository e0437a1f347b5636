use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use tracing::error;

/// Service error taxonomy, mapped onto HTTP statuses at the transport edge.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("incident not found")]
    NotFound,

    #[error("latitude must be between -90 and 90, longitude between -180 and 180")]
    InvalidCoordinates,

    #[error("radius must be positive")]
    InvalidRadius,

    #[error("{0}")]
    InvalidInput(String),

    #[error("invalid or missing API key")]
    Unauthorized,

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::InvalidCoordinates | AppError::InvalidRadius | AppError::InvalidInput(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Storage(e) = self {
            error!("storage failure: {}", e);
        }
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}
