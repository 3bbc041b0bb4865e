use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use drive_ledger::LedgerError;
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    AuthenticationError(String),
    AuthorizationError(String),
    ValidationError(String),
    ConflictError(String),
    TransientError(String),
    Anyhow(anyhow::Error),
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Validation(_) => AppError::ValidationError(err.to_string()),
            LedgerError::Conflict { .. } => AppError::ConflictError(err.to_string()),
            LedgerError::Authorization(_) => AppError::AuthorizationError(err.to_string()),
            LedgerError::Transient(_) => AppError::TransientError(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::AuthenticationError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::AuthorizationError(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, msg),
            AppError::TransientError(msg) => {
                tracing::error!("Store unavailable: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, msg)
            }
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<drive_domain::StoreError> for AppError {
    fn from(err: drive_domain::StoreError) -> Self {
        match err {
            drive_domain::StoreError::NotFound(what) => {
                AppError::ValidationError(format!("unknown {what}"))
            }
            drive_domain::StoreError::Unavailable(why) => AppError::TransientError(why),
        }
    }
}
