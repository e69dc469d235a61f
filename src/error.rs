use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unauthorized: {0}")]
    Unauthorized(anyhow::Error),

    #[error("Forbidden: {0}")]
    Forbidden(anyhow::Error),

    #[error("Store read failure: {0}")]
    StoreRead(anyhow::Error),

    #[error("Store write failure: {0}")]
    StoreWrite(anyhow::Error),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
        }

        // Callers only ever see the fixed per-variant message. The underlying
        // error carries upstream service detail and is logged where it arises.
        let (status, message) = match self {
            AppError::Unauthorized(_) => (
                StatusCode::UNAUTHORIZED,
                "Authorization token missing or invalid.",
            ),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, "Invalid authentication token."),
            AppError::StoreRead(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to retrieve data.",
            ),
            AppError::StoreWrite(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to save data.")
            }
            AppError::InternalError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error.")
            }
            AppError::ConfigError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server configuration error: service credential not available.",
            ),
        };

        (
            status,
            Json(ErrorResponse {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}
