use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::document::DocumentError;
use crate::template::MappingError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Invalid mapping: {0}")]
    InvalidMapping(String),

    #[error("Invalid multipart body: {0}")]
    Multipart(String),

    #[error("{0}")]
    MissingField(String),

    #[error("Failed to fill presentation: {0}")]
    Document(#[from] DocumentError),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidJson(_) | AppError::InvalidMapping(_) | AppError::Multipart(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::MissingField(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Document(_) | AppError::Internal(_) | AppError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<MappingError> for AppError {
    fn from(err: MappingError) -> Self {
        match err {
            MappingError::InvalidJson(e) => AppError::InvalidJson(e.to_string()),
            MappingError::NotAnObject => AppError::InvalidMapping(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(status = %status.as_u16(), message = %message, "API error");
        } else {
            tracing::warn!(status = %status.as_u16(), message = %message, "Request rejected");
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
