use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::matchday::roster::RosterError;
use crate::models::common::ApiResponse;

/// Every handler failure ends up here and is rendered as a JSON body.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    AuthenticationRequired(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    ConfirmationRequired(String),

    #[error("Database error: {0}")]
    Persistence(#[from] sqlx::Error),
}

impl AppError {
    pub fn match_not_found(match_number: i32) -> Self {
        AppError::NotFound(format!("Match {} not found", match_number))
    }
}

impl From<RosterError> for AppError {
    fn from(e: RosterError) -> Self {
        match e {
            RosterError::ConfirmationRequired => AppError::ConfirmationRequired(e.to_string()),
            other => AppError::Validation(other.to_string()),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::AuthenticationRequired(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ConfirmationRequired(_) => StatusCode::CONFLICT,
            AppError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Persistence(e) => {
                tracing::error!("Persistence failure: {}", e);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(ApiResponse::<()>::error(message))
    }
}
