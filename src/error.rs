/*
 * Responsibility
 * - The app-wide AppError
 * - IntoResponse (HTTP status + `{"errors": [...]}` body)
 * - Uniform conversion of repo / json / auth failures
 */
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::RepoError;
use crate::services::password::PasswordError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub errors: Vec<String>,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("not found: {0}")]
    NotFound(String),
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(vec![message.into()])
    }

    pub fn user_not_found(id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("User {id} not found"))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let errors = match self {
            AppError::Validation(errors) => errors,
            AppError::NotFound(message) => vec![message],
            AppError::Unauthorized => vec!["Please authenticate".to_string()],
            AppError::Forbidden => vec!["Forbidden".to_string()],
            AppError::MethodNotAllowed => vec!["Method not allowed".to_string()],
            AppError::Internal => vec!["Internal server error".to_string()],
        };

        (status, Json(ErrorResponse { errors })).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            // unique email raced past the pre-insert check
            RepoError::Conflict => AppError::validation("User email already exists"),
            RepoError::Db(err) => {
                tracing::error!(error = %err, "store call failed");
                AppError::Internal
            }
        }
    }
}

impl From<PasswordError> for AppError {
    fn from(e: PasswordError) -> Self {
        tracing::error!(error = %e, "password hashing failed");
        AppError::Internal
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::validation(e.body_text())
    }
}
