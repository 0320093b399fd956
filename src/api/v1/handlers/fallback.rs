/*
 * Responsibility
 * - Unmatched paths and unsupported methods answer with the standard error body
 */
use crate::error::AppError;

pub async fn not_found() -> AppError {
    AppError::NotFound("Not found".to_string())
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
