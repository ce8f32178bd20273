//! # Error Handling Middleware
//!
//! Maps [`BookingError`] to HTTP status codes and JSON error bodies. Client
//! errors carry their message; everything else is logged and answered with a
//! fixed body so internal details never leave the process.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use appointments_core::errors::BookingError;
use serde_json::json;
use tracing::error;

pub const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use appointments_api::middleware::error_handling::AppError;
/// use appointments_core::errors::BookingError;
///
/// fn check(trainer_id: i64) -> Result<(), AppError> {
///     if trainer_id <= 0 {
///         return Err(BookingError::Validation("trainer_id must be greater than 0".into()).into());
///     }
///     Ok(())
/// }
/// # fn main() { assert!(check(0).is_err()); }
/// ```
#[derive(Debug)]
pub struct AppError(pub BookingError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            BookingError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            BookingError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            BookingError::Conflict(message) => (StatusCode::CONFLICT, message),
            err @ (BookingError::Cancelled
            | BookingError::Database(_)
            | BookingError::Internal(_)) => {
                error!("Request failed: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Allows `?` on `BookingResult` inside handlers.
impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        AppError(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError(BookingError::Validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError(BookingError::Validation(rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError(BookingError::Validation(rejection.body_text()))
    }
}
