//! # Availability Handlers
//!
//! Answers "when can this trainer still be booked" for a caller-supplied
//! window. Slot generation lives in the booking service; this module only
//! validates the window and shapes the response.

use std::sync::Arc;

use appointments_core::{
    availability::ensure_window_within_limit,
    errors::{BookingError, BookingResult},
    models::time_slot::{AvailabilityQuery, AvailabilityResponse},
};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
};
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::{
    ApiState,
    handlers::{appointment::ensure_trainer_id, request_scope},
    middleware::error_handling::AppError,
};

/// Validates the availability window, returning it as `(starts_at, ends_at)`.
pub fn validate_availability_query(
    trainer_id: i64,
    query: &AvailabilityQuery,
) -> BookingResult<(DateTime<Utc>, DateTime<Utc>)> {
    ensure_trainer_id(trainer_id)?;

    let starts_at = query.starts_at.ok_or_else(|| {
        BookingError::Validation("starts_at is required and must be a valid timestamp".to_string())
    })?;
    let ends_at = query.ends_at.ok_or_else(|| {
        BookingError::Validation("ends_at is required and must be a valid timestamp".to_string())
    })?;

    if ends_at <= starts_at {
        return Err(BookingError::Validation(
            "ends_at must be after starts_at".to_string(),
        ));
    }
    ensure_window_within_limit(starts_at, ends_at)?;

    Ok((starts_at, ends_at))
}

/// Lists the free 30-minute slots of a trainer
///
/// # Endpoint
///
/// ```text
/// GET /api/v1/appointments/trainers/:trainer_id/availability?starts_at=..&ends_at=..
/// ```
///
/// Both bounds are RFC 3339 timestamps in any offset; the slots come back
/// in UTC.
#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<Arc<ApiState>>,
    path: Result<Path<i64>, PathRejection>,
    query: Result<Query<AvailabilityQuery>, QueryRejection>,
) -> Result<Json<Vec<AvailabilityResponse>>, AppError> {
    let Path(trainer_id) = path?;
    let Query(query) = query?;
    let (starts_at, ends_at) = validate_availability_query(trainer_id, &query)?;

    debug!(
        "Availability request: trainer_id={}, starts_at={}, ends_at={}",
        trainer_id,
        starts_at.to_rfc3339(),
        ends_at.to_rfc3339()
    );

    let (cancel, _guard) = request_scope(&state);
    let slots = state
        .service
        .get_availability(&cancel, trainer_id, starts_at, ends_at)
        .await?;

    Ok(Json(
        slots.into_iter().map(AvailabilityResponse::from).collect(),
    ))
}
