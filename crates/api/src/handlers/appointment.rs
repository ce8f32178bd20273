use std::sync::Arc;

use appointments_core::{
    errors::{BookingError, BookingResult},
    models::appointment::{Appointment, AppointmentResponse, CreateAppointmentRequest},
};
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use tracing::debug;

use crate::{ApiState, handlers::request_scope, middleware::error_handling::AppError};

pub(crate) fn ensure_trainer_id(trainer_id: i64) -> BookingResult<()> {
    if trainer_id <= 0 {
        return Err(BookingError::Validation(
            "trainer_id must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

/// Checks the request shape and turns it into an unsaved [`Appointment`].
///
/// Business rules such as duration and opening hours are left to the booking
/// service.
pub fn validate_create_request(request: &CreateAppointmentRequest) -> BookingResult<Appointment> {
    ensure_trainer_id(request.trainer_id)?;
    if request.user_id <= 0 {
        return Err(BookingError::Validation(
            "user_id must be greater than 0".to_string(),
        ));
    }

    let start_time = request.start_time.ok_or_else(|| {
        BookingError::Validation("start_time is required and must be a valid timestamp".to_string())
    })?;
    let end_time = request.end_time.ok_or_else(|| {
        BookingError::Validation("end_time is required and must be a valid timestamp".to_string())
    })?;

    if end_time <= start_time {
        return Err(BookingError::Validation(
            "end_time must be after start_time".to_string(),
        ));
    }

    Ok(Appointment::new(
        request.trainer_id,
        request.user_id,
        start_time,
        end_time,
    ))
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<ApiState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<AppointmentResponse>>, AppError> {
    let Path(trainer_id) = path?;
    ensure_trainer_id(trainer_id)?;

    let (cancel, _guard) = request_scope(&state);
    let appointments = state.service.list_appointments(&cancel, trainer_id).await?;

    Ok(Json(
        appointments
            .into_iter()
            .map(AppointmentResponse::from)
            .collect(),
    ))
}

#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<CreateAppointmentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AppointmentResponse>), AppError> {
    let Json(payload) = payload?;
    let appointment = validate_create_request(&payload)?;

    let (cancel, _guard) = request_scope(&state);
    let created = state.service.create_appointment(&cancel, appointment).await?;
    debug!("Booked appointment {}", created.id);

    Ok((StatusCode::CREATED, Json(created.into())))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<Arc<ApiState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = path?;

    let (cancel, _guard) = request_scope(&state);
    state.service.delete_appointment(&cancel, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
