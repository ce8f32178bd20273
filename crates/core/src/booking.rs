//! # Booking Engine
//!
//! Orchestrates validation, double-booking checks and persistence. The engine
//! holds no mutable state of its own; all shared state lives behind the
//! [`AppointmentRepository`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::{
    availability,
    errors::{BookingError, BookingResult},
    models::{appointment::Appointment, time_slot::TimeSlot},
    repository::AppointmentRepository,
    validation::{DEFAULT_VALIDATION_RULES, ValidationRule},
};

/// Operations the service exposes to outer layers such as the HTTP API.
#[async_trait]
pub trait AppointmentService: Send + Sync {
    async fn list_appointments(
        &self,
        cancel: &CancellationToken,
        trainer_id: i64,
    ) -> BookingResult<Vec<Appointment>>;

    async fn create_appointment(
        &self,
        cancel: &CancellationToken,
        appointment: Appointment,
    ) -> BookingResult<Appointment>;

    async fn delete_appointment(&self, cancel: &CancellationToken, id: i64) -> BookingResult<()>;

    /// Free slots for `trainer_id` inside the window. Callers must pass a
    /// non-empty window (`window_end > window_start`); windows longer than
    /// [`MAX_WINDOW_DAYS`](availability::MAX_WINDOW_DAYS) are rejected.
    async fn get_availability(
        &self,
        cancel: &CancellationToken,
        trainer_id: i64,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> BookingResult<Vec<TimeSlot>>;
}

/// Rejects `appointment` if the trainer already has a booking touching its window.
pub fn ensure_trainer_free(appointment: &Appointment, bookings: &[Appointment]) -> BookingResult<()> {
    if bookings.is_empty() {
        return Ok(());
    }
    Err(BookingError::Conflict(format!(
        "trainer {} is not available between {} and {}",
        appointment.trainer_id,
        appointment.start_time.to_rfc3339(),
        appointment.end_time.to_rfc3339()
    )))
}

/// Rejects `appointment` if the user already has a booking touching its window.
pub fn ensure_user_free(appointment: &Appointment, bookings: &[Appointment]) -> BookingResult<()> {
    if bookings.is_empty() {
        return Ok(());
    }
    Err(BookingError::Conflict(format!(
        "user {} is not available between {} and {}",
        appointment.user_id,
        appointment.start_time.to_rfc3339(),
        appointment.end_time.to_rfc3339()
    )))
}

pub struct BookingService {
    repo: Arc<dyn AppointmentRepository>,
    rules: Vec<ValidationRule>,
}

impl BookingService {
    /// Engine applying [`DEFAULT_VALIDATION_RULES`] on creation.
    pub fn new(repo: Arc<dyn AppointmentRepository>) -> Self {
        Self::with_rules(repo, DEFAULT_VALIDATION_RULES.to_vec())
    }

    /// Engine applying a caller-chosen rule set, e.g. none at all for imports.
    pub fn with_rules(repo: Arc<dyn AppointmentRepository>, rules: Vec<ValidationRule>) -> Self {
        Self { repo, rules }
    }
}

#[async_trait]
impl AppointmentService for BookingService {
    async fn list_appointments(
        &self,
        cancel: &CancellationToken,
        trainer_id: i64,
    ) -> BookingResult<Vec<Appointment>> {
        self.repo.list(cancel, trainer_id).await
    }

    async fn create_appointment(
        &self,
        cancel: &CancellationToken,
        appointment: Appointment,
    ) -> BookingResult<Appointment> {
        if let Err(err) = appointment.validate(&self.rules) {
            info!("Rejected appointment for trainer {}: {}", appointment.trainer_id, err);
            return Err(err);
        }

        let trainer_bookings = self
            .repo
            .get_trainer_bookings(
                cancel,
                appointment.trainer_id,
                appointment.start_time,
                appointment.end_time,
            )
            .await?;
        ensure_trainer_free(&appointment, &trainer_bookings)
            .inspect_err(|err| info!("{}", err))?;

        let client_bookings = self
            .repo
            .get_client_bookings(
                cancel,
                appointment.user_id,
                appointment.start_time,
                appointment.end_time,
            )
            .await?;
        ensure_user_free(&appointment, &client_bookings).inspect_err(|err| info!("{}", err))?;

        // The repository repeats both checks atomically with the insert.
        let created = self.repo.create(cancel, appointment).await?;
        debug!(
            "Created appointment {} for trainer {} and user {}",
            created.id, created.trainer_id, created.user_id
        );
        Ok(created)
    }

    async fn delete_appointment(&self, cancel: &CancellationToken, id: i64) -> BookingResult<()> {
        self.repo.delete(cancel, id).await
    }

    async fn get_availability(
        &self,
        cancel: &CancellationToken,
        trainer_id: i64,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> BookingResult<Vec<TimeSlot>> {
        availability::ensure_window_within_limit(window_start, window_end)?;

        let booked = self
            .repo
            .get_trainer_bookings(cancel, trainer_id, window_start, window_end)
            .await?;

        debug!(
            "Slot calculation: original_start={}, rounded_start={}",
            window_start.to_rfc3339(),
            availability::round_up_to_next_slot(window_start).to_rfc3339()
        );

        // Long windows walk many slots; keep that off the async workers.
        tokio::task::spawn_blocking(move || {
            availability::free_slots(&booked, window_start, window_end)
        })
        .await
        .map_err(|err| BookingError::Internal(Box::new(err)))
    }
}
