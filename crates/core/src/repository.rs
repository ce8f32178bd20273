//! Persistence port for appointments.
//!
//! The core only talks to storage through [`AppointmentRepository`]. Every
//! operation except `close` takes a [`CancellationToken`] and must give up
//! with [`BookingError::Cancelled`] once the token fires.

use std::future::Future;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use crate::{
    errors::{BookingError, BookingResult},
    models::appointment::Appointment,
};

#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// All appointments of a trainer in creation order.
    async fn list(
        &self,
        cancel: &CancellationToken,
        trainer_id: i64,
    ) -> BookingResult<Vec<Appointment>>;

    /// Persists `appointment` and returns it with its assigned id.
    ///
    /// Implementations must re-check the trainer and user calendars and insert
    /// inside one exclusive section (see [`crate::booking::ensure_trainer_free`]
    /// and [`crate::booking::ensure_user_free`]), so that two concurrent calls
    /// can never both succeed for overlapping windows.
    async fn create(
        &self,
        cancel: &CancellationToken,
        appointment: Appointment,
    ) -> BookingResult<Appointment>;

    /// Removes an appointment; `NotFound` if no appointment has this id.
    async fn delete(&self, cancel: &CancellationToken, id: i64) -> BookingResult<()>;

    /// Trainer appointments touching `[start, end]`, boundaries included.
    async fn get_trainer_bookings(
        &self,
        cancel: &CancellationToken,
        trainer_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BookingResult<Vec<Appointment>>;

    /// User appointments touching `[start, end]`, boundaries included.
    async fn get_client_bookings(
        &self,
        cancel: &CancellationToken,
        user_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BookingResult<Vec<Appointment>>;

    /// Releases held resources. Calling it more than once is harmless.
    async fn close(&self) -> BookingResult<()>;
}

/// Runs `operation` unless `cancel` fires first.
pub async fn cancellable<T, F>(cancel: &CancellationToken, operation: F) -> BookingResult<T>
where
    F: Future<Output = BookingResult<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(BookingError::Cancelled),
        result = operation => result,
    }
}
