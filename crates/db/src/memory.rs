use appointments_core::{
    booking::{ensure_trainer_free, ensure_user_free},
    errors::{BookingError, BookingResult},
    models::appointment::Appointment,
    repository::{AppointmentRepository, cancellable},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug, Default)]
struct MemoryStore {
    appointments: Vec<Appointment>,
    last_id: i64,
}

impl MemoryStore {
    fn trainer_bookings(
        &self,
        trainer_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<Appointment> {
        self.appointments
            .iter()
            .filter(|apt| apt.trainer_id == trainer_id && apt.touches(start, end))
            .cloned()
            .collect()
    }

    fn client_bookings(
        &self,
        user_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<Appointment> {
        self.appointments
            .iter()
            .filter(|apt| apt.user_id == user_id && apt.touches(start, end))
            .cloned()
            .collect()
    }
}

/// [`AppointmentRepository`] keeping everything in process memory.
///
/// Reads share the lock, writes take it exclusively. `create` checks both
/// calendars and inserts under one write guard.
#[derive(Debug, Default)]
pub struct MemoryAppointmentRepository {
    store: RwLock<MemoryStore>,
}

impl MemoryAppointmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn read(
        &self,
        cancel: &CancellationToken,
    ) -> BookingResult<RwLockReadGuard<'_, MemoryStore>> {
        cancellable(cancel, async { Ok(self.store.read().await) }).await
    }

    async fn write(
        &self,
        cancel: &CancellationToken,
    ) -> BookingResult<RwLockWriteGuard<'_, MemoryStore>> {
        cancellable(cancel, async { Ok(self.store.write().await) }).await
    }
}

#[async_trait]
impl AppointmentRepository for MemoryAppointmentRepository {
    async fn list(
        &self,
        cancel: &CancellationToken,
        trainer_id: i64,
    ) -> BookingResult<Vec<Appointment>> {
        let store = self.read(cancel).await?;
        Ok(store
            .appointments
            .iter()
            .filter(|apt| apt.trainer_id == trainer_id)
            .cloned()
            .collect())
    }

    async fn create(
        &self,
        cancel: &CancellationToken,
        appointment: Appointment,
    ) -> BookingResult<Appointment> {
        let mut store = self.write(cancel).await?;

        let trainer_bookings = store.trainer_bookings(
            appointment.trainer_id,
            appointment.start_time,
            appointment.end_time,
        );
        ensure_trainer_free(&appointment, &trainer_bookings)?;

        let client_bookings = store.client_bookings(
            appointment.user_id,
            appointment.start_time,
            appointment.end_time,
        );
        ensure_user_free(&appointment, &client_bookings)?;

        store.last_id += 1;
        let created = Appointment {
            id: store.last_id,
            ..appointment
        };
        store.appointments.push(created.clone());

        debug!("Created appointment: {:?}", created);
        Ok(created)
    }

    async fn delete(&self, cancel: &CancellationToken, id: i64) -> BookingResult<()> {
        let mut store = self.write(cancel).await?;

        match store.appointments.iter().position(|apt| apt.id == id) {
            Some(index) => {
                // `remove` keeps creation order intact
                store.appointments.remove(index);
                debug!("Deleted appointment {}", id);
                Ok(())
            }
            None => Err(BookingError::NotFound(format!("appointment {id} not found"))),
        }
    }

    async fn get_trainer_bookings(
        &self,
        cancel: &CancellationToken,
        trainer_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BookingResult<Vec<Appointment>> {
        let store = self.read(cancel).await?;
        Ok(store.trainer_bookings(trainer_id, start, end))
    }

    async fn get_client_bookings(
        &self,
        cancel: &CancellationToken,
        user_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BookingResult<Vec<Appointment>> {
        let store = self.read(cancel).await?;
        Ok(store.client_bookings(user_id, start, end))
    }

    async fn close(&self) -> BookingResult<()> {
        Ok(())
    }
}
