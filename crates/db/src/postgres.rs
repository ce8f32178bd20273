use appointments_core::{
    booking::{ensure_trainer_free, ensure_user_free},
    errors::{BookingError, BookingResult},
    models::appointment::Appointment,
    repository::{AppointmentRepository, cancellable},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eyre::WrapErr;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{DbPool, repositories::appointment as queries};

/// PostgreSQL-backed [`AppointmentRepository`].
#[derive(Clone)]
pub struct PgAppointmentRepository {
    pool: DbPool,
}

impl PgAppointmentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn create_in_transaction(&self, appointment: Appointment) -> BookingResult<Appointment> {
        let mut tx = self
            .pool
            .begin()
            .await
            .wrap_err("Failed to start booking transaction")?;

        // Trainer before user, always, so two bookings cannot wait on each other.
        queries::lock_calendar(&mut *tx, &format!("trainer:{}", appointment.trainer_id)).await?;
        queries::lock_calendar(&mut *tx, &format!("user:{}", appointment.user_id)).await?;

        let trainer_bookings = queries::get_trainer_bookings(
            &mut *tx,
            appointment.trainer_id,
            appointment.start_time,
            appointment.end_time,
        )
        .await?;
        ensure_trainer_free(&appointment, &into_domain(trainer_bookings))?;

        let client_bookings = queries::get_client_bookings(
            &mut *tx,
            appointment.user_id,
            appointment.start_time,
            appointment.end_time,
        )
        .await?;
        ensure_user_free(&appointment, &into_domain(client_bookings))?;

        let created = queries::create_appointment(
            &mut *tx,
            appointment.trainer_id,
            appointment.user_id,
            appointment.start_time,
            appointment.end_time,
        )
        .await?;

        tx.commit()
            .await
            .wrap_err("Failed to commit booking transaction")?;

        debug!("Created appointment: {:?}", created);
        Ok(created.into())
    }
}

fn into_domain(rows: Vec<crate::models::DbAppointment>) -> Vec<Appointment> {
    rows.into_iter().map(Appointment::from).collect()
}

#[async_trait]
impl AppointmentRepository for PgAppointmentRepository {
    async fn list(
        &self,
        cancel: &CancellationToken,
        trainer_id: i64,
    ) -> BookingResult<Vec<Appointment>> {
        cancellable(cancel, async {
            let rows = queries::get_appointments_by_trainer_id(&self.pool, trainer_id).await?;
            debug!("Listed {} appointments for trainer {}", rows.len(), trainer_id);
            Ok::<_, BookingError>(into_domain(rows))
        })
        .await
    }

    async fn create(
        &self,
        cancel: &CancellationToken,
        appointment: Appointment,
    ) -> BookingResult<Appointment> {
        // Dropping the transaction on cancellation rolls it back.
        cancellable(cancel, self.create_in_transaction(appointment)).await
    }

    async fn delete(&self, cancel: &CancellationToken, id: i64) -> BookingResult<()> {
        cancellable(cancel, async {
            match queries::delete_appointment(&self.pool, id).await? {
                0 => Err(BookingError::NotFound(format!("appointment {id} not found"))),
                _ => {
                    debug!("Deleted appointment {}", id);
                    Ok(())
                }
            }
        })
        .await
    }

    async fn get_trainer_bookings(
        &self,
        cancel: &CancellationToken,
        trainer_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BookingResult<Vec<Appointment>> {
        cancellable(cancel, async {
            let rows = queries::get_trainer_bookings(&self.pool, trainer_id, start, end).await?;
            Ok::<_, BookingError>(into_domain(rows))
        })
        .await
    }

    async fn get_client_bookings(
        &self,
        cancel: &CancellationToken,
        user_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BookingResult<Vec<Appointment>> {
        cancellable(cancel, async {
            let rows = queries::get_client_bookings(&self.pool, user_id, start, end).await?;
            Ok::<_, BookingError>(into_domain(rows))
        })
        .await
    }

    async fn close(&self) -> BookingResult<()> {
        self.pool.close().await;
        Ok(())
    }
}
