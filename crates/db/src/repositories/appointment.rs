use crate::models::DbAppointment;
use chrono::{DateTime, Utc};
use eyre::Result;
use sqlx::PgExecutor;

pub async fn create_appointment<'e, E: PgExecutor<'e>>(
    executor: E,
    trainer_id: i64,
    user_id: i64,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
) -> Result<DbAppointment> {
    let appointment = sqlx::query_as::<_, DbAppointment>(
        r#"
        INSERT INTO appointments (trainer_id, user_id, start_time, end_time)
        VALUES ($1, $2, $3, $4)
        RETURNING id, trainer_id, user_id, start_time, end_time
        "#,
    )
    .bind(trainer_id)
    .bind(user_id)
    .bind(start_time)
    .bind(end_time)
    .fetch_one(executor)
    .await?;

    Ok(appointment)
}

pub async fn get_appointments_by_trainer_id<'e, E: PgExecutor<'e>>(
    executor: E,
    trainer_id: i64,
) -> Result<Vec<DbAppointment>> {
    let appointments = sqlx::query_as::<_, DbAppointment>(
        r#"
        SELECT id, trainer_id, user_id, start_time, end_time
        FROM appointments
        WHERE trainer_id = $1
        ORDER BY id ASC
        "#,
    )
    .bind(trainer_id)
    .fetch_all(executor)
    .await?;

    Ok(appointments)
}

/// Returns the number of deleted rows.
pub async fn delete_appointment<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM appointments
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

// Both booking lookups are inclusive at the boundaries.

pub async fn get_trainer_bookings<'e, E: PgExecutor<'e>>(
    executor: E,
    trainer_id: i64,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<DbAppointment>> {
    let appointments = sqlx::query_as::<_, DbAppointment>(
        r#"
        SELECT id, trainer_id, user_id, start_time, end_time
        FROM appointments
        WHERE trainer_id = $1
        AND end_time >= $2
        AND start_time <= $3
        ORDER BY start_time ASC
        "#,
    )
    .bind(trainer_id)
    .bind(start)
    .bind(end)
    .fetch_all(executor)
    .await?;

    Ok(appointments)
}

pub async fn get_client_bookings<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: i64,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<DbAppointment>> {
    let appointments = sqlx::query_as::<_, DbAppointment>(
        r#"
        SELECT id, trainer_id, user_id, start_time, end_time
        FROM appointments
        WHERE user_id = $1
        AND end_time >= $2
        AND start_time <= $3
        ORDER BY start_time ASC
        "#,
    )
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_all(executor)
    .await?;

    Ok(appointments)
}

/// Serializes booking transactions per key until the surrounding transaction ends.
pub async fn lock_calendar<'e, E: PgExecutor<'e>>(executor: E, key: &str) -> Result<()> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
        .bind(key)
        .execute(executor)
        .await?;

    Ok(())
}
