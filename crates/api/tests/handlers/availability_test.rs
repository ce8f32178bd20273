use appointments_core::{
    errors::BookingError, mock::MockAppointmentService, models::time_slot::TimeSlot,
};
use axum::http::StatusCode;
use chrono::{DateTime, TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::test_utils::{get, router, send};

fn utc(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 10, 10, h, m, 0).unwrap()
}

fn slot(h: u32, m: u32) -> TimeSlot {
    let start_time = utc(h, m);
    TimeSlot {
        start_time,
        end_time: start_time + chrono::Duration::minutes(30),
        available: true,
    }
}

#[tokio::test]
async fn test_get_availability() {
    let mut service = MockAppointmentService::new();
    service
        .expect_get_availability()
        .withf(|_, trainer_id, start, end| {
            *trainer_id == 1 && *start == utc(15, 0) && *end == utc(17, 0)
        })
        .times(1)
        .returning(|_, _, _, _| Ok(vec![slot(15, 0), slot(15, 30), slot(16, 30)]));

    let (status, body) = send(
        router(service),
        get("/api/v1/appointments/trainers/1/availability?starts_at=2023-10-10T08:00:00-07:00&ends_at=2023-10-10T17:00:00Z"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            { "start_time": "2023-10-10T15:00:00Z", "end_time": "2023-10-10T15:30:00Z" },
            { "start_time": "2023-10-10T15:30:00Z", "end_time": "2023-10-10T16:00:00Z" },
            { "start_time": "2023-10-10T16:30:00Z", "end_time": "2023-10-10T17:00:00Z" }
        ])
    );
}

#[tokio::test]
async fn test_get_availability_nothing_free() {
    let mut service = MockAppointmentService::new();
    service
        .expect_get_availability()
        .returning(|_, _, _, _| Ok(vec![]));

    let (status, body) = send(
        router(service),
        get("/api/v1/appointments/trainers/1/availability?starts_at=2023-10-10T15:00:00Z&ends_at=2023-10-10T15:30:00Z"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_get_availability_rejects_bad_requests() {
    let cases = [
        (
            "/api/v1/appointments/trainers/0/availability?starts_at=2023-10-10T15:00:00Z&ends_at=2023-10-10T17:00:00Z",
            Some("trainer_id must be greater than 0"),
        ),
        (
            "/api/v1/appointments/trainers/1/availability?ends_at=2023-10-10T17:00:00Z",
            Some("starts_at is required and must be a valid timestamp"),
        ),
        (
            "/api/v1/appointments/trainers/1/availability?starts_at=2023-10-10T15:00:00Z",
            Some("ends_at is required and must be a valid timestamp"),
        ),
        (
            "/api/v1/appointments/trainers/1/availability?starts_at=2023-10-10T17:00:00Z&ends_at=2023-10-10T15:00:00Z",
            Some("ends_at must be after starts_at"),
        ),
        (
            "/api/v1/appointments/trainers/1/availability?starts_at=2023-10-10T15:00:00Z&ends_at=2023-10-10T15:00:00Z",
            Some("ends_at must be after starts_at"),
        ),
        (
            "/api/v1/appointments/trainers/1/availability?starts_at=0001-01-01T00:00:00Z&ends_at=9999-12-31T23:59:59Z",
            Some("availability window must not exceed 92 days"),
        ),
        (
            "/api/v1/appointments/trainers/1/availability?starts_at=tomorrow&ends_at=2023-10-10T17:00:00Z",
            None,
        ),
        (
            "/api/v1/appointments/trainers/x/availability?starts_at=2023-10-10T15:00:00Z&ends_at=2023-10-10T17:00:00Z",
            None,
        ),
    ];

    for (uri, expected) in cases {
        let mut service = MockAppointmentService::new();
        service.expect_get_availability().never();

        let (status, body) = send(router(service), get(uri)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        match expected {
            Some(message) => assert_eq!(body, json!({ "error": message })),
            None => assert!(body["error"].is_string(), "{uri}"),
        }
    }
}

#[tokio::test]
async fn test_get_availability_database_error_is_hidden() {
    let mut service = MockAppointmentService::new();
    service
        .expect_get_availability()
        .returning(|_, _, _, _| Err(BookingError::Database(eyre::eyre!("password authentication failed"))));

    let (status, body) = send(
        router(service),
        get("/api/v1/appointments/trainers/1/availability?starts_at=2023-10-10T15:00:00Z&ends_at=2023-10-10T17:00:00Z"),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "internal server error" }));
}
