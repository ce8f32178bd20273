use appointments_core::{
    errors::BookingError, mock::MockAppointmentService, models::appointment::Appointment,
};
use axum::http::StatusCode;
use chrono::{DateTime, TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::test_utils::{delete, get, post_json, router, send};

fn utc(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 10, 10, h, m, 0).unwrap()
}

fn stored(id: i64) -> Appointment {
    Appointment {
        id,
        ..Appointment::new(1, 42, utc(16, 0), utc(16, 30))
    }
}

#[tokio::test]
async fn test_list_appointments() {
    let mut service = MockAppointmentService::new();
    service
        .expect_list_appointments()
        .withf(|cancel, trainer_id| *trainer_id == 1 && !cancel.is_cancelled())
        .times(1)
        .returning(|_, _| Ok(vec![stored(1), stored(2)]));

    let (status, body) = send(router(service), get("/api/v1/appointments/trainers/1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {
                "id": 1,
                "trainer_id": 1,
                "user_id": 42,
                "start_time": "2023-10-10T16:00:00Z",
                "end_time": "2023-10-10T16:30:00Z"
            },
            {
                "id": 2,
                "trainer_id": 1,
                "user_id": 42,
                "start_time": "2023-10-10T16:00:00Z",
                "end_time": "2023-10-10T16:30:00Z"
            }
        ])
    );
}

#[tokio::test]
async fn test_list_appointments_empty() {
    let mut service = MockAppointmentService::new();
    service
        .expect_list_appointments()
        .returning(|_, _| Ok(vec![]));

    let (status, body) = send(router(service), get("/api/v1/appointments/trainers/7")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_list_appointments_rejects_bad_trainer_id() {
    for uri in [
        "/api/v1/appointments/trainers/0",
        "/api/v1/appointments/trainers/abc",
    ] {
        let mut service = MockAppointmentService::new();
        service.expect_list_appointments().never();

        let (status, body) = send(router(service), get(uri)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(body["error"].is_string(), "{uri}");
    }
}

#[tokio::test]
async fn test_create_appointment() {
    let mut service = MockAppointmentService::new();
    service
        .expect_create_appointment()
        .withf(|_, appointment| *appointment == Appointment::new(1, 42, utc(16, 0), utc(16, 30)))
        .times(1)
        .returning(|_, appointment| Ok(Appointment { id: 5, ..appointment }));

    // Offsets are accepted on input and normalised to UTC
    let (status, body) = send(
        router(service),
        post_json(
            "/api/v1/appointments",
            r#"{
                "trainer_id": 1,
                "user_id": 42,
                "start_time": "2023-10-10T09:00:00-07:00",
                "end_time": "2023-10-10T09:30:00-07:00"
            }"#,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({
            "id": 5,
            "trainer_id": 1,
            "user_id": 42,
            "start_time": "2023-10-10T16:00:00Z",
            "end_time": "2023-10-10T16:30:00Z"
        })
    );
}

#[tokio::test]
async fn test_create_appointment_request_validation() {
    let cases = [
        (
            r#"{"user_id": 42, "start_time": "2023-10-10T16:00:00Z", "end_time": "2023-10-10T16:30:00Z"}"#,
            "trainer_id must be greater than 0",
        ),
        (
            r#"{"trainer_id": 1, "user_id": -1, "start_time": "2023-10-10T16:00:00Z", "end_time": "2023-10-10T16:30:00Z"}"#,
            "user_id must be greater than 0",
        ),
        (
            r#"{"trainer_id": 1, "user_id": 42, "end_time": "2023-10-10T16:30:00Z"}"#,
            "start_time is required and must be a valid timestamp",
        ),
        (
            r#"{"trainer_id": 1, "user_id": 42, "start_time": "2023-10-10T16:30:00Z", "end_time": "2023-10-10T16:00:00Z"}"#,
            "end_time must be after start_time",
        ),
    ];

    for (payload, expected) in cases {
        let mut service = MockAppointmentService::new();
        service.expect_create_appointment().never();

        let (status, body) = send(
            router(service),
            post_json("/api/v1/appointments", payload),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{payload}");
        assert_eq!(body, json!({ "error": expected }));
    }
}

#[tokio::test]
async fn test_create_appointment_malformed_body() {
    for payload in [
        "{not json",
        r#"{"trainer_id": "one", "user_id": 42}"#,
        r#"{"trainer_id": 1, "user_id": 42, "start_time": "yesterday", "end_time": "2023-10-10T16:30:00Z"}"#,
    ] {
        let mut service = MockAppointmentService::new();
        service.expect_create_appointment().never();

        let (status, body) = send(
            router(service),
            post_json("/api/v1/appointments", payload),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{payload}");
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn test_create_appointment_service_errors() {
    let cases: [(fn() -> BookingError, StatusCode, &str); 4] = [
        (
            || BookingError::Validation("appointment must be exactly 30 minutes, got 35m".into()),
            StatusCode::BAD_REQUEST,
            "appointment must be exactly 30 minutes, got 35m",
        ),
        (
            || BookingError::Conflict("trainer 1 is not available".into()),
            StatusCode::CONFLICT,
            "trainer 1 is not available",
        ),
        (
            || BookingError::Database(eyre::eyre!("connection refused")),
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal server error",
        ),
        (
            || BookingError::Cancelled,
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal server error",
        ),
    ];

    for (error, expected_status, expected_message) in cases {
        let mut service = MockAppointmentService::new();
        service
            .expect_create_appointment()
            .times(1)
            .returning(move |_, _| Err(error()));

        let (status, body) = send(
            router(service),
            post_json(
                "/api/v1/appointments",
                r#"{"trainer_id": 1, "user_id": 42, "start_time": "2023-10-10T16:00:00Z", "end_time": "2023-10-10T16:30:00Z"}"#,
            ),
        )
        .await;

        assert_eq!(status, expected_status);
        assert_eq!(body, json!({ "error": expected_message }));
    }
}

#[tokio::test]
async fn test_delete_appointment() {
    let mut service = MockAppointmentService::new();
    service
        .expect_delete_appointment()
        .withf(|_, id| *id == 5)
        .times(1)
        .returning(|_, _| Ok(()));

    let (status, body) = send(router(service), delete("/api/v1/appointments/5")).await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, serde_json::Value::Null);
}

#[tokio::test]
async fn test_delete_missing_appointment() {
    let mut service = MockAppointmentService::new();
    service
        .expect_delete_appointment()
        .returning(|_, id| Err(BookingError::NotFound(format!("appointment {id} not found"))));

    let (status, body) = send(router(service), delete("/api/v1/appointments/99")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "appointment 99 not found" }));
}
