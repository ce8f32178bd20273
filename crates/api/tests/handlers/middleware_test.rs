use appointments_api::middleware::error_handling::AppError;
use appointments_core::{errors::BookingError, mock::MockAppointmentService};
use axum::{
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
    response::IntoResponse,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::test_utils::{get, router, router_with_config, send, test_config};

async fn error_response(err: BookingError) -> (StatusCode, Value) {
    let response = AppError(err).into_response();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[rstest]
#[case(BookingError::Validation("bad input".into()), StatusCode::BAD_REQUEST, "bad input")]
#[case(BookingError::NotFound("appointment 1 not found".into()), StatusCode::NOT_FOUND, "appointment 1 not found")]
#[case(BookingError::Conflict("trainer 1 is busy".into()), StatusCode::CONFLICT, "trainer 1 is busy")]
#[case(BookingError::Cancelled, StatusCode::INTERNAL_SERVER_ERROR, "internal server error")]
#[case(BookingError::Database(eyre::eyre!("relation does not exist")), StatusCode::INTERNAL_SERVER_ERROR, "internal server error")]
#[case(BookingError::Internal("lock poisoned".into()), StatusCode::INTERNAL_SERVER_ERROR, "internal server error")]
#[tokio::test]
async fn test_error_mapping(
    #[case] err: BookingError,
    #[case] expected_status: StatusCode,
    #[case] expected_message: &str,
) {
    let (status, body) = error_response(err).await;

    assert_eq!(status, expected_status);
    assert_eq!(body, json!({ "error": expected_message }));
}

#[tokio::test]
async fn test_health_and_version() {
    let (status, body) = send(router(MockAppointmentService::new()), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));

    let (status, body) = send(router(MockAppointmentService::new()), get("/version")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], json!("appointments-api"));
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_unknown_route() {
    let response = router(MockAppointmentService::new())
        .oneshot(get("/api/v2/appointments"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_preflight_for_configured_origin() {
    let config = test_config(&[("API_CORS_ORIGINS", "http://localhost:3000")]);
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/appointments")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = router_with_config(MockAppointmentService::new(), &config)
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:3000"
    );
}

#[tokio::test]
async fn test_cors_ignores_unlisted_origin() {
    let config = test_config(&[("API_CORS_ORIGINS", "http://localhost:3000")]);
    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "http://evil.test")
        .body(Body::empty())
        .unwrap();

    let response = router_with_config(MockAppointmentService::new(), &config)
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );
}

#[tokio::test]
async fn test_invalid_cors_origin_is_rejected() {
    let config = test_config(&[("API_CORS_ORIGINS", "http://bad\norigin")]);
    let state = std::sync::Arc::new(appointments_api::ApiState {
        service: std::sync::Arc::new(MockAppointmentService::new()),
        shutdown: tokio_util::sync::CancellationToken::new(),
    });

    assert!(appointments_api::app(state, &config).is_err());
}

#[tokio::test]
async fn test_shutdown_cancels_request_token() {
    let mut service = MockAppointmentService::new();
    service
        .expect_list_appointments()
        .withf(|cancel, _| cancel.is_cancelled())
        .times(1)
        .returning(|_, _| Err(BookingError::Cancelled));

    let shutdown = tokio_util::sync::CancellationToken::new();
    shutdown.cancel();
    let state = std::sync::Arc::new(appointments_api::ApiState {
        service: std::sync::Arc::new(service),
        shutdown,
    });
    let app = appointments_api::app(state, &test_config(&[])).unwrap();

    let (status, body) = send(app, get("/api/v1/appointments/trainers/1")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "internal server error" }));
}
