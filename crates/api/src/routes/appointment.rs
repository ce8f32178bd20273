use axum::{
    Router,
    routing::{delete, get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/v1/appointments",
            post(handlers::appointment::create_appointment),
        )
        .route(
            "/api/v1/appointments/:id",
            delete(handlers::appointment::delete_appointment),
        )
        .route(
            "/api/v1/appointments/trainers/:trainer_id",
            get(handlers::appointment::list_appointments),
        )
}
