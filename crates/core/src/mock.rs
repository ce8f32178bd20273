use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::mock;
use tokio_util::sync::CancellationToken;

use crate::{
    booking::AppointmentService,
    errors::BookingResult,
    models::{appointment::Appointment, time_slot::TimeSlot},
    repository::AppointmentRepository,
};

// Mock repository for testing the booking engine
mock! {
    pub AppointmentRepo {}

    #[async_trait]
    impl AppointmentRepository for AppointmentRepo {
        async fn list(
            &self,
            cancel: &CancellationToken,
            trainer_id: i64,
        ) -> BookingResult<Vec<Appointment>>;

        async fn create(
            &self,
            cancel: &CancellationToken,
            appointment: Appointment,
        ) -> BookingResult<Appointment>;

        async fn delete(&self, cancel: &CancellationToken, id: i64) -> BookingResult<()>;

        async fn get_trainer_bookings(
            &self,
            cancel: &CancellationToken,
            trainer_id: i64,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> BookingResult<Vec<Appointment>>;

        async fn get_client_bookings(
            &self,
            cancel: &CancellationToken,
            user_id: i64,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> BookingResult<Vec<Appointment>>;

        async fn close(&self) -> BookingResult<()>;
    }
}

// Mock service for testing the HTTP layer
mock! {
    pub AppointmentService {}

    #[async_trait]
    impl AppointmentService for AppointmentService {
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

        async fn get_availability(
            &self,
            cancel: &CancellationToken,
            trainer_id: i64,
            window_start: DateTime<Utc>,
            window_end: DateTime<Utc>,
        ) -> BookingResult<Vec<TimeSlot>>;
    }
}
