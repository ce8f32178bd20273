use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A fixed-length meeting between a trainer and a user.
///
/// `id` is assigned by the repository on creation; `0` means the appointment
/// has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub trainer_id: i64,
    pub user_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl Appointment {
    pub fn new(
        trainer_id: i64,
        user_id: i64,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: 0,
            trainer_id,
            user_id,
            start_time,
            end_time,
        }
    }

    /// Inclusive range test used for booking lookups: an appointment that
    /// merely touches `[start, end]` at either boundary still matches.
    pub fn touches(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.end_time >= start && self.start_time <= end
    }
}

/// Body of `POST /api/v1/appointments`. Missing ids decode as `0` so they fail
/// request validation instead of JSON decoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    #[serde(default)]
    pub trainer_id: i64,
    #[serde(default)]
    pub user_id: i64,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentResponse {
    pub id: i64,
    pub trainer_id: i64,
    pub user_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl From<Appointment> for AppointmentResponse {
    fn from(appointment: Appointment) -> Self {
        Self {
            id: appointment.id,
            trainer_id: appointment.trainer_id,
            user_id: appointment.user_id,
            start_time: appointment.start_time,
            end_time: appointment.end_time,
        }
    }
}
