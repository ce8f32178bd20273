use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::appointment::Appointment;

/// A candidate appointment window produced by the availability calculator.
/// Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub available: bool,
}

impl TimeSlot {
    /// Strict overlap: slots that only share a boundary with the booking do not overlap.
    pub fn overlaps(&self, booking: &Appointment) -> bool {
        self.start_time < booking.end_time && self.end_time > booking.start_time
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AvailabilityQuery {
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl From<TimeSlot> for AvailabilityResponse {
    fn from(slot: TimeSlot) -> Self {
        Self {
            start_time: slot.start_time,
            end_time: slot.end_time,
        }
    }
}
