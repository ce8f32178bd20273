//! # Availability Calculator
//!
//! Derives the free slots of a trainer from the bookings that intersect a
//! requested window.
//!
//! 1. Round the window start up to the next slot boundary (minute 00 or 30, UTC)
//! 2. Walk fixed 30 minute slots while the slot still ends inside the window
//! 3. Keep slots whose local start hour lies in business hours
//! 4. Drop slots that strictly overlap an existing booking
//!
//! The business-hour filter looks only at the local start hour, which is not
//! the predicate used by
//! [`must_be_during_business_hours`](crate::validation::must_be_during_business_hours).

use chrono::{DateTime, Duration, Timelike, Utc};

use crate::{
    calendar::{self, SLOT_MINUTES},
    errors::{BookingError, BookingResult},
    models::{appointment::Appointment, time_slot::TimeSlot},
};

/// Longest window, in days, a single availability query may span.
pub const MAX_WINDOW_DAYS: i64 = 92;

/// Rejects windows longer than [`MAX_WINDOW_DAYS`].
pub fn ensure_window_within_limit(
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> BookingResult<()> {
    if window_end - window_start > Duration::days(MAX_WINDOW_DAYS) {
        return Err(BookingError::Validation(format!(
            "availability window must not exceed {MAX_WINDOW_DAYS} days"
        )));
    }
    Ok(())
}

/// Rounds `instant` up to the next `:00` or `:30` boundary.
///
/// Only the UTC minute decides: an instant whose minute is 0 or 30 is
/// returned unchanged, seconds included. Otherwise the result is the next
/// half or full hour with seconds dropped.
pub fn round_up_to_next_slot(instant: DateTime<Utc>) -> DateTime<Utc> {
    let minute = instant.minute();
    if minute % SLOT_MINUTES as u32 == 0 {
        return instant;
    }

    let hour_start = instant
        - Duration::minutes(i64::from(minute))
        - Duration::seconds(i64::from(instant.second()))
        - Duration::nanoseconds(i64::from(instant.nanosecond()));

    if minute < SLOT_MINUTES as u32 {
        hour_start + calendar::slot_length()
    } else {
        hour_start + Duration::hours(1)
    }
}

/// Free slots of `[window_start, window_end]` given the trainer's `bookings`,
/// in chronological order.
pub fn free_slots(
    bookings: &[Appointment],
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Vec<TimeSlot> {
    let mut available = Vec::new();
    let mut slot_start = round_up_to_next_slot(window_start);

    while slot_start + calendar::slot_length() <= window_end {
        let slot = TimeSlot {
            start_time: slot_start,
            end_time: slot_start + calendar::slot_length(),
            available: true,
        };

        if calendar::starts_in_business_hours(slot.start_time)
            && !bookings.iter().any(|booking| slot.overlaps(booking))
        {
            available.push(slot.clone());
        }

        slot_start = slot.end_time;
    }

    available
}
