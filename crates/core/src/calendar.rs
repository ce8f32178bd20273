//! Business calendar shared by validation and slot generation.
//!
//! All business-hour decisions are made in a single fixed zone. Arithmetic on
//! instants stays in UTC; values are only converted to local time to read the
//! wall clock.

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use crate::errors::{BookingError, BookingResult};

/// The zone business hours are defined in.
pub const BUSINESS_TZ: Tz = chrono_tz::America::Los_Angeles;

/// Local hour business opens.
pub const OPENING_HOUR: u32 = 8;

/// Local hour business closes.
pub const CLOSING_HOUR: u32 = 17;

/// Length of every appointment and every availability slot, in minutes.
pub const SLOT_MINUTES: i64 = 30;

pub fn slot_length() -> Duration {
    Duration::minutes(SLOT_MINUTES)
}

/// Opening and closing instants for the local calendar day `instant` falls on.
pub fn business_window(instant: DateTime<Utc>) -> BookingResult<(DateTime<Tz>, DateTime<Tz>)> {
    let day = instant.with_timezone(&BUSINESS_TZ).date_naive();
    Ok((
        local_instant(day.and_time(hour(OPENING_HOUR)?))?,
        local_instant(day.and_time(hour(CLOSING_HOUR)?))?,
    ))
}

/// Whether a slot beginning at `instant` starts on a local hour in
/// `[OPENING_HOUR, CLOSING_HOUR)`.
pub fn starts_in_business_hours(instant: DateTime<Utc>) -> bool {
    let local_hour = instant.with_timezone(&BUSINESS_TZ).hour();
    (OPENING_HOUR..CLOSING_HOUR).contains(&local_hour)
}

fn hour(h: u32) -> BookingResult<NaiveTime> {
    NaiveTime::from_hms_opt(h, 0, 0)
        .ok_or_else(|| BookingError::Internal(format!("invalid business hour {h}").into()))
}

fn local_instant(naive: chrono::NaiveDateTime) -> BookingResult<DateTime<Tz>> {
    BUSINESS_TZ.from_local_datetime(&naive).earliest().ok_or_else(|| {
        BookingError::Internal(format!("{naive} does not exist in {}", BUSINESS_TZ.name()).into())
    })
}
