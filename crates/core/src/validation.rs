//! Validation rules for candidate appointments.
//!
//! A rule is a plain function over an [`Appointment`]. Callers assemble the
//! rule set that fits their context and [`Appointment::validate`] runs it in
//! order, stopping at the first failure.

use chrono::Duration;

use crate::{
    calendar::{self, CLOSING_HOUR, OPENING_HOUR},
    errors::{BookingError, BookingResult},
    models::appointment::Appointment,
};

pub type ValidationRule = fn(&Appointment) -> BookingResult<()>;

/// Rules applied to every appointment created through the booking engine.
pub const DEFAULT_VALIDATION_RULES: &[ValidationRule] =
    &[must_be_thirty_minutes, must_be_during_business_hours];

/// Fails unless the appointment lasts exactly one slot.
pub fn must_be_thirty_minutes(appointment: &Appointment) -> BookingResult<()> {
    let duration = appointment.end_time - appointment.start_time;
    if duration != calendar::slot_length() {
        return Err(BookingError::Validation(format!(
            "appointment must be exactly {} minutes, got {}",
            calendar::SLOT_MINUTES,
            describe(duration)
        )));
    }
    Ok(())
}

/// Fails if the start or end lies before opening or after closing on the
/// local day of the start time. Both checks are "strictly before / strictly
/// after", so an appointment ending exactly at closing is accepted.
pub fn must_be_during_business_hours(appointment: &Appointment) -> BookingResult<()> {
    let (opens, closes) = calendar::business_window(appointment.start_time)?;

    if appointment.start_time < opens || appointment.start_time > closes {
        return Err(BookingError::Validation(format!(
            "appointment must start between {OPENING_HOUR}:00 and {CLOSING_HOUR}:00 {}",
            calendar::BUSINESS_TZ.name()
        )));
    }

    if appointment.end_time < opens || appointment.end_time > closes {
        return Err(BookingError::Validation(format!(
            "appointment must end between {OPENING_HOUR}:00 and {CLOSING_HOUR}:00 {}",
            calendar::BUSINESS_TZ.name()
        )));
    }

    Ok(())
}

impl Appointment {
    /// Runs `rules` in order and returns the first failure. An empty rule set always passes.
    pub fn validate(&self, rules: &[ValidationRule]) -> BookingResult<()> {
        rules.iter().try_for_each(|rule| rule(self))
    }
}

fn describe(duration: Duration) -> String {
    let seconds = duration.num_seconds();
    let (sign, seconds) = if seconds < 0 { ("-", -seconds) } else { ("", seconds) };
    match (seconds / 60, seconds % 60) {
        (minutes, 0) => format!("{sign}{minutes}m"),
        (minutes, rest) => format!("{sign}{minutes}m{rest}s"),
    }
}
