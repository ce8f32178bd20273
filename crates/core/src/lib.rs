//! # Appointments Core
//!
//! Domain layer of the appointment service: the data model, the validation
//! rules, the persistence port and the booking and availability engine.
//! Nothing in here knows about HTTP or about a concrete storage backend.

pub mod availability;
pub mod booking;
pub mod calendar;
pub mod errors;
pub mod mock;
pub mod models;
pub mod repository;
pub mod validation;
