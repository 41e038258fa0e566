//! API endpoint handlers.
//!
//! Each handler opens its own connection, calls into the booking core and
//! maps the result to JSON.

pub mod appointments;
pub mod availability;
pub mod dashboard;
pub mod health;
pub mod history;
pub mod timeline;
pub mod treatment;
