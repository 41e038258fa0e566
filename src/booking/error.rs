//! Booking outcomes the caller has to handle.
//!
//! Every variant is recoverable at the request boundary. Only
//! `PersistenceFailure` is worth retrying; the rest will fail the same way
//! on a verbatim retry.

use thiserror::Error;
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::enums::{ActorRole, AppointmentStatus};

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Slot is no longer available")]
    SlotUnavailable,

    #[error("An active booking already exists for this doctor, day and slot")]
    DuplicateBooking,

    #[error("Appointment is already {from}")]
    InvalidTransition { from: AppointmentStatus },

    #[error("Appointment not found: {0}")]
    AppointmentNotFound(Uuid),

    #[error("Slot not found: {0}")]
    SlotNotFound(Uuid),

    #[error("No treatment record for appointment {0}")]
    TreatmentRecordNotFound(Uuid),

    #[error("The {role} role may not {operation}")]
    RoleNotPermitted {
        role: ActorRole,
        operation: &'static str,
    },

    #[error("Persistence failure: {0}")]
    PersistenceFailure(#[from] DatabaseError),
}

impl BookingError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, BookingError::PersistenceFailure(_))
    }
}

impl From<rusqlite::Error> for BookingError {
    fn from(err: rusqlite::Error) -> Self {
        BookingError::PersistenceFailure(DatabaseError::Sqlite(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_persistence_failures_are_retryable() {
        let busy = BookingError::from(rusqlite::Error::QueryReturnedNoRows);
        assert!(busy.is_retryable());
        assert!(!BookingError::SlotUnavailable.is_retryable());
        assert!(!BookingError::InvalidTransition {
            from: AppointmentStatus::Cancelled
        }
        .is_retryable());
    }

    #[test]
    fn messages_name_the_failed_precondition() {
        let err = BookingError::InvalidTransition {
            from: AppointmentStatus::Completed,
        };
        assert_eq!(err.to_string(), "Appointment is already completed");

        let err = BookingError::RoleNotPermitted {
            role: ActorRole::Admin,
            operation: "book appointments",
        };
        assert_eq!(err.to_string(), "The admin role may not book appointments");
    }
}
