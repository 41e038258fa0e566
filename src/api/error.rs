//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::booking::BookingError;
use crate::core_state::CoreError;
use crate::db::DatabaseError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Actor identity required")]
    Unauthorized,
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Internal error: {0}")]
    Internal(String),
    #[error(transparent)]
    Booking(#[from] BookingError),
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "AUTH_REQUIRED",
                "Actor identity required".to_string(),
            ),
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail.clone())
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
            ApiError::Booking(err) => booking_parts(err),
        }
    }
}

fn booking_parts(err: &BookingError) -> (StatusCode, &'static str, String) {
    let (status, code) = match err {
        BookingError::SlotUnavailable => (StatusCode::CONFLICT, "SLOT_UNAVAILABLE"),
        BookingError::DuplicateBooking => (StatusCode::CONFLICT, "DUPLICATE_BOOKING"),
        BookingError::InvalidTransition { .. } => (StatusCode::CONFLICT, "INVALID_TRANSITION"),
        BookingError::AppointmentNotFound(_) => (StatusCode::NOT_FOUND, "APPOINTMENT_NOT_FOUND"),
        BookingError::SlotNotFound(_) => (StatusCode::NOT_FOUND, "SLOT_NOT_FOUND"),
        BookingError::TreatmentRecordNotFound(_) => {
            (StatusCode::NOT_FOUND, "TREATMENT_RECORD_NOT_FOUND")
        }
        BookingError::RoleNotPermitted { .. } => (StatusCode::FORBIDDEN, "ROLE_NOT_PERMITTED"),
        BookingError::PersistenceFailure(e) => {
            tracing::error!(error = %e, "Persistence failure");
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                "PERSISTENCE_FAILURE",
                "The booking store is unavailable, try again".to_string(),
            );
        }
    };
    (status, code, err.to_string())
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Database(e) => ApiError::Booking(BookingError::PersistenceFailure(e)),
            CoreError::Io(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        ApiError::Booking(BookingError::PersistenceFailure(err))
    }
}
