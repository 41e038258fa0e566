//! Shared types for the API layer.

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::core_state::CoreState;

/// Shared context for all API routes.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self { core }
    }
}

/// Parse an id taken from the request path.
pub fn parse_id(raw: &str, what: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("Invalid {what} id")))
}

/// The clinic's calendar day, used to anchor windows and dashboards.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_accepts_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string(), "slot").unwrap(), id);
    }

    #[test]
    fn parse_id_rejects_garbage() {
        let err = parse_id("not-a-uuid", "slot").unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(msg) if msg == "Invalid slot id"));
    }
}
