//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// `GET /api/health`: liveness plus a database round trip.
pub async fn check(State(ctx): State<ApiContext>) -> Result<Json<HealthResponse>, ApiError> {
    let conn = ctx.core.open_db()?;
    conn.query_row("SELECT 1", [], |_| Ok(()))
        .map_err(crate::db::DatabaseError::from)?;

    Ok(Json(HealthResponse {
        status: "ok",
        version: crate::config::APP_VERSION,
    }))
}
