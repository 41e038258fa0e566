//! Patient treatment history endpoint.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::{parse_id, ApiContext};
use crate::dashboard;
use crate::models::{Actor, TreatmentHistoryEntry};

#[derive(Serialize)]
pub struct HistoryResponse {
    pub entries: Vec<TreatmentHistoryEntry>,
}

/// `GET /api/patients/:id/history`
pub async fn treatment_history(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
    Path(patient_id): Path<String>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let patient_id = parse_id(&patient_id, "patient")?;
    let conn = ctx.core.open_db()?;
    let entries = dashboard::treatment_history(&conn, &actor, &patient_id)?;
    Ok(Json(HistoryResponse { entries }))
}
