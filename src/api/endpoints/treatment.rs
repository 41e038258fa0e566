//! Treatment record endpoints.
//!
//! `PUT` saves the note and completes a booked visit; `PATCH` edits an
//! existing note only.

use axum::extract::{Path, State};
use axum::{Extension, Json};

use crate::api::error::ApiError;
use crate::api::types::{parse_id, ApiContext};
use crate::booking::{self, TreatmentOutcome};
use crate::models::{Actor, TreatmentFields, TreatmentRecord};

/// `PUT /api/appointments/:id/treatment`
pub async fn save(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    Json(fields): Json<TreatmentFields>,
) -> Result<Json<TreatmentOutcome>, ApiError> {
    let id = parse_id(&id, "appointment")?;
    let conn = ctx.core.open_db()?;
    Ok(Json(booking::save_treatment(&conn, &actor, &id, &fields)?))
}

/// `PATCH /api/appointments/:id/treatment`
pub async fn amend(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    Json(fields): Json<TreatmentFields>,
) -> Result<Json<TreatmentRecord>, ApiError> {
    let id = parse_id(&id, "appointment")?;
    let conn = ctx.core.open_db()?;
    Ok(Json(booking::amend_treatment(&conn, &actor, &id, &fields)?))
}
