//! Appointment endpoints.
//!
//! - `POST /api/appointments`: book a slot
//! - `GET /api/appointments/:id`: appointment detail
//! - `POST /api/appointments/:id/cancel`
//! - `POST /api/appointments/:id/complete`

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{parse_id, ApiContext};
use crate::booking;
use crate::models::{Actor, Appointment};

#[derive(Deserialize)]
pub struct BookRequest {
    pub slot_id: Uuid,
    #[serde(default)]
    pub reason: Option<String>,
}

/// `POST /api/appointments`: patients only.
pub async fn book(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
    Json(body): Json<BookRequest>,
) -> Result<(StatusCode, Json<Appointment>), ApiError> {
    let conn = ctx.core.open_db()?;
    let appointment = booking::book(&conn, &actor, &body.slot_id, body.reason.as_deref())?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

/// `GET /api/appointments/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<Appointment>, ApiError> {
    let id = parse_id(&id, "appointment")?;
    let conn = ctx.core.open_db()?;
    Ok(Json(booking::get_appointment(&conn, &actor, &id)?))
}

/// `POST /api/appointments/:id/cancel`
pub async fn cancel(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<Appointment>, ApiError> {
    let id = parse_id(&id, "appointment")?;
    let conn = ctx.core.open_db()?;
    Ok(Json(booking::cancel(&conn, &actor, &id)?))
}

/// `POST /api/appointments/:id/complete`
pub async fn complete(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<Appointment>, ApiError> {
    let id = parse_id(&id, "appointment")?;
    let conn = ctx.core.open_db()?;
    Ok(Json(booking::complete(&conn, &actor, &id)?))
}
