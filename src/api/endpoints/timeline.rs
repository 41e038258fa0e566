//! Timeline endpoint.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::{parse_id, ApiContext};
use crate::booking;
use crate::models::{Actor, TimelineEvent};
use crate::timeline;

#[derive(Serialize)]
pub struct TimelineResponse {
    pub events: Vec<TimelineEvent>,
}

/// `GET /api/appointments/:id/timeline`: oldest event first.
pub async fn for_appointment(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<TimelineResponse>, ApiError> {
    let id = parse_id(&id, "appointment")?;
    let conn = ctx.core.open_db()?;

    // Visibility check; strangers get the same 404 as a missing id.
    let appointment = booking::get_appointment(&conn, &actor, &id)?;
    let events = timeline::for_appointment(&conn, &appointment.id)?;

    Ok(Json(TimelineResponse { events }))
}
