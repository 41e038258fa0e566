//! Availability endpoints.
//!
//! - `PUT /api/availability`: replace the calling doctor's rolling window
//! - `GET /api/doctors/:id/slots`: slots in a doctor's rolling window

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{parse_id, today, ApiContext};
use crate::booking::BookingError;
use crate::models::enums::ActorRole;
use crate::models::{Actor, Slot, SlotSelection};
use crate::slots::{self, AvailabilityWindow};

#[derive(Deserialize)]
pub struct ReplaceRequest {
    pub selections: Vec<SlotSelection>,
}

#[derive(Serialize)]
pub struct SlotsResponse {
    pub window: AvailabilityWindow,
    pub slots: Vec<Slot>,
}

/// `PUT /api/availability`: doctors only.
pub async fn replace(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
    Json(body): Json<ReplaceRequest>,
) -> Result<Json<SlotsResponse>, ApiError> {
    if actor.role != ActorRole::Doctor {
        return Err(BookingError::RoleNotPermitted {
            role: actor.role,
            operation: "declare availability",
        }
        .into());
    }

    let conn = ctx.core.open_db()?;
    let window = AvailabilityWindow::rolling(today());
    let slots = slots::replace_window(&conn, &actor.id, &window, &body.selections)?;

    Ok(Json(SlotsResponse { window, slots }))
}

#[derive(Deserialize)]
pub struct SlotsQuery {
    #[serde(default = "default_open_only")]
    pub open_only: bool,
}

fn default_open_only() -> bool {
    true
}

/// `GET /api/doctors/:id/slots?open_only=`: open slots unless
/// `open_only=false`.
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(_actor): Extension<Actor>,
    Path(doctor_id): Path<String>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<SlotsResponse>, ApiError> {
    let doctor_id = parse_id(&doctor_id, "doctor")?;
    let conn = ctx.core.open_db()?;
    let window = AvailabilityWindow::rolling(today());

    let slots = if query.open_only {
        slots::list_open(&conn, &doctor_id, &window)?
    } else {
        slots::list_all(&conn, &doctor_id, &window)?
    };

    Ok(Json(SlotsResponse { window, slots }))
}
