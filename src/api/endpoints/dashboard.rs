//! Dashboard endpoint.

use axum::extract::State;
use axum::{Extension, Json};

use crate::api::error::ApiError;
use crate::api::types::{today, ApiContext};
use crate::dashboard::{self, Dashboard};
use crate::models::Actor;

/// `GET /api/dashboard`: doctor or patient view, by the caller's role.
pub async fn load(
    State(ctx): State<ApiContext>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Dashboard>, ApiError> {
    let conn = ctx.core.open_db()?;
    Ok(Json(dashboard::load(&conn, &actor, today())?))
}
