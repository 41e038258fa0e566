//! Actor resolution middleware.
//!
//! The upstream session layer authenticates the caller and forwards the
//! result as `X-Actor-Id`, `X-Actor-Role` and `X-Actor-Name`. These headers
//! are trusted; this layer only checks they are present and well formed,
//! then injects `Actor` into request extensions for downstream handlers.

use axum::http::{HeaderMap, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::models::enums::ActorRole;
use crate::models::Actor;

pub const ACTOR_ID_HEADER: &str = "X-Actor-Id";
pub const ACTOR_ROLE_HEADER: &str = "X-Actor-Role";
pub const ACTOR_NAME_HEADER: &str = "X-Actor-Name";

/// Reject requests without a resolvable actor.
pub async fn require_actor(mut req: Request<axum::body::Body>, next: Next) -> Response {
    match actor_from_headers(req.headers()) {
        Ok(actor) => {
            tracing::debug!(
                actor_id = %actor.id,
                role = %actor.role,
                path = %req.uri().path(),
                "Actor resolved"
            );
            req.extensions_mut().insert(actor);
            next.run(req).await
        }
        Err(err) => {
            tracing::warn!(path = %req.uri().path(), "Request without actor identity");
            err.into_response()
        }
    }
}

pub fn actor_from_headers(headers: &HeaderMap) -> Result<Actor, ApiError> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or(ApiError::Unauthorized)
    };

    let id = Uuid::parse_str(header(ACTOR_ID_HEADER)?).map_err(|_| ApiError::Unauthorized)?;
    let role: ActorRole = header(ACTOR_ROLE_HEADER)?
        .parse()
        .map_err(|_| ApiError::Unauthorized)?;
    let name = header(ACTOR_NAME_HEADER)?;

    Ok(Actor::new(id, role, name))
}
