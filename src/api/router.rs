//! API router.
//!
//! Returns a composable `Router` with every route under `/api/`.
//! Protected routes resolve the caller through `middleware::actor`;
//! `/api/health` is open so load balancers can poll it.

use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the API router.
pub fn api_router(core: Arc<CoreState>) -> Router {
    let ctx = ApiContext::new(core);

    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let protected = Router::new()
        .route("/availability", put(endpoints::availability::replace))
        .route("/doctors/:id/slots", get(endpoints::availability::list))
        .route("/appointments", post(endpoints::appointments::book))
        .route("/appointments/:id", get(endpoints::appointments::detail))
        .route(
            "/appointments/:id/cancel",
            post(endpoints::appointments::cancel),
        )
        .route(
            "/appointments/:id/complete",
            post(endpoints::appointments::complete),
        )
        .route(
            "/appointments/:id/treatment",
            put(endpoints::treatment::save).patch(endpoints::treatment::amend),
        )
        .route(
            "/appointments/:id/timeline",
            get(endpoints::timeline::for_appointment),
        )
        .route("/dashboard", get(endpoints::dashboard::load))
        .route(
            "/patients/:id/history",
            get(endpoints::history::treatment_history),
        )
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::actor::require_actor));

    let open = Router::new()
        .route("/health", get(endpoints::health::check))
        .with_state(ctx);

    Router::new()
        .nest("/api", open.merge(protected))
        .layer(TraceLayer::new_for_http())
}
