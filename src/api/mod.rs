//! JSON HTTP API over the booking engine.
//!
//! Routes are nested under `/api/`. Every route except `/api/health` runs
//! behind the actor middleware, which resolves the caller from headers set
//! by the upstream session layer.
//!
//! The router is composable: `api_router()` returns a `Router` that can be
//! mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{start_api_server, ApiServer};
pub use types::ApiContext;
