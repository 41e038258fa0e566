//! API server lifecycle: starts/stops the axum HTTP server.
//!
//! bind → spawn background task → return handle with shutdown channel.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::api::router::api_router;
use crate::core_state::CoreState;

// ═══════════════════════════════════════════════════════════
// Public types
// ═══════════════════════════════════════════════════════════

/// Handle to a running API server.
pub struct ApiServer {
    pub addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl ApiServer {
    /// Send the shutdown signal without waiting for in-flight requests.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("API server shutdown signal sent");
        }
    }

    /// Shut down and wait for in-flight requests to drain.
    pub async fn stop(mut self) {
        self.shutdown();
        if let Err(e) = self.task.await {
            tracing::error!("API server task failed: {e}");
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Server lifecycle
// ═══════════════════════════════════════════════════════════

/// Bind `addr` (port 0 picks an ephemeral port), build the router and
/// spawn the axum server in a background tokio task.
pub async fn start_api_server(
    core: Arc<CoreState>,
    addr: SocketAddr,
) -> Result<ApiServer, String> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind API server on {addr}: {e}"))?;

    let addr = listener
        .local_addr()
        .map_err(|e| format!("Failed to get server address: {e}"))?;

    let app = api_router(core);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("API server received shutdown signal");
        };

        tracing::info!(%addr, "API server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("API server error: {e}");
        }

        tracing::info!("API server stopped");
    });

    Ok(ApiServer {
        addr,
        shutdown_tx: Some(shutdown_tx),
        task,
    })
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
