// ============================================================
// Layer 1b — HTTP Boundary (warp)
// ============================================================
// Exposes the PredictionService over HTTP:
//
//   POST /predict  — one FeatureRecord in, one species out
//   GET  /health   — liveness plus whether a model is loaded
//
// The service is loaded before the listener binds and is never
// mutated afterwards.

pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::application::predict_use_case::PredictionService;

/// Where to find the artifact and where to listen.
#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub artifact_path: String,
    pub addr:          SocketAddr,
}

/// Serve until the process receives Ctrl-C.
pub async fn serve(service: Arc<PredictionService>, addr: SocketAddr) {
    let health = service.health();
    tracing::info!(
        "Listening on http://{} (model loaded: {})",
        addr,
        health.model_loaded
    );

    let (_, server) = warp::serve(routes::routes(service)).bind_with_graceful_shutdown(addr, async {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutting down");
        }
    });
    server.await;
}
