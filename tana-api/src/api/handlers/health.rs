use crate::AppState;
use axum::{extract::State, http::StatusCode};
use tracing::warn;

/// Liveness plus a round-trip to the store.
#[utoipa::path(
    get,
    path = "/healthz",
    tag = "health",
    summary = "Health check",
    responses(
        (status = 200, description = "Service and store are reachable", body = String),
        (status = 503, description = "Store is unreachable", body = String),
    )
)]
pub async fn healthz(State(state): State<AppState>) -> (StatusCode, &'static str) {
    match state.store.ping().await {
        Ok(()) => (StatusCode::OK, "OK"),
        Err(e) => {
            warn!("Health check failed: {:#}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "Store unavailable")
        }
    }
}
