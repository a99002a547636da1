use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use presenza_core::health::{healthz, readyz};
use presenza_core::middleware::request_id_layer;

use crate::handlers::{
    heartbeat::ingest_heartbeat,
    session::{check_in, manual_checkout, session_state},
    sweep::run_expiry_sweep,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Sessions
        .route("/attendance/sessions", post(check_in))
        .route("/attendance/sessions/{session_id}", get(session_state))
        .route(
            "/attendance/sessions/{session_id}/checkout",
            post(manual_checkout),
        )
        // Heartbeats
        .route("/attendance/heartbeat", post(ingest_heartbeat))
        // Reconciliation
        .route("/attendance/sweep", post(run_expiry_sweep))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
