use axum::routing::{get, post};
use axum::Router;

use backend_application::AppState;

use crate::handlers::{ops_handlers, sync_handlers};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(ops_handlers::root_info))
        .route("/sync", post(sync_handlers::start_sync))
        .route("/status", get(sync_handlers::get_status))
        .route("/health", get(ops_handlers::health))
        .route("/health/live", get(ops_handlers::health_live))
        .route(
            "/metrics/prometheus",
            get(ops_handlers::metrics_prometheus),
        )
        .with_state(state)
}
