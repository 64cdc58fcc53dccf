use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value};

use backend_application::queries::health_queries;
use backend_application::AppState;
use backend_domain::HealthReport;

pub const SERVICE_NAME: &str = "Delta Migration API";

pub async fn root_info() -> Json<Value> {
    Json(json!({
        "message": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "/sync": "POST - Trigger sync",
            "/status": "GET - Check status",
            "/health": "GET - Health check",
            "/health/live": "GET - Liveness probe",
            "/metrics/prometheus": "GET - Prometheus counters",
        }
    }))
}

/// Always answers 200; the verdict lives in the body.
pub async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    Json(health_queries::get_health(&state).await)
}

pub async fn health_live() -> StatusCode {
    StatusCode::OK
}

pub async fn metrics_prometheus(State(state): State<AppState>) -> impl IntoResponse {
    let payload = state.metrics.render_prometheus();
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; version=0.0.4; charset=utf-8"),
    );
    (headers, payload)
}
