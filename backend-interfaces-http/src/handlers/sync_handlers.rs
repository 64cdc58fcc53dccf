use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use backend_application::commands::sync_commands;
use backend_application::dtos::StatusReport;
use backend_application::queries::status_queries;
use backend_application::AppState;
use backend_domain::StartAck;

use crate::error::HttpError;
use crate::middleware::extract_bearer;

pub async fn start_sync(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<StartAck>, HttpError> {
    let token = extract_bearer(&headers);
    let ack = sync_commands::start_sync(&state, token.as_deref()).await?;
    Ok(Json(ack))
}

pub async fn get_status(State(state): State<AppState>) -> Json<StatusReport> {
    Json(status_queries::get_status(&state).await)
}
