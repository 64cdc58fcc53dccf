use tracing::warn;

use backend_domain::StartAck;

use crate::{AppError, AppState};

/// Starts a sync when `presented_token` matches the configured API token;
/// with no token configured every caller is allowed.
pub async fn start_sync(
    state: &AppState,
    presented_token: Option<&str>,
) -> Result<StartAck, AppError> {
    if let Some(expected) = state.config.api_token.as_deref() {
        if presented_token != Some(expected) {
            warn!("sync start rejected: missing or invalid token");
            return Err(AppError::Unauthorized);
        }
    }
    state.controller.start().await.map_err(|err| {
        warn!("sync start rejected: {}", err);
        err
    })
}
