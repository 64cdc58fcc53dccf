use chrono::Local;

use backend_domain::LocationStatus;

use crate::dtos::StatusReport;
use crate::AppState;

/// Read-only view of the job record plus point-in-time directory figures.
pub async fn get_status(state: &AppState) -> StatusReport {
    let source = state.storage.directory_stats(&state.config.source_dir).await;
    let destination = state
        .storage
        .directory_stats(&state.config.destination_dir)
        .await;
    let disk_space = state
        .storage
        .disk_space(&state.config.destination_dir)
        .await;
    let sync = state.job_state.snapshot().await;

    StatusReport {
        source: LocationStatus {
            path: state.config.source_path(),
            stats: source,
        },
        destination: LocationStatus {
            path: state.config.destination_path(),
            stats: destination,
        },
        sync,
        disk_space,
        rsync_available: state.sync_tool.is_available(),
        timestamp: Local::now(),
    }
}
