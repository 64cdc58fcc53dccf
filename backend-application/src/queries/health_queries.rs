use backend_domain::{HealthChecks, HealthReport};

use crate::AppState;

pub async fn get_health(state: &AppState) -> HealthReport {
    let service = &state.health_service;
    let checks = HealthChecks {
        rsync_available: service.check_tool(),
        source_directory: service.check_source().await,
        destination_directory: service.check_destination().await,
        disk_space: service.disk_space().await,
    };
    HealthReport::from_checks(checks)
}
