use chrono::{DateTime, Local};
use serde::Serialize;

use backend_domain::{DiskSpace, LocationStatus, SyncSnapshot};

#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub source: LocationStatus,
    pub destination: LocationStatus,
    pub sync: SyncSnapshot,
    pub disk_space: DiskSpace,
    pub rsync_available: bool,
    pub timestamp: DateTime<Local>,
}
