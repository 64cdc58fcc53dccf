// Health report entity

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::entities::DiskSpace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthChecks {
    pub rsync_available: bool,
    pub source_directory: bool,
    pub destination_directory: bool,
    pub disk_space: DiskSpace,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub timestamp: DateTime<Local>,
    pub checks: HealthChecks,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl HealthReport {
    /// A missing tool outranks a missing source.
    pub fn from_checks(checks: HealthChecks) -> Self {
        let (status, error, warning) = if !checks.rsync_available {
            (
                HealthStatus::Unhealthy,
                Some("rsync not installed".to_string()),
                None,
            )
        } else if !checks.source_directory {
            (
                HealthStatus::Degraded,
                None,
                Some("source directory not found".to_string()),
            )
        } else {
            (HealthStatus::Healthy, None, None)
        };
        Self {
            status,
            timestamp: Local::now(),
            checks,
            error,
            warning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checks(rsync_available: bool, source_directory: bool) -> HealthChecks {
        HealthChecks {
            rsync_available,
            source_directory,
            destination_directory: true,
            disk_space: DiskSpace::default(),
        }
    }

    #[test]
    fn missing_tool_is_unhealthy_even_without_source() {
        let report = HealthReport::from_checks(checks(false, false));
        assert_eq!(report.status, HealthStatus::Unhealthy);
        assert_eq!(report.error.as_deref(), Some("rsync not installed"));
        assert!(report.warning.is_none());
    }

    #[test]
    fn missing_source_degrades() {
        let report = HealthReport::from_checks(checks(true, false));
        assert_eq!(report.status, HealthStatus::Degraded);
        assert_eq!(report.warning.as_deref(), Some("source directory not found"));
    }

    #[test]
    fn healthy_report_omits_error_fields() {
        let report = HealthReport::from_checks(checks(true, true));
        let json = serde_json::to_value(&report).expect("serialize");
        assert_eq!(json["status"], "healthy");
        assert!(json.get("error").is_none());
        assert!(json.get("warning").is_none());
    }
}
