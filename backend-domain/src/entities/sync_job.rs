// Sync job entities: in-flight progress, terminal result, shared snapshot

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::services::progress_parser::{running_percentage, Outcome};
use crate::utils::truncate_chars;
use crate::value_objects::{JobId, JobStatus};

/// Longest item name kept in `current_item`.
pub const MAX_ITEM_CHARS: usize = 100;

pub const EMPTY_SOURCE_MESSAGE: &str = "Source is empty - nothing to sync";
pub const EMPTY_SOURCE_WARNING: &str = "Source directory is empty";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProgressPhase {
    #[default]
    Running,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobProgress {
    pub job_id: JobId,
    pub status: ProgressPhase,
    pub started_at: DateTime<Local>,
    #[serde(rename = "current_file")]
    pub current_item: Option<String>,
    #[serde(rename = "files_completed")]
    pub items_completed: u64,
    /// Source file count taken once at start; not refreshed mid-run.
    #[serde(rename = "total_files")]
    pub items_total: u64,
    pub percentage: u8,
}

impl JobProgress {
    pub fn new(job_id: JobId, items_total: u64) -> Self {
        Self {
            job_id,
            status: ProgressPhase::Running,
            started_at: Local::now(),
            current_item: None,
            items_completed: 0,
            items_total,
            percentage: 0,
        }
    }

    pub fn record_item(&mut self, item: &str) {
        self.items_completed = self.items_completed.saturating_add(1);
        self.current_item = Some(truncate_chars(item, MAX_ITEM_CHARS));
        self.percentage = running_percentage(self.items_completed, self.items_total);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobResult {
    pub job_id: JobId,
    pub status: JobStatus,
    pub message: String,
    pub timestamp: DateTime<Local>,
    #[serde(rename = "files_transferred")]
    pub items_transferred: u64,
    pub warnings: Option<Vec<String>>,
}

impl JobResult {
    pub fn completed(job_id: JobId, outcome: Outcome, items_transferred: u64) -> Self {
        let warnings = if outcome.warnings.is_empty() {
            None
        } else {
            Some(outcome.warnings)
        };
        Self {
            job_id,
            status: outcome.status,
            message: outcome.message,
            timestamp: Local::now(),
            items_transferred,
            warnings,
        }
    }

    pub fn failed(job_id: JobId, message: impl Into<String>) -> Self {
        Self {
            job_id,
            status: JobStatus::Failed,
            message: message.into(),
            timestamp: Local::now(),
            items_transferred: 0,
            warnings: None,
        }
    }

    pub fn empty_source(job_id: JobId) -> Self {
        Self {
            job_id,
            status: JobStatus::Success,
            message: EMPTY_SOURCE_MESSAGE.to_string(),
            timestamp: Local::now(),
            items_transferred: 0,
            warnings: Some(vec![EMPTY_SOURCE_WARNING.to_string()]),
        }
    }
}

/// Consistent copy of the shared job record handed to readers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SyncSnapshot {
    pub is_running: bool,
    pub progress: Option<JobProgress>,
    #[serde(rename = "last_sync")]
    pub last_result: Option<JobResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartAck {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Local>,
    pub source_path: String,
    pub destination_path: String,
    pub job_id: JobId,
}

impl StartAck {
    pub fn started(job_id: JobId, source_path: String, destination_path: String) -> Self {
        Self {
            status: "started".to_string(),
            message: "Sync started in background".to_string(),
            timestamp: Local::now(),
            source_path,
            destination_path,
            job_id,
        }
    }
}
