use std::sync::atomic::{AtomicU64, Ordering};

use backend_domain::{JobResult, JobStatus};

#[derive(Debug, Default)]
pub struct Metrics {
    sync_started: AtomicU64,
    sync_rejected: AtomicU64,
    sync_success: AtomicU64,
    sync_warning: AtomicU64,
    sync_failed: AtomicU64,
    items_transferred: AtomicU64,
}

impl Metrics {
    pub fn record_started(&self) {
        self.sync_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected(&self) {
        self.sync_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_result(&self, result: &JobResult) {
        let counter = match result.status {
            JobStatus::Success => &self.sync_success,
            JobStatus::Warning => &self.sync_warning,
            JobStatus::Failed => &self.sync_failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        self.items_transferred
            .fetch_add(result.items_transferred, Ordering::Relaxed);
    }

    pub fn render_prometheus(&self) -> String {
        let started = self.sync_started.load(Ordering::Relaxed);
        let rejected = self.sync_rejected.load(Ordering::Relaxed);
        let success = self.sync_success.load(Ordering::Relaxed);
        let warning = self.sync_warning.load(Ordering::Relaxed);
        let failed = self.sync_failed.load(Ordering::Relaxed);
        let transferred = self.items_transferred.load(Ordering::Relaxed);

        format!(
            "# TYPE delta_sync_started_total counter\n\
delta_sync_started_total {}\n\
# TYPE delta_sync_rejected_total counter\n\
delta_sync_rejected_total {}\n\
# TYPE delta_sync_success_total counter\n\
delta_sync_success_total {}\n\
# TYPE delta_sync_warning_total counter\n\
delta_sync_warning_total {}\n\
# TYPE delta_sync_failed_total counter\n\
delta_sync_failed_total {}\n\
# TYPE delta_sync_items_transferred_total counter\n\
delta_sync_items_transferred_total {}\n",
            started, rejected, success, warning, failed, transferred
        )
    }
}
