//! The shared record of the current sync job.
//!
//! Every read and write goes through one mutex, so a reader never observes
//! `is_running` and `progress` out of step with each other.

use tokio::sync::{Mutex, MutexGuard};

use backend_domain::{JobId, JobProgress, JobResult, SyncSnapshot};

#[derive(Debug, Default)]
pub struct JobState {
    inner: Mutex<SyncSnapshot>,
}

impl JobState {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> SyncSnapshot {
        self.inner.lock().await.clone()
    }

    pub async fn is_running(&self) -> bool {
        self.inner.lock().await.is_running
    }

    /// Holds the lock for a check-then-claim sequence.
    pub async fn lock(&self) -> JobStateGuard<'_> {
        JobStateGuard {
            guard: self.inner.lock().await,
        }
    }

    /// Marks the job running with fresh progress against `items_total`.
    pub async fn begin(&self, job_id: JobId, items_total: u64) {
        let mut state = self.inner.lock().await;
        state.is_running = true;
        state.progress = Some(JobProgress::new(job_id, items_total));
    }

    pub async fn record_item(&self, item: &str) {
        let mut state = self.inner.lock().await;
        if let Some(progress) = state.progress.as_mut() {
            progress.record_item(item);
        }
    }

    /// Returns to idle: clears progress and publishes the terminal result.
    pub async fn finish(&self, result: JobResult) {
        let mut state = self.inner.lock().await;
        state.is_running = false;
        state.progress = None;
        state.last_result = Some(result);
    }
}

pub struct JobStateGuard<'a> {
    guard: MutexGuard<'a, SyncSnapshot>,
}

impl JobStateGuard<'_> {
    pub fn is_running(&self) -> bool {
        self.guard.is_running
    }

    /// The file count is not known yet, so the claimed progress starts at 0 of 0.
    pub fn claim(&mut self, job_id: JobId) {
        self.guard.is_running = true;
        self.guard.progress = Some(JobProgress::new(job_id, 0));
    }
}
