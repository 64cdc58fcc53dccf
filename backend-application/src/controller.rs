//! Orchestrates one sync run end to end.

use std::io::ErrorKind;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::{FutureExt, StreamExt};
use tracing::{error, info, warn};

use backend_domain::{
    classify_line, classify_outcome, extract_transferred_count, JobError, JobId, JobResult,
    LineKind, RuntimeConfig, StartAck, StorageInspector, SyncTool,
};

use crate::{AppError, JobState, Metrics};

#[derive(Clone)]
pub struct SyncJobController {
    config: RuntimeConfig,
    tool: Arc<dyn SyncTool>,
    storage: Arc<dyn StorageInspector>,
    job_state: Arc<JobState>,
    metrics: Arc<Metrics>,
}

impl SyncJobController {
    pub fn new(
        config: RuntimeConfig,
        tool: Arc<dyn SyncTool>,
        storage: Arc<dyn StorageInspector>,
        job_state: Arc<JobState>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            config,
            tool,
            storage,
            job_state,
            metrics,
        }
    }

    /// Claims the single job slot and schedules the job body; returns
    /// without waiting for it.
    pub async fn start(&self) -> Result<StartAck, AppError> {
        let job_id = {
            let mut guard = self.job_state.lock().await;
            if guard.is_running() {
                self.metrics.record_rejected();
                return Err(AppError::Conflict);
            }
            if !self.tool.is_available() {
                self.metrics.record_rejected();
                return Err(AppError::ToolUnavailable);
            }
            if !self.storage.exists(&self.config.source_dir).await {
                self.metrics.record_rejected();
                return Err(AppError::SourceNotFound(self.config.source_path()));
            }
            let job_id = JobId::new();
            guard.claim(job_id);
            job_id
        };

        self.metrics.record_started();
        info!(%job_id, "sync scheduled");

        let controller = self.clone();
        tokio::spawn(async move {
            controller.run_job(job_id).await;
        });

        Ok(StartAck::started(
            job_id,
            self.config.source_path(),
            self.config.destination_path(),
        ))
    }

    /// The job body. Always leaves the state idle with a terminal result.
    pub async fn run_job(&self, job_id: JobId) -> JobResult {
        let items_total = self.storage.count_files(&self.config.source_dir).await;
        self.job_state.begin(job_id, items_total).await;
        info!(%job_id, total_files = items_total, "starting sync");

        let result = match AssertUnwindSafe(self.execute(job_id)).catch_unwind().await {
            Ok(Ok(result)) => result,
            Ok(Err(err)) => {
                error!(%job_id, error = %err, "sync failed");
                JobResult::failed(job_id, err.to_string())
            }
            Err(_) => {
                error!(%job_id, "sync job panicked");
                JobResult::failed(job_id, "Sync job panicked")
            }
        };

        info!(
            %job_id,
            status = %result.status,
            files_transferred = result.items_transferred,
            "sync finished"
        );
        self.metrics.record_result(&result);
        self.job_state.finish(result.clone()).await;
        result
    }

    async fn execute(&self, job_id: JobId) -> Result<JobResult, JobError> {
        let source = &self.config.source_dir;
        let destination = &self.config.destination_dir;

        if !self.tool.is_available() {
            return Err(JobError::ToolUnavailable);
        }
        if !self.storage.exists(source).await {
            return Err(JobError::SourceNotFound(self.config.source_path()));
        }

        match self.storage.is_empty_dir(source).await {
            Ok(true) => {
                info!(%job_id, "source is empty, nothing to sync");
                return Ok(JobResult::empty_source(job_id));
            }
            Ok(false) => {}
            Err(err) => warn!(%job_id, error = %err, "could not check source"),
        }

        self.storage
            .ensure_dir(destination)
            .await
            .map_err(|source| JobError::CreateDestination {
                path: self.config.destination_path(),
                source,
            })?;

        self.storage
            .probe_write(destination)
            .await
            .map_err(|err| match err.kind() {
                ErrorKind::PermissionDenied => {
                    JobError::DestinationNotWritable(self.config.destination_path())
                }
                _ => JobError::Io(err),
            })?;

        let disk = self.storage.disk_space(destination).await;
        if disk.free_gb < self.config.min_free_gb {
            return Err(JobError::LowDiskSpace {
                free_gb: disk.free_gb,
            });
        }

        info!(
            %job_id,
            source = %source.display(),
            destination = %destination.display(),
            "launching rsync"
        );
        let mut process = self.tool.launch(source, destination).await?;

        let mut output = String::new();
        while let Some(line) = process.stdout.next().await {
            let line = line.map_err(JobError::Output)?;
            if let LineKind::Item(item) = classify_line(&line) {
                self.job_state.record_item(item).await;
            }
            output.push_str(&line);
            output.push('\n');
        }

        let exit = process.wait().await.map_err(JobError::Output)?;
        info!(%job_id, exit_code = exit.code, "rsync exited");

        let outcome = classify_outcome(exit.code, &exit.stderr);
        output.push_str(&exit.stderr);
        let items_transferred = extract_transferred_count(&output);

        Ok(JobResult::completed(job_id, outcome, items_transferred))
    }
}
