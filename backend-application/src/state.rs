use std::sync::Arc;

use backend_domain::ports::{HealthCheckService, StorageInspector, SyncTool};
use backend_domain::RuntimeConfig;

use crate::{JobState, Metrics, SyncJobController};

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub sync_tool: Arc<dyn SyncTool>,
    pub storage: Arc<dyn StorageInspector>,
    pub health_service: Arc<dyn HealthCheckService>,
    pub job_state: Arc<JobState>,
    pub metrics: Arc<Metrics>,
    pub controller: SyncJobController,
}

impl AppState {
    pub fn new(
        config: RuntimeConfig,
        sync_tool: Arc<dyn SyncTool>,
        storage: Arc<dyn StorageInspector>,
        health_service: Arc<dyn HealthCheckService>,
    ) -> Self {
        let job_state = Arc::new(JobState::new());
        let metrics = Arc::new(Metrics::default());
        let controller = SyncJobController::new(
            config.clone(),
            sync_tool.clone(),
            storage.clone(),
            job_state.clone(),
            metrics.clone(),
        );
        Self {
            config,
            sync_tool,
            storage,
            health_service,
            job_state,
            metrics,
            controller,
        }
    }
}
