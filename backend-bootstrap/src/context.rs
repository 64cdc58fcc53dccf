use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use backend_application::AppState;
use backend_domain::ports::{HealthCheckService, StorageInspector, SyncTool};
use backend_infrastructure::{AppConfig, DefaultHealthService, LocalStorage, RsyncTool};

use crate::logging;

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub async fn new() -> Result<Self> {
        let config = AppConfig::load().await?;
        logging::init(config.log_file.as_deref())?;
        match &config.loaded_from {
            Some(path) => info!("loaded config from {}", path.display()),
            None => warn!("config file not found, using defaults"),
        }

        let runtime_config = config.to_runtime_config();
        let tool: Arc<dyn SyncTool> = Arc::new(RsyncTool::new(runtime_config.rsync_binary.clone()));
        if !tool.is_available() {
            warn!(
                binary = %runtime_config.rsync_binary,
                "rsync is not installed; sync requests will be rejected"
            );
        }
        let storage: Arc<dyn StorageInspector> = Arc::new(LocalStorage::new());
        let health: Arc<dyn HealthCheckService> = Arc::new(DefaultHealthService::new(
            tool.clone(),
            storage.clone(),
            runtime_config.clone(),
        ));
        info!(
            source = %runtime_config.source_path(),
            destination = %runtime_config.destination_path(),
            "sync paths configured"
        );

        let state = AppState::new(runtime_config, tool, storage, health);
        Ok(Self { state })
    }
}
