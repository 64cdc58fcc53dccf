use std::sync::Arc;

use async_trait::async_trait;
use backend_domain::ports::{HealthCheckService, StorageInspector, SyncTool};
use backend_domain::{DiskSpace, RuntimeConfig};

pub struct DefaultHealthService {
    tool: Arc<dyn SyncTool>,
    storage: Arc<dyn StorageInspector>,
    config: RuntimeConfig,
}

impl DefaultHealthService {
    pub fn new(
        tool: Arc<dyn SyncTool>,
        storage: Arc<dyn StorageInspector>,
        config: RuntimeConfig,
    ) -> Self {
        Self {
            tool,
            storage,
            config,
        }
    }
}

#[async_trait]
impl HealthCheckService for DefaultHealthService {
    fn check_tool(&self) -> bool {
        self.tool.is_available()
    }

    async fn check_source(&self) -> bool {
        self.storage.exists(&self.config.source_dir).await
    }

    async fn check_destination(&self) -> bool {
        self.storage.exists(&self.config.destination_dir).await
    }

    async fn disk_space(&self) -> DiskSpace {
        self.storage.disk_space(&self.config.destination_dir).await
    }
}
