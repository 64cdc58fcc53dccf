// Runtime configuration consumed by the application layer

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub source_dir: PathBuf,
    pub destination_dir: PathBuf,
    pub rsync_binary: String,
    pub min_free_gb: f64,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
}

impl RuntimeConfig {
    pub fn source_path(&self) -> String {
        self.source_dir.to_string_lossy().to_string()
    }

    pub fn destination_path(&self) -> String {
        self.destination_dir.to_string_lossy().to_string()
    }
}
