use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;

use backend_domain::RuntimeConfig;

use crate::config::validate_sync_paths;

pub const CONFIG_ENV: &str = "DELTA_CONFIG";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub source_dir: String,
    pub destination_dir: String,
    pub rsync_binary: String,
    pub min_free_gb: f64,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
    pub log_file: Option<String>,
    /// File the values were read from; `None` when running on defaults.
    #[serde(skip)]
    pub loaded_from: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            api_token: None,
            source_dir: "./source".to_string(),
            destination_dir: "./destination".to_string(),
            rsync_binary: "rsync".to_string(),
            min_free_gb: 0.5,
            max_body_bytes: 64 * 1024,
            request_timeout_seconds: 30,
            log_file: Some("delta_migration.log".to_string()),
            loaded_from: None,
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        let path = env::var(CONFIG_ENV).unwrap_or_else(|_| "./config.toml".to_string());
        let file_path = Path::new(&path);
        let base_dir = file_path.parent();
        let mut config = if file_path.exists() {
            let content = fs::read_to_string(file_path).await?;
            let mut config: AppConfig = toml::from_str(&content)?;
            config.loaded_from = Some(file_path.to_path_buf());
            config
        } else {
            AppConfig::default()
        };
        config.apply_env_overrides();
        config.resolve_paths(base_dir);
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn normalize(&mut self) {
        if let Some(api_token) = &self.api_token {
            if api_token.trim().is_empty() {
                self.api_token = None;
            }
        }
        if let Some(log_file) = &self.log_file {
            if log_file.trim().is_empty() {
                self.log_file = None;
            }
        }
        self.rsync_binary = self.rsync_binary.trim().to_string();
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let base = match base_dir {
            Some(dir) if !dir.as_os_str().is_empty() => cwd.join(dir),
            _ => cwd,
        };
        self.source_dir = resolve_path(&base, &self.source_dir);
        self.destination_dir = resolve_path(&base, &self.destination_dir);
        if let Some(log_file) = &self.log_file {
            self.log_file = Some(resolve_path(&base, log_file));
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        if self.rsync_binary.is_empty() {
            return Err(anyhow!("rsync_binary must not be empty"));
        }
        if !self.min_free_gb.is_finite() || self.min_free_gb < 0.0 {
            return Err(anyhow!("min_free_gb must be a non-negative number"));
        }
        if self.max_body_bytes == 0 {
            return Err(anyhow!("max_body_bytes must be greater than 0"));
        }
        validate_sync_paths(Path::new(&self.source_dir), Path::new(&self.destination_dir))
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            api_token: self.api_token.clone(),
            source_dir: PathBuf::from(&self.source_dir),
            destination_dir: PathBuf::from(&self.destination_dir),
            rsync_binary: self.rsync_binary.clone(),
            min_free_gb: self.min_free_gb,
            max_body_bytes: self.max_body_bytes,
            request_timeout_seconds: self.request_timeout_seconds,
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("SOURCE_DIR") {
            self.source_dir = value;
        }
        if let Ok(value) = env::var("DESTINATION_DIR") {
            self.destination_dir = value;
        }
        if let Ok(value) = env::var("DELTA_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Ok(value) = env::var("DELTA_API_TOKEN") {
            self.api_token = Some(value);
        }
        if let Ok(value) = env::var("DELTA_RSYNC_BINARY") {
            self.rsync_binary = value;
        }
        if let Ok(value) = env::var("DELTA_MIN_FREE_GB") {
            self.min_free_gb = value.parse().unwrap_or(self.min_free_gb);
        }
        if let Ok(value) = env::var("DELTA_MAX_BODY_BYTES") {
            self.max_body_bytes = value.parse().unwrap_or(self.max_body_bytes);
        }
        if let Ok(value) = env::var("DELTA_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
        if let Ok(value) = env::var("DELTA_LOG_FILE") {
            self.log_file = Some(value);
        }
    }
}

fn resolve_path(base: &Path, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return trimmed.to_string();
    }
    let path = Path::new(trimmed);
    let path = path.strip_prefix(".").unwrap_or(path);
    if path.is_absolute() {
        trimmed.to_string()
    } else {
        base.join(path).to_string_lossy().to_string()
    }
}
