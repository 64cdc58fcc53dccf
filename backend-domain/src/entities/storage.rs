// Point-in-time filesystem figures reported by status and health queries

use serde::{Deserialize, Serialize};

use crate::utils::{bytes_to_gb, bytes_to_mb};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct DirectoryStats {
    pub exists: bool,
    pub files: u64,
    pub folders: u64,
    pub total_size: u64,
    pub total_size_mb: f64,
}

impl DirectoryStats {
    pub fn missing() -> Self {
        Self::default()
    }

    pub fn new(files: u64, folders: u64, total_size: u64) -> Self {
        Self {
            exists: true,
            files,
            folders,
            total_size,
            total_size_mb: bytes_to_mb(total_size),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationStatus {
    pub path: String,
    #[serde(flatten)]
    pub stats: DirectoryStats,
}

/// Zero-filled when the underlying disk cannot be queried.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct DiskSpace {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub free_gb: f64,
}

impl DiskSpace {
    pub fn new(total: u64, free: u64) -> Self {
        Self {
            total,
            used: total.saturating_sub(free),
            free,
            free_gb: bytes_to_gb(free),
        }
    }
}
