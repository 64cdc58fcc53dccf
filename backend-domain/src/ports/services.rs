use std::io;
use std::path::Path;

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use futures_util::stream::BoxStream;

use crate::entities::{DirectoryStats, DiskSpace};
use crate::errors::LaunchError;

/// Finite, consume-once sequence of output lines; ends when the process
/// closes its stdout.
pub type LineStream = BoxStream<'static, io::Result<String>>;

pub type ExitFuture = BoxFuture<'static, io::Result<ProcessExit>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessExit {
    pub code: i32,
    pub stderr: String,
}

/// A launched sync process.
pub struct ProcessHandle {
    pub stdout: LineStream,
    exit: ExitFuture,
}

impl ProcessHandle {
    pub fn new(stdout: LineStream, exit: ExitFuture) -> Self {
        Self { stdout, exit }
    }

    /// Waits for the process to exit and returns its code with the full stderr text.
    pub async fn wait(self) -> io::Result<ProcessExit> {
        self.exit.await
    }
}

#[async_trait]
pub trait SyncTool: Send + Sync {
    fn is_available(&self) -> bool;
    async fn launch(&self, source: &Path, destination: &Path)
        -> Result<ProcessHandle, LaunchError>;
}

#[async_trait]
pub trait StorageInspector: Send + Sync {
    async fn exists(&self, path: &Path) -> bool;
    /// Recursive regular-file count; enumeration failures count as 0.
    async fn count_files(&self, path: &Path) -> u64;
    /// Shallow check: true when the directory has no direct entries.
    async fn is_empty_dir(&self, path: &Path) -> io::Result<bool>;
    async fn ensure_dir(&self, path: &Path) -> io::Result<()>;
    /// Creates and removes a marker file inside `path`.
    async fn probe_write(&self, path: &Path) -> io::Result<()>;
    async fn disk_space(&self, path: &Path) -> DiskSpace;
    async fn directory_stats(&self, path: &Path) -> DirectoryStats;
}

#[async_trait]
pub trait HealthCheckService: Send + Sync {
    fn check_tool(&self) -> bool;
    async fn check_source(&self) -> bool;
    async fn check_destination(&self) -> bool;
    async fn disk_space(&self) -> DiskSpace;
}
