use std::io;
use std::path::Path;
#[cfg(not(unix))]
use std::path::PathBuf;

use async_trait::async_trait;
#[cfg(unix)]
use nix::sys::statvfs::statvfs;
#[cfg(not(unix))]
use sysinfo::Disks;
use tokio::fs;
use tracing::{error, warn};
use walkdir::WalkDir;

use backend_domain::ports::StorageInspector;
use backend_domain::{DirectoryStats, DiskSpace};

use crate::utils::nearest_existing;

/// Marker created and removed by the write probe.
pub const WRITE_PROBE_FILE: &str = ".write_test";

#[derive(Debug, Default)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl StorageInspector for LocalStorage {
    async fn exists(&self, path: &Path) -> bool {
        fs::try_exists(path).await.unwrap_or(false)
    }

    async fn count_files(&self, path: &Path) -> u64 {
        let root = path.to_path_buf();
        match tokio::task::spawn_blocking(move || count_regular_files(&root)).await {
            Ok(count) => count,
            Err(err) => {
                warn!("file count task failed: {}", err);
                0
            }
        }
    }

    async fn is_empty_dir(&self, path: &Path) -> io::Result<bool> {
        let mut entries = fs::read_dir(path).await?;
        Ok(entries.next_entry().await?.is_none())
    }

    async fn ensure_dir(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path).await
    }

    async fn probe_write(&self, path: &Path) -> io::Result<()> {
        let marker = path.join(WRITE_PROBE_FILE);
        fs::write(&marker, b"").await?;
        fs::remove_file(&marker).await
    }

    async fn disk_space(&self, path: &Path) -> DiskSpace {
        let target = path.to_path_buf();
        match tokio::task::spawn_blocking(move || query_disk_space(&target)).await {
            Ok(Some(space)) => space,
            Ok(None) => {
                error!("failed to get disk space for {}", path.display());
                DiskSpace::default()
            }
            Err(err) => {
                error!("disk space task failed: {}", err);
                DiskSpace::default()
            }
        }
    }

    async fn directory_stats(&self, path: &Path) -> DirectoryStats {
        if !self.exists(path).await {
            return DirectoryStats::missing();
        }
        let root = path.to_path_buf();
        match tokio::task::spawn_blocking(move || scan_directory(&root)).await {
            Ok(stats) => stats,
            Err(err) => {
                error!("error scanning {}: {}", path.display(), err);
                DirectoryStats::new(0, 0, 0)
            }
        }
    }
}

fn count_regular_files(root: &Path) -> u64 {
    WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .count() as u64
}

/// Unreadable entries are skipped rather than failing the scan.
fn scan_directory(root: &Path) -> DirectoryStats {
    let mut files = 0u64;
    let mut folders = 0u64;
    let mut total_size = 0u64;
    for entry in WalkDir::new(root).min_depth(1).into_iter().filter_map(Result::ok) {
        let file_type = entry.file_type();
        if file_type.is_file() {
            files += 1;
            if let Ok(meta) = entry.metadata() {
                total_size = total_size.saturating_add(meta.len());
            }
        } else if file_type.is_dir() {
            folders += 1;
        }
    }
    DirectoryStats::new(files, folders, total_size)
}

/// Asks the filesystem holding `path` directly, so tmpfs and network
/// mounts report their own figures.
#[cfg(unix)]
fn query_disk_space(path: &Path) -> Option<DiskSpace> {
    let existing = nearest_existing(path)?;
    let stat = match statvfs(existing.as_path()) {
        Ok(stat) => stat,
        Err(err) => {
            warn!("statvfs failed for {}: {}", existing.display(), err);
            return None;
        }
    };
    let fragment = stat.fragment_size() as u64;
    Some(DiskSpace::new(
        (stat.blocks() as u64).saturating_mul(fragment),
        (stat.blocks_available() as u64).saturating_mul(fragment),
    ))
}

/// Picks the disk with the longest mount point containing `path`.
#[cfg(not(unix))]
fn query_disk_space(path: &Path) -> Option<DiskSpace> {
    let existing = nearest_existing(path)?;
    let resolved: PathBuf = existing.canonicalize().unwrap_or(existing);
    let disks = Disks::new_with_refreshed_list();
    disks
        .iter()
        .filter(|disk| resolved.starts_with(disk.mount_point()))
        .max_by_key(|disk| disk.mount_point().as_os_str().len())
        .map(|disk| DiskSpace::new(disk.total_space(), disk.available_space()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populate(root: &Path) {
        std::fs::create_dir_all(root.join("nested/deeper")).expect("mkdir");
        std::fs::write(root.join("a.txt"), b"hello").expect("write a");
        std::fs::write(root.join("nested/b.bin"), vec![0u8; 1024]).expect("write b");
        std::fs::write(root.join("nested/deeper/c.txt"), b"abc").expect("write c");
    }

    #[tokio::test]
    async fn counts_files_recursively() {
        let dir = tempfile::tempdir().expect("tempdir");
        populate(dir.path());
        let storage = LocalStorage::new();
        assert_eq!(storage.count_files(dir.path()).await, 3);
        assert_eq!(storage.count_files(&dir.path().join("missing")).await, 0);
    }

    #[tokio::test]
    async fn directory_stats_report_files_folders_and_size() {
        let dir = tempfile::tempdir().expect("tempdir");
        populate(dir.path());
        let stats = LocalStorage::new().directory_stats(dir.path()).await;
        assert!(stats.exists);
        assert_eq!(stats.files, 3);
        assert_eq!(stats.folders, 2);
        assert_eq!(stats.total_size, 5 + 1024 + 3);
    }

    #[tokio::test]
    async fn missing_directory_reports_not_existing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let stats = LocalStorage::new()
            .directory_stats(&dir.path().join("nope"))
            .await;
        assert_eq!(stats, DirectoryStats::missing());
    }

    #[tokio::test]
    async fn emptiness_check_is_shallow() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = LocalStorage::new();
        assert!(storage.is_empty_dir(dir.path()).await.expect("read dir"));

        std::fs::create_dir(dir.path().join("empty_child")).expect("mkdir");
        assert!(!storage.is_empty_dir(dir.path()).await.expect("read dir"));
        assert!(storage
            .is_empty_dir(&dir.path().join("missing"))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn ensure_dir_and_probe_leave_no_marker() {
        let dir = tempfile::tempdir().expect("tempdir");
        let destination = dir.path().join("x/y/z");
        let storage = LocalStorage::new();
        storage.ensure_dir(&destination).await.expect("create");
        storage.probe_write(&destination).await.expect("probe");
        assert!(destination.is_dir());
        assert!(!destination.join(WRITE_PROBE_FILE).exists());
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn disk_space_reports_the_mount_holding_the_path() {
        let mounts = std::fs::read_to_string("/proc/mounts").expect("read mounts");
        let mount = mounts
            .lines()
            .filter_map(|line| {
                let mut fields = line.split_whitespace();
                let _device = fields.next()?;
                let point = fields.next()?;
                let fs_type = fields.next()?;
                (fs_type == "tmpfs" && point != "/" && !point.contains('\\'))
                    .then(|| std::path::PathBuf::from(point))
            })
            .find(|point| point.is_dir());
        let Some(mount) = mount else {
            return;
        };
        let stat = statvfs(mount.as_path()).expect("statvfs");
        let fragment = stat.fragment_size() as u64;
        let expected_total = stat.blocks() as u64 * fragment;

        let storage = LocalStorage::new();
        let space = storage
            .disk_space(&mount.join("delta-not-created/child"))
            .await;

        assert_eq!(space.total, expected_total);
        assert!(space.free <= space.total);
        assert_eq!(space.used, space.total - space.free);
    }
}
