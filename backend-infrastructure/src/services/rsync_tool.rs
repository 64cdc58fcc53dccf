use std::ffi::OsString;
use std::io;
use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use futures_util::{stream, FutureExt, StreamExt};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, error};

use backend_domain::ports::{LineStream, ProcessExit, ProcessHandle, SyncTool};
use backend_domain::{LaunchError, SIGNAL_EXIT_CODE};

use crate::utils::resolve_executable;

/// Verbose per-file listing, archive mode, human-readable stats, mirror
/// deletion and partial files staged in a hidden directory.
pub const RSYNC_ARGS: &[&str] = &[
    "-avh",
    "--progress",
    "--stats",
    "--delete",
    "--partial-dir=.rsync-partial",
];

pub struct RsyncTool {
    binary: String,
}

impl RsyncTool {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Trailing separators make rsync copy directory contents rather than
    /// the directory itself.
    pub fn build_args(source: &Path, destination: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = RSYNC_ARGS.iter().map(OsString::from).collect();
        args.push(with_trailing_slash(source));
        args.push(with_trailing_slash(destination));
        args
    }
}

impl Default for RsyncTool {
    fn default() -> Self {
        Self::new("rsync")
    }
}

#[async_trait]
impl SyncTool for RsyncTool {
    fn is_available(&self) -> bool {
        resolve_executable(&self.binary).is_some()
    }

    async fn launch(
        &self,
        source: &Path,
        destination: &Path,
    ) -> Result<ProcessHandle, LaunchError> {
        let program = resolve_executable(&self.binary).ok_or_else(|| LaunchError::NotFound {
            binary: self.binary.clone(),
        })?;
        let args = Self::build_args(source, destination);
        debug!(program = %program.display(), ?args, "spawning rsync");

        let mut child = Command::new(&program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| {
                error!(error = %source, "failed to spawn rsync");
                LaunchError::Spawn {
                    binary: self.binary.clone(),
                    source,
                }
            })?;

        let stdout = child.stdout.take().ok_or_else(|| LaunchError::MissingPipe {
            binary: self.binary.clone(),
            stream: "stdout",
        })?;
        let stderr = child.stderr.take().ok_or_else(|| LaunchError::MissingPipe {
            binary: self.binary.clone(),
            stream: "stderr",
        })?;

        // Drained concurrently so a full stderr pipe cannot stall stdout.
        let stderr_task = tokio::spawn(read_all_lossy(stderr));

        let exit = async move {
            let status = child.wait().await?;
            let stderr = stderr_task
                .await
                .map_err(|err| io::Error::new(io::ErrorKind::Other, err))??;
            Ok::<_, io::Error>(ProcessExit {
                code: status.code().unwrap_or(SIGNAL_EXIT_CODE),
                stderr,
            })
        }
        .boxed();

        Ok(ProcessHandle::new(line_stream(stdout), exit))
    }
}

/// Lines are decoded lossily so a non-UTF-8 file name cannot abort a run.
fn line_stream<R>(reader: R) -> LineStream
where
    R: AsyncRead + Unpin + Send + 'static,
{
    stream::unfold(Some(BufReader::new(reader)), |state| async move {
        let mut reader = state?;
        let mut buf = Vec::new();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => None,
            Ok(_) => {
                while matches!(buf.last(), Some(b'\n') | Some(b'\r')) {
                    buf.pop();
                }
                let line = String::from_utf8_lossy(&buf).into_owned();
                Some((Ok(line), Some(reader)))
            }
            Err(err) => Some((Err(err), None)),
        }
    })
    .boxed()
}

async fn read_all_lossy<R>(mut reader: R) -> io::Result<String>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf).await?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn with_trailing_slash(path: &Path) -> OsString {
    let mut value = path.as_os_str().to_os_string();
    if !value.to_string_lossy().ends_with('/') {
        value.push("/");
    }
    value
}
