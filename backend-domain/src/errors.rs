// Domain error types

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("{binary} not found")]
    NotFound { binary: String },
    #[error("failed to start {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to capture {stream} of {binary}")]
    MissingPipe {
        binary: String,
        stream: &'static str,
    },
}

/// Failures inside the job body. The `Display` text becomes the failed
/// result's message.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("rsync not installed")]
    ToolUnavailable,
    #[error("Source not found: {0}")]
    SourceNotFound(String),
    #[error("Cannot create destination {path}: {source}")]
    CreateDestination {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Cannot write to destination: {0}")]
    DestinationNotWritable(String),
    #[error("Low disk space: only {free_gb}GB free")]
    LowDiskSpace { free_gb: f64 },
    #[error(transparent)]
    Launch(#[from] LaunchError),
    #[error("Failed reading rsync output: {0}")]
    Output(#[source] io::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}
