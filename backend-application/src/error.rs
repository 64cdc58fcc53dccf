use thiserror::Error;

/// Synchronous rejections of a start request.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("Sync already in progress")]
    Conflict,
    #[error("rsync not installed")]
    ToolUnavailable,
    #[error("Source not found: {0}")]
    SourceNotFound(String),
}
