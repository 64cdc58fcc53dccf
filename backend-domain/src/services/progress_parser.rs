//! Progress inference from the sync tool's line-oriented output and
//! classification of its exit status.

use crate::value_objects::JobStatus;

/// Summary label emitted by `rsync --stats`.
pub const TRANSFERRED_LABEL: &str = "Number of regular files transferred:";

/// Exit code reported when the process was terminated by a signal.
pub const SIGNAL_EXIT_CODE: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// A completed file, carrying the trimmed line.
    Item(&'a str),
    Noise,
}

/// Indented lines belong to the statistics block and trailing-slash lines
/// are directory entries; neither counts as a completed item.
pub fn classify_line(line: &str) -> LineKind<'_> {
    if line.starts_with(char::is_whitespace) {
        return LineKind::Noise;
    }
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.ends_with('/') {
        return LineKind::Noise;
    }
    LineKind::Item(trimmed)
}

/// Percentage shown while a job is still running, capped at 99.
pub fn running_percentage(items_completed: u64, items_total: u64) -> u8 {
    if items_total == 0 {
        return 0;
    }
    let ratio = items_completed as f64 / items_total as f64 * 100.0;
    ratio.round().min(99.0) as u8
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub status: JobStatus,
    pub message: String,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
enum MessageRule {
    Fixed(&'static str),
    /// Code 11 covers both a full disk and other I/O failures.
    DiskError,
}

#[derive(Debug, Clone, Copy)]
struct ExitCodeRule {
    code: i32,
    status: JobStatus,
    message: MessageRule,
    warning: Option<&'static str>,
}

const EXIT_CODE_RULES: &[ExitCodeRule] = &[
    ExitCodeRule {
        code: 0,
        status: JobStatus::Success,
        message: MessageRule::Fixed("Sync completed"),
        warning: None,
    },
    ExitCodeRule {
        code: 3,
        status: JobStatus::Failed,
        message: MessageRule::Fixed("Permission denied"),
        warning: None,
    },
    ExitCodeRule {
        code: 11,
        status: JobStatus::Failed,
        message: MessageRule::DiskError,
        warning: None,
    },
    ExitCodeRule {
        code: 23,
        status: JobStatus::Warning,
        message: MessageRule::Fixed("Partial transfer - some files failed"),
        warning: Some("Some files had errors"),
    },
    ExitCodeRule {
        code: 24,
        status: JobStatus::Warning,
        message: MessageRule::Fixed("Files vanished during sync"),
        warning: Some("Some files were deleted during sync"),
    },
];

pub fn classify_outcome(exit_code: i32, stderr: &str) -> Outcome {
    let Some(rule) = EXIT_CODE_RULES.iter().find(|rule| rule.code == exit_code) else {
        return Outcome {
            status: JobStatus::Failed,
            message: format!("Rsync failed with code {}", exit_code),
            warnings: Vec::new(),
        };
    };

    let message = match rule.message {
        MessageRule::Fixed(text) => text.to_string(),
        MessageRule::DiskError => {
            if stderr.to_lowercase().contains("no space left") {
                "Disk full".to_string()
            } else {
                "Disk I/O error".to_string()
            }
        }
    };

    Outcome {
        status: rule.status,
        message,
        warnings: rule.warning.map(ToString::to_string).into_iter().collect(),
    }
}

/// Last parseable occurrence of the summary label wins; 0 when none parse.
pub fn extract_transferred_count(output: &str) -> u64 {
    output
        .lines()
        .filter(|line| line.contains(TRANSFERRED_LABEL))
        .filter_map(parse_count_value)
        .last()
        .unwrap_or(0)
}

fn parse_count_value(line: &str) -> Option<u64> {
    let value = line.split(':').nth(1)?.trim();
    value.replace(',', "").parse().ok()
}
