const BYTES_PER_MB: f64 = 1024.0 * 1024.0;
const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn bytes_to_mb(bytes: u64) -> f64 {
    round2(bytes as f64 / BYTES_PER_MB)
}

pub fn bytes_to_gb(bytes: u64) -> f64 {
    round2(bytes as f64 / BYTES_PER_GB)
}

/// Keeps at most `max_chars` characters, never splitting a code point.
pub fn truncate_chars(value: &str, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((idx, _)) => value[..idx].to_string(),
        None => value.to_string(),
    }
}
