//! Copy progress tracking and human-readable formatting.

use std::time::{Duration, Instant};

/// Progress of a backup copy
#[derive(Debug, Clone)]
pub struct CopyProgress {
    /// Total bytes to copy
    pub total_bytes: u64,

    /// Bytes copied so far
    pub copied_bytes: u64,

    /// Total number of files
    pub total_files: usize,

    /// Number of files copied
    pub files_copied: usize,

    /// Percentage complete (0-100)
    pub percent_complete: f64,

    started: Instant,
}

impl CopyProgress {
    pub fn new(total_bytes: u64, total_files: usize) -> Self {
        Self {
            total_bytes,
            copied_bytes: 0,
            total_files,
            files_copied: 0,
            percent_complete: if total_files == 0 { 100.0 } else { 0.0 },
            started: Instant::now(),
        }
    }

    /// Record one copied file of `size` bytes
    pub fn record(&mut self, size: u64) {
        self.files_copied += 1;
        self.copied_bytes += size;
        self.percent_complete = if self.total_bytes > 0 {
            (self.copied_bytes as f64 / self.total_bytes as f64 * 100.0).min(100.0)
        } else {
            self.files_copied as f64 / self.total_files.max(1) as f64 * 100.0
        };
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Format bytes as a human-readable string, e.g. `1.5 MB`.
///
/// Two decimals at most, trailing zeros dropped; units are powers of 1024.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "kB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    let mut number = format!("{:.2}", size);
    if number.contains('.') {
        let trimmed = number.trim_end_matches('0').trim_end_matches('.').len();
        number.truncate(trimmed);
    }

    format!("{} {}", number, UNITS[unit_index])
}

/// Format duration as human-readable string
pub fn format_duration(duration: Duration) -> String {
    let seconds = duration.as_secs();
    if seconds < 1 {
        format!("{}ms", duration.as_millis())
    } else if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_progress_new() {
        let progress = CopyProgress::new(1000, 10);
        assert_eq!(progress.total_bytes, 1000);
        assert_eq!(progress.copied_bytes, 0);
        assert_eq!(progress.percent_complete, 0.0);
        assert_eq!(progress.files_copied, 0);
    }

    #[test]
    fn test_copy_progress_record() {
        let mut progress = CopyProgress::new(1000, 2);
        progress.record(250);
        assert_eq!(progress.files_copied, 1);
        assert!((progress.percent_complete - 25.0).abs() < 0.01);

        progress.record(750);
        assert_eq!(progress.copied_bytes, 1000);
        assert!((progress.percent_complete - 100.0).abs() < 0.01);
    }

    #[test]
    fn test_copy_progress_empty_files() {
        let mut progress = CopyProgress::new(0, 2);
        progress.record(0);
        assert!((progress.percent_complete - 50.0).abs() < 0.01);

        assert_eq!(CopyProgress::new(0, 0).percent_complete, 100.0);
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1024), "1 kB");
        assert_eq!(format_bytes(1536), "1.5 kB");
        assert_eq!(format_bytes(5000), "4.88 kB");
        assert_eq!(format_bytes(1024 * 1024), "1 MB");
        assert_eq!(format_bytes(1024 * 1024 * 1024), "1 GB");
        assert_eq!(format_bytes(5 * 1024u64.pow(5)), "5120 TB");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(format_duration(Duration::from_secs(30)), "30s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
        assert_eq!(format_duration(Duration::from_secs(3665)), "1h 1m");
    }
}
