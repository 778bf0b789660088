//! Display formatting for processing statistics
//!
//! Sizes use base-1024 units with at most two decimals and trailing zeros
//! dropped (`1.5 KB`, `488.28 KB`, `0 Bytes`).

use crate::types::ProcessingStats;
use serde::Serialize;

const SIZE_UNITS: &[&str] = &["Bytes", "KB", "MB", "GB"];

/// Stats rendered as display strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedStats {
    pub processing_time: String,
    pub original_size: String,
    pub processed_size: String,
}

/// Formatter for the values shown next to a result
pub struct StatsFormatter;

impl StatsFormatter {
    /// Format all stats at once
    #[must_use]
    pub fn format(stats: &ProcessingStats) -> FormattedStats {
        FormattedStats {
            processing_time: Self::format_seconds(stats.processing_time_seconds),
            original_size: Self::format_file_size(stats.original_size_bytes),
            processed_size: Self::format_file_size(stats.processed_size_bytes),
        }
    }

    /// Seconds with two decimals, e.g. `1.23s`
    ///
    /// ```rust
    /// use bgremove_client::services::StatsFormatter;
    ///
    /// assert_eq!(StatsFormatter::format_seconds(1.234), "1.23s");
    /// ```
    #[must_use]
    pub fn format_seconds(seconds: f64) -> String {
        format!("{:.2}s", seconds)
    }

    /// Human-readable byte count in base-1024 units
    ///
    /// ```rust
    /// use bgremove_client::services::StatsFormatter;
    ///
    /// assert_eq!(StatsFormatter::format_file_size(2_000_000), "1.91 MB");
    /// assert_eq!(StatsFormatter::format_file_size(500_000), "488.28 KB");
    /// ```
    #[must_use]
    pub fn format_file_size(bytes: u64) -> String {
        if bytes == 0 {
            return "0 Bytes".to_string();
        }

        let mut unit_index = 0;
        let mut size = bytes as f64;
        while size >= 1024.0 && unit_index < SIZE_UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        let rounded = format!("{:.2}", size);
        let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
        format!(
            "{} {}",
            trimmed,
            SIZE_UNITS.get(unit_index).unwrap_or(&"GB")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_seconds() {
        assert_eq!(StatsFormatter::format_seconds(1.234), "1.23s");
        assert_eq!(StatsFormatter::format_seconds(0.0), "0.00s");
        assert_eq!(StatsFormatter::format_seconds(12.5), "12.50s");
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(StatsFormatter::format_file_size(0), "0 Bytes");
        assert_eq!(StatsFormatter::format_file_size(1), "1 Bytes");
        assert_eq!(StatsFormatter::format_file_size(1023), "1023 Bytes");
        assert_eq!(StatsFormatter::format_file_size(1024), "1 KB");
        assert_eq!(StatsFormatter::format_file_size(1536), "1.5 KB");
        assert_eq!(StatsFormatter::format_file_size(500_000), "488.28 KB");
        assert_eq!(StatsFormatter::format_file_size(2_000_000), "1.91 MB");
        assert_eq!(StatsFormatter::format_file_size(20 * 1024 * 1024), "20 MB");
        assert_eq!(StatsFormatter::format_file_size(3 * 1024 * 1024 * 1024), "3 GB");
    }

    #[test]
    fn test_sizes_beyond_gigabytes_stay_in_gb() {
        assert_eq!(
            StatsFormatter::format_file_size(2 * 1024 * 1024 * 1024 * 1024),
            "2048 GB"
        );
    }

    #[test]
    fn test_format_stats() {
        let stats = ProcessingStats::new(1.234, 2_000_000, 500_000).unwrap();
        let formatted = StatsFormatter::format(&stats);
        assert_eq!(formatted.processing_time, "1.23s");
        assert_eq!(formatted.original_size, "1.91 MB");
        assert_eq!(formatted.processed_size, "488.28 KB");
    }
}
