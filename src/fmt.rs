//! Shared formatting utilities for size display and console output

use console::Emoji;

/// Hammer emoji for build operations
pub const HAMMER: Emoji = Emoji("🔨", ">");

/// Checkmark emoji for success
pub const CHECKMARK: Emoji = Emoji("✅", "[OK]");

/// Crossmark emoji for failure
pub const CROSSMARK: Emoji = Emoji("❌", "[FAIL]");

/// Chart emoji for metrics/statistics
pub const CHART: Emoji = Emoji("📊", "~");

/// Info emoji for informational messages
pub const INFO: Emoji = Emoji("ℹ️", "i");

/// Format bytes as human-readable size string, using decimal (SI) units
/// to match how bundle sizes are reported elsewhere in the JS ecosystem
///
/// # Examples
///
/// ```
/// use sizewatch::fmt::format_bytes;
///
/// assert_eq!(format_bytes(512), "512 B");
/// assert_eq!(format_bytes(1500), "1.50 kB");
/// assert_eq!(format_bytes(1_000_000), "1.00 MB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1000;
    const MB: u64 = KB * 1000;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} kB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Formats byte deltas with an explicit sign and compact units.
///
/// Constructed per report invocation and passed into the renderer; there is
/// no shared global formatter state.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByteFormatter;

impl ByteFormatter {
    /// Format a signed byte difference, e.g. `+1.50 kB` or `-400 B`.
    pub fn signed(&self, diff: i64) -> String {
        let magnitude = format_bytes(diff.unsigned_abs());
        if diff < 0 {
            format!("-{}", magnitude)
        } else {
            format!("+{}", magnitude)
        }
    }

    /// Format an absolute byte count, e.g. `15.04 kB`.
    pub fn absolute(&self, bytes: u64) -> String {
        format_bytes(bytes)
    }
}

/// Formats relative differences as signed percentages with two fraction
/// digits.
#[derive(Debug, Clone, Copy, Default)]
pub struct PercentFormatter;

impl PercentFormatter {
    /// Format a ratio as a signed percent string, e.g. `+2.67%`.
    pub fn signed(&self, ratio: f64) -> String {
        format!("{:+.2}%", ratio * 100.0)
    }
}
