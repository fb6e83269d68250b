//! Formatting utilities for console output
//!
//! The report itself stores raw numbers; these helpers only produce the
//! human-readable run summary printed by the binary.

/// Formats a rate in bits per second with decimal unit prefixes
///
/// # Examples
///
/// ```
/// use link_check::formatting::format_bitrate;
///
/// assert_eq!(format_bitrate(0.0), "0.00 bps");
/// assert_eq!(format_bitrate(1500.0), "1.50 Kbps");
/// assert_eq!(format_bitrate(4194304.0), "4.19 Mbps");
/// ```
pub fn format_bitrate(bits_per_second: f64) -> String {
    if bits_per_second < 1_000.0 {
        format!("{:.2} bps", bits_per_second)
    } else if bits_per_second < 1_000_000.0 {
        format!("{:.2} Kbps", bits_per_second / 1_000.0)
    } else if bits_per_second < 1_000_000_000.0 {
        format!("{:.2} Mbps", bits_per_second / 1_000_000.0)
    } else {
        format!("{:.2} Gbps", bits_per_second / 1_000_000_000.0)
    }
}

/// Formats byte values with binary unit prefixes (B, KB, MB, GB)
///
/// # Examples
///
/// ```
/// use link_check::formatting::format_bytes;
///
/// assert_eq!(format_bytes(512), "512 B");
/// assert_eq!(format_bytes(1024), "1.00 KB");
/// assert_eq!(format_bytes(1048576), "1.00 MB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    let bytes = bytes as f64;
    if bytes < 1024.0 {
        format!("{:.0} B", bytes)
    } else if bytes < 1024.0 * 1024.0 {
        format!("{:.2} KB", bytes / 1024.0)
    } else if bytes < 1024.0 * 1024.0 * 1024.0 {
        format!("{:.2} MB", bytes / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes / (1024.0 * 1024.0 * 1024.0))
    }
}
