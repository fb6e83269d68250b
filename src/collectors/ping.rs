//! ICMP latency probe using the system `ping` binary

use log::{debug, error, info};
use regex::Regex;
use std::sync::LazyLock;
use tokio::process::Command;

use crate::errors::ProbeError;
use crate::models::probe::PingStats;

// Linux prints `rtt min/avg/max/mdev`, BSD and macOS `round-trip min/avg/max/stddev`.
static PING_SUMMARY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:rtt|round-trip) min/avg/max/(?:mdev|stddev) = (\d+\.\d+)/(\d+\.\d+)/(\d+\.\d+)/(\d+\.\d+)",
    )
    .unwrap()
});

/// Extracts min/avg/max/jitter from ping's summary line.
///
/// Returns `None` when the output has no summary, which is what ping prints
/// when every echo request was lost.
pub fn parse_ping_summary(output: &str) -> Option<PingStats> {
    let captures = PING_SUMMARY_RE.captures(output)?;
    Some(PingStats {
        min: captures[1].to_string(),
        avg: captures[2].to_string(),
        max: captures[3].to_string(),
        jitter: captures[4].to_string(),
    })
}

/// Sends `count` echo requests to `host` and parses the summary
pub async fn run_ping(host: &str, count: u32) -> Result<PingStats, ProbeError> {
    info!("Pinging {} ({} echo requests)", host, count);

    let output = Command::new("ping")
        .arg("-c")
        .arg(count.to_string())
        .arg(host)
        .output()
        .await
        .map_err(|source| ProbeError::PingSpawn {
            host: host.to_string(),
            source,
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    debug!(
        "ping exited with {} ({} bytes of output)",
        output.status,
        stdout.len()
    );

    match parse_ping_summary(&stdout) {
        Some(stats) => {
            info!(
                "Ping {}: min={}ms avg={}ms max={}ms jitter={}ms",
                host, stats.min, stats.avg, stats.max, stats.jitter
            );
            Ok(stats)
        }
        None => {
            error!(
                "No ping summary from {}: {}",
                host,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            Err(ProbeError::NoPingSummary {
                host: host.to_string(),
            })
        }
    }
}
