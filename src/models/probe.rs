use serde::Serialize;

/// Round-trip statistics from one ping burst, in milliseconds.
///
/// Values are kept exactly as printed by `ping` so the report reproduces the
/// tool's own precision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PingStats {
    pub min: String,
    pub avg: String,
    pub max: String,
    /// mdev on Linux, stddev on BSD/macOS
    pub jitter: String,
}

impl PingStats {
    /// Values in min/avg/max/jitter order
    pub fn columns(&self) -> [String; 4] {
        [
            self.min.clone(),
            self.avg.clone(),
            self.max.clone(),
            self.jitter.clone(),
        ]
    }
}

/// Size and duration of one timed file transfer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransferMeasurement {
    pub bytes: u64,
    pub elapsed_secs: f64,
}
