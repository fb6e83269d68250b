pub mod device;
pub mod ping;
pub mod transfer;

use async_trait::async_trait;

use crate::errors::ProbeError;
use crate::models::probe::{PingStats, TransferMeasurement};

pub use device::{DeviceSession, DeviceTarget, StatsExtractor, extractor_for};
pub use transfer::{FtpEndpoint, FtpTransfer};

/// Latency and throughput measurements against the FTP host
#[async_trait]
pub trait LinkProbe: Send + Sync {
    async fn ping(&self) -> Result<PingStats, ProbeError>;
    async fn upload(&self) -> Result<TransferMeasurement, ProbeError>;
    async fn download(&self) -> Result<TransferMeasurement, ProbeError>;
}

/// Probe using the system `ping` binary and an FTP session
#[derive(Debug, Clone)]
pub struct NetworkLinkProbe {
    transfer: FtpTransfer,
    ping_host: String,
    ping_count: u32,
}

impl NetworkLinkProbe {
    pub fn new(endpoint: FtpEndpoint, test_file: impl Into<std::path::PathBuf>, ping_count: u32) -> Self {
        Self {
            ping_host: endpoint.host.clone(),
            transfer: FtpTransfer::new(endpoint, test_file),
            ping_count,
        }
    }
}

#[async_trait]
impl LinkProbe for NetworkLinkProbe {
    async fn ping(&self) -> Result<PingStats, ProbeError> {
        ping::run_ping(&self.ping_host, self.ping_count).await
    }

    async fn upload(&self) -> Result<TransferMeasurement, ProbeError> {
        self.transfer.upload().await
    }

    async fn download(&self) -> Result<TransferMeasurement, ProbeError> {
        self.transfer.download().await
    }
}
