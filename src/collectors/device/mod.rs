//! Device statistics acquisition
//!
//! A device session fetches one raw status payload and a family-specific
//! [`StatsExtractor`] turns it into a normalized [`StatsRecord`]. Supporting a
//! new device family means adding one extractor implementation and one arm in
//! [`extractor_for`].

pub mod cradlepoint;
pub mod pattern;
pub mod session;
pub mod structured;
pub mod zyxel;

use log::{error, info};
use std::time::Instant;

use crate::errors::{DeviceError, ExtractError, StageError};
use crate::models::family::DeviceFamily;
use crate::models::metrics::StatsRecord;

pub use cradlepoint::{Cradlepoint350Extractor, Cradlepoint750Extractor};
pub use session::{DeviceSession, DeviceTarget, RawDeviceOutput, SshDeviceSession};
pub use zyxel::ZyxelExtractor;

/// Turns raw output of one device family into a stats record
pub trait StatsExtractor: Send + Sync {
    fn family(&self) -> DeviceFamily;

    /// Remote command that prints the status this extractor understands
    fn command(&self) -> &'static str;

    fn extract(&self, raw: &RawDeviceOutput) -> Result<StatsRecord, ExtractError>;
}

/// Extractor for `family`, or `None` when no device is queried
pub fn extractor_for(family: DeviceFamily) -> Option<Box<dyn StatsExtractor>> {
    match family {
        DeviceFamily::None => None,
        DeviceFamily::Cradlepoint350 => Some(Box::new(Cradlepoint350Extractor)),
        DeviceFamily::Cradlepoint750 => Some(Box::new(Cradlepoint750Extractor)),
        DeviceFamily::Zyxel => Some(Box::new(ZyxelExtractor)),
    }
}

/// Runs the extractor's command on the device and extracts its stats
pub async fn collect_device_stats(
    session: &dyn DeviceSession,
    target: Option<&DeviceTarget>,
    extractor: &dyn StatsExtractor,
) -> Result<StatsRecord, StageError> {
    let target = target.ok_or(DeviceError::MissingTarget)?;
    let started = Instant::now();

    info!(
        "Retrieving {} stats from {} with '{}'",
        extractor.family(),
        target.host,
        extractor.command()
    );

    let raw = session
        .run_command(target, extractor.command())
        .await
        .inspect_err(|e| error!("Cannot retrieve stats from {}: {}", target.host, e))?;

    let record = extractor
        .extract(&raw)
        .inspect_err(|e| error!("Cannot parse {} stats: {}", extractor.family(), e))?;

    info!(
        "Collected {} stats for '{}' in {:.3}s",
        extractor.family(),
        record.hostname(),
        started.elapsed().as_secs_f64()
    );

    Ok(record)
}
