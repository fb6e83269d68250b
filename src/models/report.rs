//! Record normalization
//!
//! Every run produces one [`ReportRow`] with the same column layout, whatever
//! device family was measured. The device-specific values are placed in their
//! family's column block and the other block is filled with empty placeholders,
//! which lets a single CSV file accumulate rows from different devices.

use chrono::{DateTime, Local};
use log::debug;

use crate::errors::ReportError;
use crate::models::family::DeviceFamily;
use crate::models::metrics::{CradlepointMetric, MetricKey, MetricValues, StatsRecord, ZyxelMetric};
use crate::models::probe::{PingStats, TransferMeasurement};

/// Columns emitted for every run, before the device blocks
pub const COMMON_COLUMNS: [&str; 8] = [
    "Date-Time",
    "Ping Min",
    "Ping Avg",
    "Ping Max",
    "Ping Dev",
    "Upload Speed(bps)",
    "Download Speed(bps)",
    "Hostname",
];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Converts a transfer into bits per second.
///
/// A zero, negative or non-finite interval is rejected rather than producing
/// an infinite rate.
pub fn bits_per_second(bytes: u64, elapsed_secs: f64) -> Result<f64, ReportError> {
    bits_per_second_for("transfer", bytes, elapsed_secs)
}

fn bits_per_second_for(
    direction: &'static str,
    bytes: u64,
    elapsed_secs: f64,
) -> Result<f64, ReportError> {
    if !elapsed_secs.is_finite() || elapsed_secs <= 0.0 {
        return Err(ReportError::InvalidElapsed {
            direction,
            elapsed_secs,
        });
    }
    Ok(bytes as f64 * 8.0 / elapsed_secs)
}

/// One line of the link-check report
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    columns: Vec<String>,
}

impl ReportRow {
    /// The single header shared by every device family
    pub fn header() -> Vec<&'static str> {
        let mut header: Vec<&'static str> = COMMON_COLUMNS.to_vec();
        header.extend(CradlepointMetric::ALL.iter().map(|k| k.column()));
        header.extend(ZyxelMetric::ALL.iter().map(|k| k.column()));
        header
    }

    pub fn column_count() -> usize {
        COMMON_COLUMNS.len() + CradlepointMetric::ALL.len() + ZyxelMetric::ALL.len()
    }

    /// Merges probe results and optional device stats into a fixed-width row.
    ///
    /// `stats` must be `Some` with a matching variant for every family except
    /// [`DeviceFamily::None`], and `None` for it.
    pub fn build(
        timestamp: DateTime<Local>,
        ping: &PingStats,
        upload: TransferMeasurement,
        download: TransferMeasurement,
        family: DeviceFamily,
        stats: Option<&StatsRecord>,
    ) -> Result<Self, ReportError> {
        let upload_bps = bits_per_second_for("upload", upload.bytes, upload.elapsed_secs)?;
        let download_bps = bits_per_second_for("download", download.bytes, download.elapsed_secs)?;

        let (hostname, cradlepoint, zyxel) = match (family, stats) {
            (DeviceFamily::None, None) => (
                String::new(),
                MetricValues::<CradlepointMetric>::empty(),
                MetricValues::<ZyxelMetric>::empty(),
            ),
            (f, Some(StatsRecord::Cradlepoint { hostname, values })) if f.is_cradlepoint() => {
                (hostname.clone(), values.clone(), MetricValues::empty())
            }
            (DeviceFamily::Zyxel, Some(StatsRecord::Zyxel { hostname, values })) => {
                (hostname.clone(), MetricValues::empty(), values.clone())
            }
            (family, _) => {
                return Err(ReportError::FamilyMismatch {
                    family: family.to_string(),
                });
            }
        };

        let mut columns = Vec::with_capacity(Self::column_count());
        columns.push(timestamp.format(TIMESTAMP_FORMAT).to_string());
        columns.extend(ping.columns());
        columns.push(format!("{:.2}", upload_bps));
        columns.push(format!("{:.2}", download_bps));
        columns.push(hostname);
        columns.extend(cradlepoint.columns());
        columns.extend(zyxel.columns());

        debug!(
            "Normalized report row for {}: {} columns, upload={:.2}bps download={:.2}bps",
            family,
            columns.len(),
            upload_bps,
            download_bps
        );

        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Values of the Cradlepoint column block
    pub fn cradlepoint_block(&self) -> &[String] {
        let start = COMMON_COLUMNS.len();
        &self.columns[start..start + CradlepointMetric::ALL.len()]
    }

    /// Values of the Zyxel column block
    pub fn zyxel_block(&self) -> &[String] {
        let start = COMMON_COLUMNS.len() + CradlepointMetric::ALL.len();
        &self.columns[start..]
    }
}
