//! Device metric keys and the normalized stats record
//!
//! Each device family declares its own closed set of metric keys. A
//! [`MetricValues`] map is always created with every key of its family present,
//! so a field that could not be read shows up as an empty string rather than
//! being missing from the report.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Debug;

/// A fixed, family-specific set of named metric slots
pub trait MetricKey: Copy + Ord + Debug + Send + Sync + 'static {
    /// Every key of the family, in report column order
    const ALL: &'static [Self];

    /// Column header used in the CSV report
    fn column(self) -> &'static str;
}

/// Metrics scraped from Cradlepoint routers (both 350 and 750).
///
/// Only fields the structured status tree always carries are listed, so a
/// successful 750 run fills the whole block. Legacy report slots such as
/// community strings, modem id, GPGGA and RX/TX channel have no source on any
/// supported firmware and are not part of the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum CradlepointMetric {
    ActiveApn,
    HomeCarrierId,
    ServiceDisplay,
    SignalStrength,
    Rsrp,
    Rsrq,
    Sinr,
    Mdn,
    Imei,
    Imsi,
    Firmware,
}

impl CradlepointMetric {
    /// Field name inside a WAN device's `diagnostics` section
    pub fn diagnostic_field(self) -> &'static str {
        match self {
            CradlepointMetric::ActiveApn => "CUR_APN",
            CradlepointMetric::HomeCarrierId => "HOMECARRID",
            CradlepointMetric::ServiceDisplay => "SERDISP",
            CradlepointMetric::SignalStrength => "SS",
            CradlepointMetric::Rsrp => "RSRP",
            CradlepointMetric::Rsrq => "RSRQ",
            CradlepointMetric::Sinr => "SINR",
            CradlepointMetric::Mdn => "MDN",
            CradlepointMetric::Imei => "IMEI",
            CradlepointMetric::Imsi => "IMSI",
            CradlepointMetric::Firmware => "FW_VERSION",
        }
    }
}

impl MetricKey for CradlepointMetric {
    const ALL: &'static [Self] = &[
        CradlepointMetric::ActiveApn,
        CradlepointMetric::HomeCarrierId,
        CradlepointMetric::ServiceDisplay,
        CradlepointMetric::SignalStrength,
        CradlepointMetric::Rsrp,
        CradlepointMetric::Rsrq,
        CradlepointMetric::Sinr,
        CradlepointMetric::Mdn,
        CradlepointMetric::Imei,
        CradlepointMetric::Imsi,
        CradlepointMetric::Firmware,
    ];

    fn column(self) -> &'static str {
        match self {
            CradlepointMetric::ActiveApn => "APN",
            CradlepointMetric::HomeCarrierId => "Home Carrier",
            CradlepointMetric::ServiceDisplay => "Service Type",
            CradlepointMetric::SignalStrength => "Signal Strength",
            CradlepointMetric::Rsrp => "RSRP",
            CradlepointMetric::Rsrq => "RSRQ",
            CradlepointMetric::Sinr => "SINR",
            CradlepointMetric::Mdn => "MDN",
            CradlepointMetric::Imei => "IMEI",
            CradlepointMetric::Imsi => "IMSI",
            CradlepointMetric::Firmware => "Modem Firmware",
        }
    }
}

/// Metrics scraped from Zyxel DSL modems
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ZyxelMetric {
    LinkStatus,
    UpstreamRate,
    DownstreamRate,
    Firmware,
}

impl MetricKey for ZyxelMetric {
    const ALL: &'static [Self] = &[
        ZyxelMetric::LinkStatus,
        ZyxelMetric::UpstreamRate,
        ZyxelMetric::DownstreamRate,
        ZyxelMetric::Firmware,
    ];

    fn column(self) -> &'static str {
        match self {
            ZyxelMetric::LinkStatus => "Zyxel Link Status",
            ZyxelMetric::UpstreamRate => "Zyxel Upstream Rate",
            ZyxelMetric::DownstreamRate => "Zyxel Downstream Rate",
            ZyxelMetric::Firmware => "Zyxel Firmware",
        }
    }
}

/// Complete mapping from every key of one family to its scraped value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricValues<K: MetricKey> {
    values: BTreeMap<K, String>,
}

impl<K: MetricKey> Default for MetricValues<K> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<K: MetricKey> MetricValues<K> {
    /// Every key present with an empty value
    pub fn empty() -> Self {
        Self {
            values: K::ALL.iter().map(|key| (*key, String::new())).collect(),
        }
    }

    pub fn set(&mut self, key: K, value: impl Into<String>) {
        self.values.insert(key, value.into());
    }

    pub fn get(&self, key: K) -> &str {
        self.values.get(&key).map(String::as_str).unwrap_or("")
    }

    /// Values in column order
    pub fn columns(&self) -> Vec<String> {
        K::ALL.iter().map(|key| self.get(*key).to_string()).collect()
    }

    /// Number of keys that carry a non-empty value
    pub fn populated(&self) -> usize {
        self.values.values().filter(|v| !v.is_empty()).count()
    }
}

/// Normalized device statistics for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum StatsRecord {
    Cradlepoint {
        hostname: String,
        values: MetricValues<CradlepointMetric>,
    },
    Zyxel {
        hostname: String,
        values: MetricValues<ZyxelMetric>,
    },
}

impl StatsRecord {
    pub fn hostname(&self) -> &str {
        match self {
            StatsRecord::Cradlepoint { hostname, .. } | StatsRecord::Zyxel { hostname, .. } => {
                hostname
            }
        }
    }
}
