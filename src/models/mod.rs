pub mod family;
pub mod metrics;
pub mod probe;
pub mod report;

pub use family::DeviceFamily;
pub use metrics::{CradlepointMetric, MetricKey, MetricValues, StatsRecord, ZyxelMetric};
pub use probe::{PingStats, TransferMeasurement};
pub use report::{ReportRow, bits_per_second};
