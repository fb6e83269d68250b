//! Cradlepoint router extractors
//!
//! The 350 runs legacy firmware whose `get` command prints free-text banners,
//! scraped with per-metric patterns. The 750 returns a structured status tree.
//! Both fill the same Cradlepoint column block of the report.

use log::info;
use std::sync::LazyLock;

use crate::collectors::device::StatsExtractor;
use crate::collectors::device::pattern::PatternSet;
use crate::collectors::device::session::RawDeviceOutput;
use crate::collectors::device::structured::extract_connected_wan;
use crate::errors::ExtractError;
use crate::models::family::DeviceFamily;
use crate::models::metrics::{CradlepointMetric, StatsRecord};

static LEGACY_PATTERNS: LazyLock<PatternSet<CradlepointMetric>> = LazyLock::new(|| {
    PatternSet::new(
        &[
            (CradlepointMetric::ActiveApn, r#"Active APN:[ \t]*"?(\w+)"#),
            (CradlepointMetric::HomeCarrierId, r"HOMECARRID:[ \t]*(\S+)"),
            (CradlepointMetric::ServiceDisplay, r"SERDISP:[ \t]*([^\r\n]+)"),
            (CradlepointMetric::SignalStrength, r"\bSS:[ \t]*(-?\d+)"),
            (CradlepointMetric::Rsrp, r"RSRP:[ \t]*(-?\d+(?:\.\d+)?)"),
            (CradlepointMetric::Rsrq, r"RSRQ:[ \t]*(-?\d+(?:\.\d+)?)"),
            (CradlepointMetric::Sinr, r"SINR:[ \t]*(-?\d+(?:\.\d+)?)"),
            (CradlepointMetric::Mdn, r"MDN:[ \t]*(\d+)"),
            (CradlepointMetric::Imei, r"IMEI:[ \t]*(\d+)"),
            (CradlepointMetric::Imsi, r"IMSI:[ \t]*(\d+)"),
            // Not printed by the legacy banner.
            (CradlepointMetric::Firmware, ""),
        ],
        r"system_id:[ \t]*(\S+)",
    )
    .expect("legacy Cradlepoint patterns are valid")
});

/// Pattern-based extractor for the Cradlepoint 350
#[derive(Debug, Default, Clone, Copy)]
pub struct Cradlepoint350Extractor;

impl StatsExtractor for Cradlepoint350Extractor {
    fn family(&self) -> DeviceFamily {
        DeviceFamily::Cradlepoint350
    }

    fn command(&self) -> &'static str {
        "get"
    }

    fn extract(&self, raw: &RawDeviceOutput) -> Result<StatsRecord, ExtractError> {
        let (hostname, values) = LEGACY_PATTERNS.extract(raw);
        info!(
            "Cradlepoint 350 banner yielded {} of {} fields",
            values.populated(),
            values.columns().len()
        );
        Ok(StatsRecord::Cradlepoint { hostname, values })
    }
}

/// Status-tree extractor for the Cradlepoint 750
#[derive(Debug, Default, Clone, Copy)]
pub struct Cradlepoint750Extractor;

impl StatsExtractor for Cradlepoint750Extractor {
    fn family(&self) -> DeviceFamily {
        DeviceFamily::Cradlepoint750
    }

    fn command(&self) -> &'static str {
        "get status/wan/devices"
    }

    fn extract(&self, raw: &RawDeviceOutput) -> Result<StatsRecord, ExtractError> {
        let wan = extract_connected_wan(raw)?;
        Ok(StatsRecord::Cradlepoint {
            hostname: wan.hostname,
            values: wan.values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEGACY_BANNER: &str = "\
system_id: CP350-0a1b2c
int1: Active APN: \"VZWINTERNET\"
int1: HOMECARRID: Verizon
int1: SERDISP: 4G LTE
int1: SS: -71
int1: RSRP: -98
int1: RSRQ: -9.5
int1: MDN: 5551234567
int1: IMEI: 359225051234567
";

    #[test]
    fn test_legacy_banner_extraction() {
        let record = Cradlepoint350Extractor
            .extract(&RawDeviceOutput::from(LEGACY_BANNER))
            .unwrap();

        let StatsRecord::Cradlepoint { hostname, values } = record else {
            panic!("expected a Cradlepoint record");
        };
        assert_eq!(hostname, "CP350-0a1b2c");
        assert_eq!(values.get(CradlepointMetric::ActiveApn), "VZWINTERNET");
        assert_eq!(values.get(CradlepointMetric::HomeCarrierId), "Verizon");
        assert_eq!(values.get(CradlepointMetric::ServiceDisplay), "4G LTE");
        assert_eq!(values.get(CradlepointMetric::SignalStrength), "-71");
        assert_eq!(values.get(CradlepointMetric::Rsrq), "-9.5");
        assert_eq!(values.get(CradlepointMetric::Imei), "359225051234567");
        // absent from the banner
        assert_eq!(values.get(CradlepointMetric::Sinr), "");
        assert_eq!(values.get(CradlepointMetric::Imsi), "");
        // unsupported on this family
        assert_eq!(values.get(CradlepointMetric::Firmware), "");
    }

    #[test]
    fn test_legacy_extraction_of_unrelated_text_is_all_empty() {
        let record = Cradlepoint350Extractor
            .extract(&RawDeviceOutput::from("% Unknown command"))
            .unwrap();
        let StatsRecord::Cradlepoint { hostname, values } = record else {
            panic!("expected a Cradlepoint record");
        };
        assert!(hostname.is_empty());
        assert_eq!(values.populated(), 0);
    }

    #[test]
    fn test_blank_banner_fields_stay_on_their_line() {
        let banner = concat!(
            "system_id: cp350\n",
            "int1: HOMECARRID: \n",
            "int1: SERDISP:\n",
            "int1: SS: -71\n",
            "int1: RSRP: -98\n",
        );
        let record = Cradlepoint350Extractor
            .extract(&RawDeviceOutput::from(banner))
            .unwrap();
        let StatsRecord::Cradlepoint { hostname, values } = record else {
            panic!("expected a Cradlepoint record");
        };
        assert_eq!(hostname, "cp350");
        assert_eq!(values.get(CradlepointMetric::HomeCarrierId), "");
        assert_eq!(values.get(CradlepointMetric::ServiceDisplay), "");
        assert_eq!(values.get(CradlepointMetric::SignalStrength), "-71");
        assert_eq!(values.get(CradlepointMetric::Rsrp), "-98");
    }

    #[test]
    fn test_structured_extractor_rejects_banner_text() {
        let result = Cradlepoint750Extractor.extract(&RawDeviceOutput::from(LEGACY_BANNER));
        assert!(matches!(result, Err(ExtractError::MalformedDocument(_))));
    }
}
