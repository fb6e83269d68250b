//! Zyxel DSL modem extractor
//!
//! The modem answers with an interactive banner prefixed by its prompt, e.g.
//! `P-660R-D1> status: Up, upstream rate: 1024 kbps, ...`. The prompt gives
//! the hostname; the remainder is scraped with per-metric patterns.

use log::{debug, info, warn};
use std::sync::LazyLock;

use crate::collectors::device::StatsExtractor;
use crate::collectors::device::pattern::PatternSet;
use crate::collectors::device::session::RawDeviceOutput;
use crate::errors::ExtractError;
use crate::models::family::DeviceFamily;
use crate::models::metrics::{MetricValues, StatsRecord, ZyxelMetric};

const PROMPT_DELIMITERS: [char; 2] = ['>', '#'];

static ZYXEL_PATTERNS: LazyLock<PatternSet<ZyxelMetric>> = LazyLock::new(|| {
    PatternSet::new(
        &[
            (ZyxelMetric::LinkStatus, r"(?i)\bstatus[ \t]*[:=][ \t]*(\w+)"),
            (
                ZyxelMetric::UpstreamRate,
                r"(?i)\bup(?:stream)?[ \t]*(?:rate)?[ \t]*[:=][ \t]*(\d+)",
            ),
            (
                ZyxelMetric::DownstreamRate,
                r"(?i)\bdown(?:stream)?[ \t]*(?:rate)?[ \t]*[:=][ \t]*(\d+)",
            ),
            (
                ZyxelMetric::Firmware,
                r"(?i)\bfirmware[ \t]*(?:version)?[ \t]*[:=][ \t]*([^\s,]+)",
            ),
        ],
        "",
    )
    .expect("Zyxel patterns are valid")
});

/// Splits `<hostname><delimiter> <rest>` into the prompt name and the rest.
///
/// Returns an empty hostname and the whole line when no prompt is present.
pub fn strip_prompt(banner: &str) -> (&str, &str) {
    let line = banner.trim();
    match line.find(PROMPT_DELIMITERS) {
        Some(idx) if !line[..idx].trim().is_empty() && !line[..idx].contains(char::is_whitespace) => {
            (line[..idx].trim(), line[idx + 1..].trim())
        }
        _ => ("", line),
    }
}

/// Banner-based extractor for Zyxel modems
#[derive(Debug, Default, Clone, Copy)]
pub struct ZyxelExtractor;

impl StatsExtractor for ZyxelExtractor {
    fn family(&self) -> DeviceFamily {
        DeviceFamily::Zyxel
    }

    fn command(&self) -> &'static str {
        "show system status"
    }

    fn extract(&self, raw: &RawDeviceOutput) -> Result<StatsRecord, ExtractError> {
        let Some(text) = raw.as_text() else {
            warn!(
                "Zyxel output ({} bytes) is not valid UTF-8, all fields left empty",
                raw.len()
            );
            return Ok(StatsRecord::Zyxel {
                hostname: String::new(),
                values: MetricValues::empty(),
            });
        };

        let (hostname, status) = strip_prompt(text);
        debug!("Zyxel prompt '{}', status text '{}'", hostname, status);

        let values = ZYXEL_PATTERNS.extract_text(status);
        info!(
            "Zyxel banner yielded {} of {} fields",
            values.populated(),
            values.columns().len()
        );

        Ok(StatsRecord::Zyxel {
            hostname: hostname.to_string(),
            values,
        })
    }
}
