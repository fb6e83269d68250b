//! Free-text pattern extraction
//!
//! Older firmware only prints human-readable banners, so each metric is pulled
//! out with its own regular expression. Extraction never fails as a whole: an
//! unsupported metric, a pattern that does not match or undecodable output all
//! leave the affected fields empty and the remaining fields are still read.

use log::{debug, trace, warn};
use regex::Regex;

use crate::collectors::device::session::RawDeviceOutput;
use crate::models::metrics::{MetricKey, MetricValues};

/// Outcome of searching for one metric
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternMatch {
    Found(String),
    NotFound,
    /// No pattern is registered for this metric on this family yet
    Unsupported,
}

impl PatternMatch {
    pub fn into_value(self) -> String {
        match self {
            PatternMatch::Found(value) => value,
            PatternMatch::NotFound | PatternMatch::Unsupported => String::new(),
        }
    }
}

/// Per-family table of metric search patterns
#[derive(Debug, Clone)]
pub struct PatternSet<K: MetricKey> {
    patterns: Vec<(K, Option<Regex>)>,
    hostname: Option<Regex>,
}

impl<K: MetricKey> PatternSet<K> {
    /// Builds a pattern table from `(key, pattern)` pairs.
    ///
    /// An empty pattern marks the metric as unsupported. Keys of the family
    /// that are not listed are treated the same way.
    pub fn new(entries: &[(K, &str)], hostname: &str) -> Result<Self, regex::Error> {
        let mut patterns = Vec::with_capacity(K::ALL.len());
        for key in K::ALL {
            let source = entries
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, p)| *p)
                .unwrap_or("");
            patterns.push((*key, compile_optional(source)?));
        }

        Ok(Self {
            patterns,
            hostname: compile_optional(hostname)?,
        })
    }

    /// Searches `text` for a single metric
    pub fn find(&self, key: K, text: &str) -> PatternMatch {
        match self.patterns.iter().find(|(k, _)| *k == key) {
            Some((_, Some(regex))) => first_match(regex, text),
            _ => PatternMatch::Unsupported,
        }
    }

    /// Searches `text` for the device hostname
    pub fn find_hostname(&self, text: &str) -> PatternMatch {
        match &self.hostname {
            Some(regex) => first_match(regex, text),
            None => PatternMatch::Unsupported,
        }
    }

    /// Extracts every metric from decoded text
    pub fn extract_text(&self, text: &str) -> MetricValues<K> {
        let mut values = MetricValues::empty();
        for (key, _) in &self.patterns {
            match self.find(*key, text) {
                PatternMatch::Found(value) => {
                    trace!("Matched {:?} = '{}'", key, value);
                    values.set(*key, value);
                }
                PatternMatch::NotFound => {
                    debug!("Found nothing while processing {:?}, leaving it empty", key);
                }
                PatternMatch::Unsupported => {
                    trace!("No pattern registered for {:?}", key);
                }
            }
        }
        values
    }

    /// Extracts every metric plus the hostname from raw output.
    ///
    /// Output that is not valid UTF-8 yields all-empty values.
    pub fn extract(&self, raw: &RawDeviceOutput) -> (String, MetricValues<K>) {
        match raw.as_text() {
            Some(text) => (
                self.find_hostname(text).into_value(),
                self.extract_text(text),
            ),
            None => {
                warn!(
                    "Device output ({} bytes) is not valid UTF-8, all fields left empty",
                    raw.len()
                );
                (String::new(), MetricValues::empty())
            }
        }
    }
}

fn compile_optional(source: &str) -> Result<Option<Regex>, regex::Error> {
    if source.is_empty() {
        Ok(None)
    } else {
        Regex::new(source).map(Some)
    }
}

/// First match of `regex`; capture group 1 when the pattern has one.
///
/// A label followed only by blanks counts as not found.
fn first_match(regex: &Regex, text: &str) -> PatternMatch {
    let Some(captures) = regex.captures(text) else {
        return PatternMatch::NotFound;
    };
    let matched = captures.get(1).or_else(|| captures.get(0));
    match matched.map(|m| m.as_str().trim()) {
        Some(value) if !value.is_empty() => PatternMatch::Found(value.to_string()),
        _ => PatternMatch::NotFound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::metrics::ZyxelMetric;

    fn zyxel_patterns() -> PatternSet<ZyxelMetric> {
        PatternSet::new(
            &[
                (ZyxelMetric::LinkStatus, r"status:\s*(\w+)"),
                (ZyxelMetric::UpstreamRate, r"up:\s*\d+"),
                (ZyxelMetric::DownstreamRate, ""),
            ],
            r"name:\s*(\S+)",
        )
        .unwrap()
    }

    #[test]
    fn test_capture_group_preferred_over_whole_match() {
        let patterns = zyxel_patterns();
        assert_eq!(
            patterns.find(ZyxelMetric::LinkStatus, "link status: Up\n"),
            PatternMatch::Found("Up".to_string())
        );
        assert_eq!(
            patterns.find(ZyxelMetric::UpstreamRate, "rate up: 512 kbps"),
            PatternMatch::Found("up: 512".to_string())
        );
    }

    #[test]
    fn test_empty_and_unlisted_patterns_are_unsupported() {
        let patterns = zyxel_patterns();
        assert_eq!(
            patterns.find(ZyxelMetric::DownstreamRate, "down: 8192"),
            PatternMatch::Unsupported
        );
        assert_eq!(
            patterns.find(ZyxelMetric::Firmware, "firmware: V1"),
            PatternMatch::Unsupported
        );
    }

    #[test]
    fn test_missing_fields_do_not_abort_extraction() {
        let patterns = zyxel_patterns();
        let values = patterns.extract_text("name: modem\nstatus: Down\n");

        assert_eq!(values.get(ZyxelMetric::LinkStatus), "Down");
        assert_eq!(values.get(ZyxelMetric::UpstreamRate), "");
        assert_eq!(values.get(ZyxelMetric::DownstreamRate), "");
        assert_eq!(values.get(ZyxelMetric::Firmware), "");
    }

    #[test]
    fn test_blank_capture_is_not_found() {
        let patterns =
            PatternSet::new(&[(ZyxelMetric::Firmware, r"firmware:[ \t]*([^\r\n]+)")], "").unwrap();
        assert_eq!(
            patterns.find(ZyxelMetric::Firmware, "firmware: \t\nstatus: Up"),
            PatternMatch::NotFound
        );
    }

    #[test]
    fn test_invalid_utf8_yields_empty_values() {
        let patterns = zyxel_patterns();
        let raw = RawDeviceOutput::from(vec![0xff, 0xfe, b's', b't']);
        let (hostname, values) = patterns.extract(&raw);

        assert!(hostname.is_empty());
        assert_eq!(values, MetricValues::empty());
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let result = PatternSet::<ZyxelMetric>::new(&[(ZyxelMetric::Firmware, "(unclosed")], "");
        assert!(result.is_err());
    }
}
