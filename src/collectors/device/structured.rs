//! Structured status-tree extraction for Cradlepoint 750 firmware
//!
//! The router answers `get status/wan/devices` with a JSON object keyed by WAN
//! device id. Each entry carries `status`, `diagnostics` and `config`
//! sections. Exactly one entry is expected to be the active uplink.
//!
//! Unlike free-text extraction this strategy assumes a complete,
//! schema-conformant document: a malformed document, no connected interface
//! or any missing diagnostic field is a fatal error for the run.

use log::{debug, info, warn};
use serde_json::{Map, Value};

use crate::collectors::device::session::RawDeviceOutput;
use crate::errors::ExtractError;
use crate::models::metrics::{CradlepointMetric, MetricKey, MetricValues};

const CONNECTED: &str = "connected";

/// Active WAN interface chosen from the status tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectedWan {
    pub device_id: String,
    pub hostname: String,
    pub values: MetricValues<CradlepointMetric>,
}

/// Parses the raw command output and reads the connected interface's metrics
pub fn extract_connected_wan(raw: &RawDeviceOutput) -> Result<ConnectedWan, ExtractError> {
    let document: Value = serde_json::from_slice(raw.as_bytes())
        .map_err(|e| ExtractError::MalformedDocument(e.to_string()))?;
    extract_from_document(&document)
}

/// Reads the connected interface's metrics from an already parsed document
pub fn extract_from_document(document: &Value) -> Result<ConnectedWan, ExtractError> {
    let devices = device_table(document)?;
    let (device_id, entry) = select_connected(devices)?;

    let diagnostics = entry
        .get("diagnostics")
        .and_then(Value::as_object)
        .ok_or_else(|| missing(device_id, "diagnostics"))?;

    let mut values = MetricValues::empty();
    for key in CradlepointMetric::ALL {
        let field = key.diagnostic_field();
        let value = diagnostics
            .get(field)
            .and_then(scalar_to_string)
            .ok_or_else(|| missing(device_id, &format!("diagnostics.{}", field)))?;
        values.set(*key, value);
    }

    let hostname = entry
        .get("config")
        .and_then(|config| config.get("hostname"))
        .and_then(scalar_to_string)
        .ok_or_else(|| missing(device_id, "config.hostname"))?;

    debug!(
        "Read {} diagnostics from WAN device '{}' ({})",
        CradlepointMetric::ALL.len(),
        device_id,
        hostname
    );

    Ok(ConnectedWan {
        device_id: device_id.to_string(),
        hostname,
        values,
    })
}

fn device_table(document: &Value) -> Result<&Map<String, Value>, ExtractError> {
    let root = document.as_object().ok_or_else(|| {
        ExtractError::MalformedDocument("expected an object keyed by WAN device id".to_string())
    })?;

    // Some firmware wraps the tree in a `{"success": true, "data": {...}}` envelope.
    match root.get("data") {
        Some(Value::Object(inner)) => Ok(inner),
        _ => Ok(root),
    }
}

/// Picks the first entry, in document order, whose connection state is "connected"
fn select_connected(
    devices: &Map<String, Value>,
) -> Result<(&str, &Map<String, Value>), ExtractError> {
    let mut connected = devices.iter().filter_map(|(id, entry)| {
        let entry = entry.as_object()?;
        let state = entry
            .get("status")
            .and_then(|status| status.get("connection_state"))
            .and_then(Value::as_str)?;
        (state == CONNECTED).then_some((id.as_str(), entry))
    });

    let Some(selected) = connected.next() else {
        return Err(ExtractError::NoConnectedWan {
            candidates: devices.len(),
        });
    };

    let others: Vec<&str> = connected.map(|(id, _)| id).collect();
    if others.is_empty() {
        info!("Active WAN interface: {}", selected.0);
    } else {
        warn!(
            "Several WAN interfaces report connected, using '{}' and ignoring {:?}",
            selected.0, others
        );
    }

    Ok(selected)
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn missing(device: &str, field: &str) -> ExtractError {
    ExtractError::MissingField {
        device: device.to_string(),
        field: field.to_string(),
    }
}
