//! Error types for each stage of a link check
//!
//! Connectivity, parse and I/O failures are all fatal for the run. The only
//! non-fatal condition, a free-text pattern that does not match, never becomes
//! an error value at all.
//!
//! Messages never repeat their `source`; print the whole chain (`{:#}` on an
//! `anyhow::Error`) to see the cause.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::runner::RunStage;

/// Failures while probing the link (ping and FTP transfers)
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to run ping against {host}")]
    PingSpawn {
        host: String,
        #[source]
        source: io::Error,
    },

    #[error("no round-trip summary in ping output for {host}, no connectivity to the FTP server?")]
    NoPingSummary { host: String },

    #[error("FTP connection to {host} failed: {message}")]
    FtpConnect { host: String, message: String },

    #[error("FTP login to {host} as '{user}' rejected: {message}")]
    FtpLogin {
        host: String,
        user: String,
        message: String,
    },

    #[error("FTP {operation} of '{file}' failed: {message}")]
    FtpTransfer {
        operation: &'static str,
        file: String,
        message: String,
    },

    #[error("cannot {operation} local test file {}", path.display())]
    TestFile {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("background transfer task failed: {0}")]
    Task(String),
}

/// Failures opening or using the remote shell on the device
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("device {host}:{port} unreachable")]
    Unreachable {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    #[error("SSH handshake with {host} failed: {message}")]
    Handshake { host: String, message: String },

    #[error("SSH authentication to {host} as '{user}' rejected")]
    AuthRejected { host: String, user: String },

    #[error("running '{command}' on {host} failed: {message}")]
    Exec {
        host: String,
        command: String,
        message: String,
    },

    #[error("device session with {host} timed out after {timeout_secs}s")]
    Timeout { host: String, timeout_secs: u64 },

    #[error("device credentials are required for this device family")]
    MissingTarget,

    #[error("background session task failed: {0}")]
    Task(String),
}

/// Failures turning raw device output into a stats record.
///
/// Only the structured strategy produces these; pattern extraction degrades
/// field by field instead.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("device status document is not well-formed: {0}")]
    MalformedDocument(String),

    #[error("no WAN interface reports connection_state \"connected\" ({candidates} candidates inspected)")]
    NoConnectedWan { candidates: usize },

    #[error("WAN device '{device}' is missing required field '{field}'")]
    MissingField { device: String, field: String },
}

/// Failures building or persisting the report row
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("{direction} elapsed time must be positive, got {elapsed_secs}s")]
    InvalidElapsed {
        direction: &'static str,
        elapsed_secs: f64,
    },

    #[error("device stats do not match the selected family ({family})")]
    FamilyMismatch { family: String },

    #[error("cannot {operation} report file {}", path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write CSV row to {}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Invalid settings or argument combinations
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load settings")]
    Load(#[from] ::config::ConfigError),

    #[error("device family '{family}' requires device host, username and password")]
    MissingDeviceArguments { family: String },

    #[error("invalid setting {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Error of a whole run: the failing stage plus its cause
#[derive(Debug, Error)]
#[error("link check failed during {stage}")]
pub struct RunError {
    pub stage: RunStage,
    #[source]
    pub source: StageError,
}

/// Cause of a failed stage
#[derive(Debug, Error)]
pub enum StageError {
    #[error(transparent)]
    Probe(#[from] ProbeError),

    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Report(#[from] ReportError),
}
