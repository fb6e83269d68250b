//! Link quality checker
//!
//! Measures one WAN link per run: ping latency and jitter to an FTP server,
//! FTP upload and download throughput, and optionally the signal and carrier
//! diagnostics of the cellular modem or DSL router carrying the link. Each run
//! appends one fixed-width row to a CSV report.

pub mod cli;
pub mod collectors;
pub mod config;
pub mod errors;
pub mod formatting;
pub mod models;
pub mod runner;
pub mod storage;

pub use errors::RunError;
pub use models::{DeviceFamily, ReportRow, StatsRecord};
pub use runner::{LinkCheck, RunStage, RunSummary};
