//! One link-check run
//!
//! Stages run strictly in order: ping, upload, download, optional device
//! stats, then a single append to the report. Any failure aborts the run with
//! the failing stage attached, and nothing is written before the final append,
//! so a report never holds a partial row.

use chrono::{DateTime, Local};
use log::{error, info};
use std::fmt;

use crate::collectors::device::{self, DeviceSession, DeviceTarget};
use crate::collectors::LinkProbe;
use crate::errors::{RunError, StageError};
use crate::models::family::DeviceFamily;
use crate::models::metrics::StatsRecord;
use crate::models::probe::{PingStats, TransferMeasurement};
use crate::models::report::ReportRow;
use crate::storage::ReportSink;

/// Progress of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    Init,
    Pinged,
    Uploaded,
    Downloaded,
    StatsCollected,
    StatsSkipped,
    RowAppended,
    Done,
}

impl RunStage {
    /// Human name of the work performed to leave this stage
    fn next_step(self) -> &'static str {
        match self {
            RunStage::Init => "ping",
            RunStage::Pinged => "FTP upload",
            RunStage::Uploaded => "FTP download",
            RunStage::Downloaded => "device stats retrieval",
            RunStage::StatsCollected | RunStage::StatsSkipped => "report append",
            RunStage::RowAppended | RunStage::Done => "completion",
        }
    }
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.next_step())
    }
}

/// What a completed run measured
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub started: DateTime<Local>,
    pub ping: PingStats,
    pub upload: TransferMeasurement,
    pub download: TransferMeasurement,
    pub stats: Option<StatsRecord>,
    pub row: ReportRow,
}

/// Drives the stages of one run against its collaborators
pub struct LinkCheck<'a> {
    probe: &'a dyn LinkProbe,
    session: &'a dyn DeviceSession,
    sink: &'a dyn ReportSink,
    stage: RunStage,
}

impl<'a> LinkCheck<'a> {
    pub fn new(
        probe: &'a dyn LinkProbe,
        session: &'a dyn DeviceSession,
        sink: &'a dyn ReportSink,
    ) -> Self {
        Self {
            probe,
            session,
            sink,
            stage: RunStage::Init,
        }
    }

    pub fn stage(&self) -> RunStage {
        self.stage
    }

    /// Runs every stage once and appends one report row
    pub async fn run(
        &mut self,
        family: DeviceFamily,
        target: Option<&DeviceTarget>,
    ) -> Result<RunSummary, RunError> {
        let started = Local::now();
        info!("Starting link check ({}) at {}", family, started.format("%H:%M:%S"));

        let probe = self.probe;
        let session = self.session;

        let ping = self.step(RunStage::Pinged, probe.ping()).await?;
        let upload = self.step(RunStage::Uploaded, probe.upload()).await?;
        let download = self.step(RunStage::Downloaded, probe.download()).await?;

        let stats = match device::extractor_for(family) {
            Some(extractor) => {
                let record = self
                    .step(
                        RunStage::StatsCollected,
                        device::collect_device_stats(session, target, extractor.as_ref()),
                    )
                    .await?;
                Some(record)
            }
            None => {
                info!("No device family selected, skipping device stats");
                self.advance(RunStage::StatsSkipped);
                None
            }
        };

        let row = ReportRow::build(started, &ping, upload, download, family, stats.as_ref())
            .map_err(|e| self.fail(StageError::from(e)))?;
        self.sink
            .append(&row)
            .map_err(|e| self.fail(StageError::from(e)))?;
        self.advance(RunStage::RowAppended);
        self.advance(RunStage::Done);

        Ok(RunSummary {
            started,
            ping,
            upload,
            download,
            stats,
            row,
        })
    }

    async fn step<T, E>(
        &mut self,
        next: RunStage,
        work: impl Future<Output = Result<T, E>>,
    ) -> Result<T, RunError>
    where
        E: Into<StageError>,
    {
        match work.await {
            Ok(value) => {
                self.advance(next);
                Ok(value)
            }
            Err(e) => Err(self.fail(e.into())),
        }
    }

    fn advance(&mut self, next: RunStage) {
        info!("Run stage {:?} -> {:?}", self.stage, next);
        self.stage = next;
    }

    fn fail(&self, source: StageError) -> RunError {
        error!("{} failed: {}", self.stage, source);
        RunError {
            stage: self.stage,
            source,
        }
    }
}
