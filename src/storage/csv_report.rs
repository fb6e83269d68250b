//! Append-only CSV report
//!
//! The file is opened, appended and closed once per run. The header line is
//! written only when the file is empty, so repeated runs accumulate rows under
//! a single header. No locking is done; runs must not overlap.

use csv::WriterBuilder;
use log::{debug, info};
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::errors::ReportError;
use crate::models::report::ReportRow;

/// Destination of report rows
pub trait ReportSink {
    fn append(&self, row: &ReportRow) -> Result<(), ReportError>;
}

/// CSV file sink
#[derive(Debug, Clone)]
pub struct CsvReport {
    path: PathBuf,
}

impl CsvReport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, operation: &'static str) -> impl FnOnce(std::io::Error) -> ReportError + '_ {
        move |source| ReportError::Io {
            operation,
            path: self.path.clone(),
            source,
        }
    }

    fn csv_error(&self) -> impl FnOnce(csv::Error) -> ReportError + '_ {
        move |source| ReportError::Csv {
            path: self.path.clone(),
            source,
        }
    }
}

impl ReportSink for CsvReport {
    fn append(&self, row: &ReportRow) -> Result<(), ReportError> {
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .map_err(self.io_error("open"))?;
        let is_empty = file.metadata().map_err(self.io_error("stat"))?.len() == 0;

        // Appended writes always land at the end; only the read position moves.
        if !is_empty && !ends_with_newline(&mut file).map_err(self.io_error("read"))? {
            debug!(
                "Report {} lacks a trailing newline, terminating its last line",
                self.path.display()
            );
            file.write_all(b"\n").map_err(self.io_error("write"))?;
        }

        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        if is_empty {
            info!("Report {} is empty, writing header", self.path.display());
            writer
                .write_record(ReportRow::header())
                .map_err(self.csv_error())?;
        }
        writer.write_record(row.columns()).map_err(self.csv_error())?;
        writer.flush().map_err(self.io_error("flush"))?;

        debug!(
            "Appended {} columns to {}",
            row.columns().len(),
            self.path.display()
        );
        Ok(())
    }
}

fn ends_with_newline(file: &mut File) -> io::Result<bool> {
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}
