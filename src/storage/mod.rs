pub mod csv_report;

pub use csv_report::{CsvReport, ReportSink};
