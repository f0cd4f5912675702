//! Report writers

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::measure::Measured;

pub mod csv;

pub use self::csv::CsvReportWriter;

/// Report writer errors
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// IO error
    #[error("IO error: {0}")]
    IoError(String),

    /// CSV write error
    #[error("CSV error: {0}")]
    CsvError(String),
}

/// Result type for report operations
pub type ReportResult<T> = Result<T, ReportError>;

/// One strategy invocation: which strategy ran and what it cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    /// Strategy name
    #[serde(rename = "Function")]
    pub name: String,
    /// Wall-clock seconds
    #[serde(rename = "Execution Time (seconds)")]
    pub execution_time: f64,
    /// Live heap bytes at the end of the run
    #[serde(rename = "Memory Usage (bytes)")]
    pub memory_usage: u64,
}

impl MeasurementRecord {
    /// Create a record
    pub fn new(name: impl Into<String>, execution_time: f64, memory_usage: u64) -> Self {
        Self {
            name: name.into(),
            execution_time,
            memory_usage,
        }
    }

    /// Reduce a measured run to a named record
    pub fn from_measured<T>(name: impl Into<String>, measured: &Measured<T>) -> Self {
        Self::new(name, measured.execution_time_secs(), measured.memory_bytes)
    }
}

/// Generic report writer
pub trait ReportWriter {
    /// Write a single record
    fn write_record(&mut self, record: &MeasurementRecord) -> ReportResult<()>;

    /// Write multiple records in order
    fn write_records(&mut self, records: &[MeasurementRecord]) -> ReportResult<()> {
        for record in records {
            self.write_record(record)?;
        }
        Ok(())
    }

    /// Flush and finalize output
    fn close(self) -> ReportResult<()>;
}

/// Create or truncate `path` and write `records` as CSV
///
/// # Errors
/// Returns `ReportError::IoError` if the file cannot be created or synced
pub fn write_report<P: AsRef<Path>>(path: P, records: &[MeasurementRecord]) -> ReportResult<()> {
    let mut writer = CsvReportWriter::new(path)?;
    writer.write_records(records)?;
    writer.close()
}
