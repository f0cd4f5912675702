//! CSV report writer

use csv::Writer;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::{debug, info};

use super::{MeasurementRecord, ReportError, ReportResult, ReportWriter};

/// Header row; matches the serde field names of [`MeasurementRecord`]
pub const REPORT_HEADER: [&str; 3] = [
    "Function",
    "Execution Time (seconds)",
    "Memory Usage (bytes)",
];

/// CSV writer for measurement records
pub struct CsvReportWriter {
    writer: Writer<BufWriter<File>>,
    records_written: u64,
}

impl CsvReportWriter {
    /// Create or truncate the report at `path`
    ///
    /// The header is written up front so an empty run still produces a
    /// well-formed report.
    pub fn new<P: AsRef<Path>>(path: P) -> ReportResult<Self> {
        let path = path.as_ref();
        info!("Creating report writer: path={}", path.display());

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    ReportError::IoError(format!("Failed to create directory: {}", e))
                })?;
            }
        }

        let file = File::create(path)
            .map_err(|e| ReportError::IoError(format!("Failed to create file: {}", e)))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(BufWriter::new(file));

        writer
            .write_record(REPORT_HEADER)
            .map_err(|e| ReportError::CsvError(format!("Failed to write header: {}", e)))?;

        Ok(Self {
            writer,
            records_written: 0,
        })
    }

    /// Number of records written so far
    pub fn records_written(&self) -> u64 {
        self.records_written
    }
}

impl ReportWriter for CsvReportWriter {
    fn write_record(&mut self, record: &MeasurementRecord) -> ReportResult<()> {
        self.writer
            .serialize(record)
            .map_err(|e| ReportError::CsvError(format!("Failed to write record: {}", e)))?;

        self.records_written += 1;
        debug!(name = %record.name, "Report row written");
        Ok(())
    }

    fn close(mut self) -> ReportResult<()> {
        self.writer
            .flush()
            .map_err(|e| ReportError::IoError(format!("Failed to flush: {}", e)))?;

        let buf_writer = self
            .writer
            .into_inner()
            .map_err(|e| ReportError::IoError(format!("Failed to get inner writer: {}", e)))?;

        let file = buf_writer
            .into_inner()
            .map_err(|e| ReportError::IoError(format!("Failed to get file handle: {}", e)))?;

        file.sync_all()
            .map_err(|e| ReportError::IoError(format!("Failed to sync file: {}", e)))?;

        info!("Report closed: {} records written", self.records_written);
        Ok(())
    }
}
