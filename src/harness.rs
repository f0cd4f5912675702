//! Benchmark harness
//!
//! Runs each strategy in turn over the same batch under [`measure`], turning
//! every invocation into a [`MeasurementRecord`]. Strategies run strictly one
//! after another since the allocation tracer observes the whole process.

use std::path::Path;

use tracing::{error, info};

use crate::instrument::InstrumentBatch;
use crate::measure::{try_measure, AllocationTracer};
use crate::metrics::record_strategy_run;
use crate::output::{write_report, MeasurementRecord, ReportError};
use crate::strategy::{FetchResult, FetchStrategy, StrategyError};

/// Harness errors
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// A strategy failed fatally; no report was written
    #[error("strategy '{name}' failed: {source}")]
    Strategy {
        /// Reported name of the failing strategy
        name: String,
        /// What went wrong
        #[source]
        source: StrategyError,
    },

    /// Report could not be written
    #[error(transparent)]
    Report(#[from] ReportError),
}

/// Outcome of one measured strategy invocation
#[derive(Debug)]
pub struct StrategyRun {
    /// Row destined for the report
    pub record: MeasurementRecord,
    /// Highest live byte count seen during the run
    pub peak_bytes: u64,
    /// What the strategy fetched
    pub result: FetchResult,
}

/// All runs of one benchmark, in strategy order
#[derive(Debug, Default)]
pub struct BenchmarkReport {
    /// One entry per strategy
    pub runs: Vec<StrategyRun>,
}

impl BenchmarkReport {
    /// Report rows in strategy order
    pub fn records(&self) -> Vec<MeasurementRecord> {
        self.runs.iter().map(|run| run.record.clone()).collect()
    }

    /// Run for the strategy reported as `name`
    pub fn run(&self, name: &str) -> Option<&StrategyRun> {
        self.runs.iter().find(|run| run.record.name == name)
    }
}

/// Measures strategies against one allocation tracer
pub struct BenchmarkHarness<Tr> {
    tracer: Tr,
}

impl<Tr: AllocationTracer> BenchmarkHarness<Tr> {
    /// Create a harness around `tracer`
    pub fn new(tracer: Tr) -> Self {
        Self { tracer }
    }

    /// Measure every strategy over `batch`, in order
    ///
    /// The first fatal strategy error stops the benchmark; later strategies
    /// are not run.
    pub fn run(
        &mut self,
        batch: &InstrumentBatch,
        strategies: &[&dyn FetchStrategy],
    ) -> Result<BenchmarkReport, HarnessError> {
        let mut report = BenchmarkReport::default();

        for strategy in strategies {
            let name = strategy.name().to_string();
            info!(strategy = %name, instruments = batch.len(), "Running strategy");

            let measured = match try_measure(&mut self.tracer, || strategy.fetch_all(batch)) {
                Ok(measured) => measured,
                Err(source) => {
                    error!(strategy = %name, error = %source, "Strategy failed");
                    record_strategy_run(&name, false, 0.0, 0);
                    return Err(HarnessError::Strategy { name, source });
                }
            };

            let record = MeasurementRecord::from_measured(name.clone(), &measured);
            record_strategy_run(&name, true, record.execution_time, record.memory_usage);

            info!(
                strategy = %name,
                fetched = measured.value.len(),
                failed = measured.value.failures().len(),
                seconds = record.execution_time,
                memory_bytes = record.memory_usage,
                peak_bytes = measured.peak_bytes,
                "Strategy finished"
            );

            report.runs.push(StrategyRun {
                record,
                peak_bytes: measured.peak_bytes,
                result: measured.value,
            });
        }

        Ok(report)
    }

    /// [`Self::run`], then write the report to `path`
    ///
    /// Nothing is written unless every strategy completed.
    pub fn run_and_report(
        &mut self,
        batch: &InstrumentBatch,
        strategies: &[&dyn FetchStrategy],
        path: &Path,
    ) -> Result<BenchmarkReport, HarnessError> {
        let report = self.run(batch, strategies)?;
        write_report(path, &report.records())?;
        info!(path = %path.display(), rows = report.runs.len(), "Report written");
        Ok(report)
    }
}
