//! Parallel fetch strategy
//!
//! Each instrument is an independent unit of work on a fixed-size rayon
//! pool. Units issue blocking HTTP requests, so the pool size bounds the
//! number of requests in flight. A failing unit is logged and left out of
//! the result; its siblings are unaffected.

use rayon::prelude::*;
use tracing::{info, warn};

use crate::fetcher::{BlockingOrderBookSource, FetcherResult};
use crate::instrument::InstrumentBatch;
use crate::metrics::RequestMetrics;
use crate::strategy::config::{default_workers, PARALLEL_NAME};
use crate::strategy::{FetchResult, FetchStrategy, StrategyError};
use crate::{InstrumentId, OrderBook};

const METRICS_LABEL: &str = "parallel";

/// Worker-pool strategy over a blocking order book source
pub struct ParallelStrategy<S> {
    source: S,
    workers: usize,
    name: String,
}

impl<S: BlockingOrderBookSource> ParallelStrategy<S> {
    /// Create the strategy with `workers` pool threads
    ///
    /// A worker count of zero falls back to one worker per CPU.
    pub fn new(source: S, workers: usize) -> Self {
        let workers = if workers == 0 { default_workers() } else { workers };
        Self {
            source,
            workers,
            name: PARALLEL_NAME.to_string(),
        }
    }

    /// Override the reported name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Pool size
    pub fn workers(&self) -> usize {
        self.workers
    }

    fn fetch_one(&self, instrument: &InstrumentId) -> (InstrumentId, FetcherResult<OrderBook>) {
        let metrics = RequestMetrics::start(METRICS_LABEL);
        let outcome = self.source.order_book(instrument);
        metrics.record(outcome.is_ok());

        if let Err(e) = &outcome {
            warn!(instrument = %instrument, error = %e, "Error fetching order book");
        }
        (instrument.clone(), outcome)
    }
}

impl<S: BlockingOrderBookSource> FetchStrategy for ParallelStrategy<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch_all(&self, batch: &InstrumentBatch) -> Result<FetchResult, StrategyError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|i| format!("fetch-worker-{i}"))
            .build()
            .map_err(|e| StrategyError::Runtime(format!("Failed to build worker pool: {e}")))?;

        info!(
            strategy = %self.name,
            instruments = batch.len(),
            workers = self.workers,
            "Fetching batch on worker pool"
        );

        // install() returns only after every unit has finished
        let outcomes: Vec<_> = pool.install(|| {
            batch
                .ids()
                .par_iter()
                .map(|instrument| self.fetch_one(instrument))
                .collect()
        });
        drop(pool);

        let result = FetchResult::from_outcomes(outcomes);
        if !result.is_complete() {
            warn!(
                strategy = %self.name,
                failed = result.failures().len(),
                fetched = result.len(),
                "Batch finished with isolated failures"
            );
        }
        Ok(result)
    }
}
