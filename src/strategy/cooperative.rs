//! Cooperative fetch strategy
//!
//! Runs every request of the batch concurrently on a single-threaded tokio
//! event loop. The thread only ever blocks on the joined completion of the
//! whole batch; individual requests yield at their I/O await points.
//!
//! Failure is all-or-nothing: the join is a fail-fast `try_join_all`, so the
//! first failed request drops the outstanding ones and the caller gets a
//! [`BatchFetchError`] instead of partial data.

use futures::future::try_join_all;
use tracing::{debug, info};

use crate::fetcher::OrderBookSource;
use crate::instrument::InstrumentBatch;
use crate::metrics::RequestMetrics;
use crate::strategy::config::COOPERATIVE_NAME;
use crate::strategy::{BatchFetchError, FetchResult, FetchStrategy, StrategyError};

/// Metrics label for this strategy
const METRICS_LABEL: &str = "cooperative";

/// Single-threaded concurrent strategy over an async order book source
pub struct CooperativeStrategy<S> {
    source: S,
    name: String,
}

impl<S: OrderBookSource> CooperativeStrategy<S> {
    /// Create the strategy around `source`
    pub fn new(source: S) -> Self {
        Self {
            source,
            name: COOPERATIVE_NAME.to_string(),
        }
    }

    /// Override the reported name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Fetch the batch on the caller's event loop
    ///
    /// Results are in batch order. The first failure wins and no partial
    /// result is returned.
    pub async fn fetch_all_async(
        &self,
        batch: &InstrumentBatch,
    ) -> Result<FetchResult, BatchFetchError> {
        let requests = batch.iter().map(|instrument| async move {
            let metrics = RequestMetrics::start(METRICS_LABEL);
            let outcome = self.source.order_book(instrument).await;
            metrics.record(outcome.is_ok());

            match outcome {
                Ok(book) => {
                    debug!(instrument = %instrument, "Order book received");
                    Ok((instrument.clone(), book))
                }
                Err(source) => Err(BatchFetchError {
                    instrument: instrument.clone(),
                    source,
                }),
            }
        });

        let books = try_join_all(requests).await?;
        Ok(FetchResult::complete(books))
    }
}

impl<S: OrderBookSource> FetchStrategy for CooperativeStrategy<S> {
    fn name(&self) -> &str {
        &self.name
    }

    /// Drive [`Self::fetch_all_async`] to completion on a fresh current-thread runtime
    ///
    /// Must be called from synchronous code; calling it from inside a tokio
    /// runtime returns `StrategyError::Runtime`.
    fn fetch_all(&self, batch: &InstrumentBatch) -> Result<FetchResult, StrategyError> {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(StrategyError::Runtime(
                "cooperative strategy cannot be driven from inside an async runtime".to_string(),
            ));
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| StrategyError::Runtime(format!("Failed to build event loop: {e}")))?;

        info!(
            strategy = %self.name,
            instruments = batch.len(),
            "Fetching batch on single-threaded event loop"
        );

        let result = runtime.block_on(self.fetch_all_async(batch))?;
        Ok(result)
    }
}
