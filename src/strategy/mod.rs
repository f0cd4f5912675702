//! Fetch strategies
//!
//! Both strategies take the same [`InstrumentBatch`] and produce a
//! [`FetchResult`], but fail differently:
//!
//! - [`cooperative::CooperativeStrategy`] - every request in flight at once on a
//!   single-threaded event loop; the first failure fails the whole batch
//! - [`parallel::ParallelStrategy`] - blocking requests on a fixed worker pool;
//!   each failure is logged and left out, siblings carry on
//!
//! Neither strategy retries.

use crate::fetcher::FetcherError;
use crate::instrument::InstrumentBatch;
use crate::InstrumentId;

pub mod config;
pub mod cooperative;
pub mod parallel;
pub mod result;

pub use cooperative::CooperativeStrategy;
pub use parallel::ParallelStrategy;
pub use result::{FetchResult, UnitFailure};

/// A single failure that invalidated a cooperative batch
#[derive(Debug, thiserror::Error)]
#[error("batch failed at {instrument}: {source}")]
pub struct BatchFetchError {
    /// Instrument whose request failed first
    pub instrument: InstrumentId,
    /// Underlying transport error
    #[source]
    pub source: FetcherError,
}

/// Strategy errors
#[derive(Debug, thiserror::Error)]
pub enum StrategyError {
    /// One request failed and took the batch down with it
    #[error("batch fetch error: {0}")]
    BatchFetch(#[from] BatchFetchError),

    /// Event loop or worker pool could not be created
    #[error("runtime error: {0}")]
    Runtime(String),
}

/// A way of fetching every order book in a batch
pub trait FetchStrategy {
    /// Name used in logs and in the report
    fn name(&self) -> &str;

    /// Fetch the whole batch, returning once every request has finished
    fn fetch_all(&self, batch: &InstrumentBatch) -> Result<FetchResult, StrategyError>;
}
