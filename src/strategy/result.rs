//! Fetch results shared by both strategies

use std::collections::{HashMap, HashSet};

use crate::fetcher::{FetcherError, FetcherResult};
use crate::{InstrumentId, OrderBook};

/// Isolated failure of one unit of work in the parallel strategy
#[derive(Debug, thiserror::Error)]
#[error("failed to fetch {instrument}: {error}")]
pub struct UnitFailure {
    /// Instrument whose fetch failed
    pub instrument: InstrumentId,
    /// Underlying transport error
    #[source]
    pub error: FetcherError,
}

/// Order books keyed by instrument, plus any isolated failures
///
/// Books are kept in batch order. A cooperative run never has failures; a
/// parallel run lists each failed instrument in [`FetchResult::failures`] and
/// leaves it out of the books.
#[derive(Debug, Default)]
pub struct FetchResult {
    books: Vec<(InstrumentId, OrderBook)>,
    failures: Vec<UnitFailure>,
}

impl FetchResult {
    /// Result in which every instrument succeeded
    pub fn complete(books: Vec<(InstrumentId, OrderBook)>) -> Self {
        Self {
            books,
            failures: Vec::new(),
        }
    }

    /// Split per-instrument outcomes into books and failures, keeping order
    pub fn from_outcomes<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = (InstrumentId, FetcherResult<OrderBook>)>,
    {
        let mut result = Self::default();
        for (instrument, outcome) in outcomes {
            match outcome {
                Ok(book) => result.books.push((instrument, book)),
                Err(error) => result.failures.push(UnitFailure { instrument, error }),
            }
        }
        result
    }

    /// Successful books in batch order
    pub fn books(&self) -> &[(InstrumentId, OrderBook)] {
        &self.books
    }

    /// Isolated failures in batch order
    pub fn failures(&self) -> &[UnitFailure] {
        &self.failures
    }

    /// Book for `instrument`, if it was fetched
    pub fn get(&self, instrument: &InstrumentId) -> Option<&OrderBook> {
        self.books
            .iter()
            .find(|(id, _)| id == instrument)
            .map(|(_, book)| book)
    }

    /// Instruments with a book
    pub fn ids(&self) -> HashSet<&InstrumentId> {
        self.books.iter().map(|(id, _)| id).collect()
    }

    /// Number of books
    pub fn len(&self) -> usize {
        self.books.len()
    }

    /// Whether no book was fetched
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Whether every unit succeeded
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Consume into a keyed map of books
    pub fn into_map(self) -> HashMap<InstrumentId, OrderBook> {
        self.books.into_iter().collect()
    }
}
