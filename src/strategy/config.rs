//! Benchmark configuration constants

use std::num::NonZeroUsize;

/// Default instrument template (`{0}` expiry, `{1}` strike, `{2}` type flag)
pub const DEFAULT_TEMPLATE: &str = "BTC-{0}-{1}-{2}";

/// Default underlying asset for the index lookup
pub const DEFAULT_ASSET: &str = "BTC";

/// Default expiry token
pub const DEFAULT_EXPIRY: &str = "31JAN25";

/// Default spacing between strikes
pub const DEFAULT_STRIKE_INTERVAL: i64 = 5000;

/// Default report path
pub const DEFAULT_REPORT_PATH: &str = "execution_results.csv";

/// Worker count used when the machine's parallelism cannot be queried
pub const FALLBACK_WORKERS: usize = 4;

/// Name under which the cooperative strategy is reported
pub const COOPERATIVE_NAME: &str = "ws_fetch_order_books(instruments)";

/// Name under which the parallel strategy is reported
pub const PARALLEL_NAME: &str = "fetch_order_books(instruments)";

/// Default pool size: one worker per available CPU
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(FALLBACK_WORKERS)
}
