//! Measurement wrapper
//!
//! [`measure`] runs any zero-argument operation between a clock start/stop and
//! an allocation tracer start/snapshot/stop, and hands back the operation's
//! value untouched next to the measurements.
//!
//! The tracer is an explicit handle borrowed mutably for the duration of the
//! measured region, so one handle can never observe two regions at once. The
//! tracer is stopped on every exit path, including a panicking operation.

use std::time::{Duration, Instant};

pub mod allocator;

pub use allocator::{AllocatorTracer, TrackingAllocator};

/// Memory readings taken at the end of a measured region
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceSnapshot {
    /// Bytes allocated since `start` and still live
    pub live_bytes: u64,
    /// Highest live byte count above the baseline seen since `start`
    pub peak_bytes: u64,
}

/// Allocation tracer handle
pub trait AllocationTracer {
    /// Begin tracing; readings are relative to this point
    fn start(&mut self);

    /// Current readings for the traced region
    fn snapshot(&self) -> TraceSnapshot;

    /// Stop tracing
    fn stop(&mut self);
}

/// Tracer that records nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTracer;

impl AllocationTracer for NoopTracer {
    fn start(&mut self) {}

    fn snapshot(&self) -> TraceSnapshot {
        TraceSnapshot::default()
    }

    fn stop(&mut self) {}
}

/// Value produced by a measured operation plus its cost
#[derive(Debug, Clone)]
pub struct Measured<T> {
    /// Whatever the operation returned
    pub value: T,
    /// Wall-clock time spent in the operation
    pub elapsed: Duration,
    /// Live bytes at the end of the operation (see [`TraceSnapshot::live_bytes`])
    pub memory_bytes: u64,
    /// Peak bytes during the operation (see [`TraceSnapshot::peak_bytes`])
    pub peak_bytes: u64,
}

impl<T> Measured<T> {
    /// Elapsed time in fractional seconds
    pub fn execution_time_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    /// Replace the value, keeping the measurements
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Measured<U> {
        Measured {
            value: f(self.value),
            elapsed: self.elapsed,
            memory_bytes: self.memory_bytes,
            peak_bytes: self.peak_bytes,
        }
    }
}

/// Stops the tracer when dropped
struct TraceGuard<'a, Tr: AllocationTracer + ?Sized> {
    tracer: &'a mut Tr,
}

impl<Tr: AllocationTracer + ?Sized> Drop for TraceGuard<'_, Tr> {
    fn drop(&mut self) {
        self.tracer.stop();
    }
}

/// Run `operation` and measure its wall-clock time and memory footprint
///
/// # Examples
///
/// ```
/// use options_fetch_bench::measure::{measure, NoopTracer};
///
/// let measured = measure(&mut NoopTracer, || 6 * 7);
/// assert_eq!(measured.value, 42);
/// ```
pub fn measure<Tr, T, F>(tracer: &mut Tr, operation: F) -> Measured<T>
where
    Tr: AllocationTracer + ?Sized,
    F: FnOnce() -> T,
{
    tracer.start();
    let guard = TraceGuard { tracer };

    let start = Instant::now();
    let value = operation();
    let elapsed = start.elapsed();
    let snapshot = guard.tracer.snapshot();

    drop(guard);

    Measured {
        value,
        elapsed,
        memory_bytes: snapshot.live_bytes,
        peak_bytes: snapshot.peak_bytes,
    }
}

/// Fallible variant of [`measure`]
///
/// The tracer is stopped before an error from `operation` is returned.
pub fn try_measure<Tr, T, E, F>(tracer: &mut Tr, operation: F) -> Result<Measured<T>, E>
where
    Tr: AllocationTracer + ?Sized,
    F: FnOnce() -> Result<T, E>,
{
    let measured = measure(tracer, operation);
    let Measured {
        value,
        elapsed,
        memory_bytes,
        peak_bytes,
    } = measured;

    value.map(|value| Measured {
        value,
        elapsed,
        memory_bytes,
        peak_bytes,
    })
}
