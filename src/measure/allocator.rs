//! Tracking allocator and the tracer that reads it
//!
//! [`TrackingAllocator`] wraps the system allocator and keeps running byte
//! counters. It only sees allocations once it is installed as the global
//! allocator, which the binary does:
//!
//! ```ignore
//! #[global_allocator]
//! static ALLOCATOR: TrackingAllocator = TrackingAllocator::new();
//! ```
//!
//! [`AllocatorTracer`] turns those counters into per-region numbers: live and
//! peak bytes relative to the moment tracing started.

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tracing::warn;

use super::{AllocationTracer, TraceSnapshot};

// Global counters for allocation tracking
static LIVE_BYTES: AtomicUsize = AtomicUsize::new(0);
static PEAK_BYTES: AtomicUsize = AtomicUsize::new(0);
static ALLOCATION_COUNT: AtomicUsize = AtomicUsize::new(0);

static NOT_INSTALLED_WARNED: AtomicBool = AtomicBool::new(false);

/// Global allocator wrapper that counts live heap bytes
pub struct TrackingAllocator {
    inner: System,
}

impl TrackingAllocator {
    /// Create the allocator; install it with `#[global_allocator]`
    pub const fn new() -> Self {
        Self { inner: System }
    }
}

impl Default for TrackingAllocator {
    fn default() -> Self {
        Self::new()
    }
}

fn record_growth(size: usize) {
    let current = LIVE_BYTES.fetch_add(size, Ordering::Relaxed) + size;
    PEAK_BYTES.fetch_max(current, Ordering::Relaxed);
}

fn record_shrink(size: usize) {
    LIVE_BYTES.fetch_sub(size, Ordering::Relaxed);
}

unsafe impl GlobalAlloc for TrackingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = self.inner.alloc(layout);
        if !ptr.is_null() {
            ALLOCATION_COUNT.fetch_add(1, Ordering::Relaxed);
            record_growth(layout.size());
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = self.inner.alloc_zeroed(layout);
        if !ptr.is_null() {
            ALLOCATION_COUNT.fetch_add(1, Ordering::Relaxed);
            record_growth(layout.size());
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        self.inner.dealloc(ptr, layout);
        record_shrink(layout.size());
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let old_size = layout.size();
        let new_ptr = self.inner.realloc(ptr, layout, new_size);

        if !new_ptr.is_null() {
            if new_size > old_size {
                record_growth(new_size - old_size);
            } else if new_size < old_size {
                record_shrink(old_size - new_size);
            }
        }
        new_ptr
    }
}

/// Whether [`TrackingAllocator`] is the active global allocator
///
/// Any running Rust program has allocated by the time this is asked, so a
/// zero count means the counters are not being fed.
pub fn is_installed() -> bool {
    ALLOCATION_COUNT.load(Ordering::Relaxed) > 0
}

/// Tracer backed by [`TrackingAllocator`]
///
/// The counters are process-wide, so the numbers include allocations made by
/// any thread while tracing is active (worker pools included).
///
/// Readings are net: live bytes now minus live bytes at `start`. Memory that
/// was allocated before `start` and freed inside the region offsets what the
/// region retains, so a region that frees more than it keeps reads 0 rather
/// than the size of what it kept.
#[derive(Debug, Default)]
pub struct AllocatorTracer {
    baseline: usize,
    active: bool,
}

impl AllocatorTracer {
    /// Create an idle tracer
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a region is currently being traced
    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl AllocationTracer for AllocatorTracer {
    fn start(&mut self) {
        if !is_installed() && !NOT_INSTALLED_WARNED.swap(true, Ordering::Relaxed) {
            warn!("TrackingAllocator is not the global allocator; memory usage will read 0");
        }

        self.baseline = LIVE_BYTES.load(Ordering::Relaxed);
        // Peak is tracked from here on
        PEAK_BYTES.store(self.baseline, Ordering::Relaxed);
        self.active = true;
    }

    fn snapshot(&self) -> TraceSnapshot {
        if !self.active {
            return TraceSnapshot::default();
        }

        let live = LIVE_BYTES.load(Ordering::Relaxed);
        let peak = PEAK_BYTES.load(Ordering::Relaxed);

        TraceSnapshot {
            live_bytes: live.saturating_sub(self.baseline) as u64,
            peak_bytes: peak.saturating_sub(self.baseline) as u64,
        }
    }

    fn stop(&mut self) {
        self.active = false;
    }
}
