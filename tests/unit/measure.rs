//! Measurement wrapper with the tracking allocator installed

use options_fetch_bench::measure::{allocator, measure, try_measure, AllocatorTracer, NoopTracer};
use options_fetch_bench::AllocationTracer;

#[test]
fn test_allocator_is_installed_in_test_binary() {
    assert!(allocator::is_installed());
}

#[test]
fn test_result_matches_direct_call() {
    let op = || (1..=100).map(|n| n * n).sum::<u64>();
    let direct = op();

    let measured = measure(&mut AllocatorTracer::new(), op);

    assert_eq!(measured.value, direct);
    assert!(measured.execution_time_secs() >= 0.0);
}

#[test]
fn test_retained_allocation_is_counted() {
    const SIZE: usize = 32 << 20;

    let mut tracer = AllocatorTracer::new();
    let measured = measure(&mut tracer, || vec![1u8; SIZE]);

    // Tests run concurrently, so only a lower bound holds
    assert!(measured.memory_bytes >= (SIZE / 2) as u64);
    assert!(measured.peak_bytes >= (SIZE / 2) as u64);
    assert!(!tracer.is_active());
}

#[test]
fn test_frees_of_earlier_memory_offset_the_reading() {
    const EARLIER: usize = 96 << 20;

    let earlier = vec![1u8; EARLIER];
    let mut tracer = AllocatorTracer::new();
    let measured = measure(&mut tracer, move || {
        drop(earlier);
        vec![2u8; 1024]
    });

    assert_eq!(measured.value.len(), 1024);
    // Net figure saturates instead of going negative; concurrent tests keep
    // at most 32 MiB live, well under the freed 96 MiB
    assert!(measured.memory_bytes < (64 << 20) as u64, "{}", measured.memory_bytes);
}

#[test]
fn test_tracer_reusable_across_regions() {
    let mut tracer = AllocatorTracer::new();

    let first = measure(&mut tracer, || vec![0u64; 1024]);
    let second = measure(&mut tracer, || String::from("second"));

    assert_eq!(first.value.len(), 1024);
    assert_eq!(second.value, "second");
    assert!(!tracer.is_active());
}

#[test]
fn test_try_measure_propagates_error() {
    let mut tracer = AllocatorTracer::new();
    let result = try_measure(&mut tracer, || "17".parse::<u8>().map(|n| n * 2));
    assert_eq!(result.unwrap().value, 34);

    let result = try_measure(&mut tracer, || "x".parse::<u8>());
    assert!(result.is_err());
    assert!(!tracer.is_active());
}

#[test]
fn test_noop_tracer_reports_zero() {
    let mut tracer = NoopTracer;
    tracer.start();
    assert_eq!(tracer.snapshot().live_bytes, 0);
    tracer.stop();

    let measured = measure(&mut NoopTracer, || vec![0u8; 4096]);
    assert_eq!(measured.memory_bytes, 0);
}
