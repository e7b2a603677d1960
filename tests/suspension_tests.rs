#![cfg(feature = "control")]
//! Unit tests for the Suspension<T, E> type.
//!
//! Tests cover:
//! - Laziness and memoization
//! - Already evaluated suspensions
//! - Concurrent forcing under both evaluation policies
//! - Failures (panics and `Err`) are not cached
//! - Re-entrant forcing detection

use fixrt::control::{EvaluationPolicy, Suspension};
use rstest::rstest;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Weak};
use std::thread;
use std::time::Duration;

fn counter() -> (Arc<AtomicUsize>, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let handle = Arc::clone(&calls);
    (calls, handle)
}

// =============================================================================
// Laziness
// =============================================================================

#[rstest]
fn suspension_new_defers_producer() {
    let (calls, handle) = counter();
    let _suspension = Suspension::new(move || {
        handle.fetch_add(1, Ordering::SeqCst);
        42
    });

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[rstest]
fn suspension_force_runs_producer() {
    let (calls, handle) = counter();
    let suspension = Suspension::new(move || {
        handle.fetch_add(1, Ordering::SeqCst);
        42
    });

    assert_eq!(*suspension.force(), 42);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(suspension.is_evaluated());
}

#[rstest]
fn suspension_get_does_not_force() {
    let (calls, handle) = counter();
    let suspension = Suspension::new(move || handle.fetch_add(1, Ordering::SeqCst));

    assert_eq!(suspension.get(), None);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

// =============================================================================
// Memoization
// =============================================================================

#[rstest]
#[case(EvaluationPolicy::Locked)]
#[case(EvaluationPolicy::Racy)]
fn suspension_sequential_forces_run_producer_once(#[case] policy: EvaluationPolicy) {
    let (calls, handle) = counter();
    let suspension = Suspension::with_policy(
        move || {
            handle.fetch_add(1, Ordering::SeqCst);
            "computed".to_string()
        },
        policy,
    );

    for _ in 0..10 {
        assert_eq!(suspension.force(), "computed");
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[rstest]
fn suspension_force_returns_same_reference() {
    let suspension = Suspension::new(|| vec![1, 2, 3]);
    let first: *const Vec<i32> = suspension.force();
    let second: *const Vec<i32> = suspension.force();
    assert_eq!(first, second);
}

// =============================================================================
// Already Evaluated
// =============================================================================

#[rstest]
fn suspension_of_is_evaluated() {
    let suspension = Suspension::of(42);
    assert!(suspension.is_evaluated());
    assert_eq!(suspension.get(), Some(&42));
    assert_eq!(*suspension.force(), 42);
}

#[rstest]
fn suspension_from_value_is_evaluated_for_fallible_suspensions() {
    let suspension: Suspension<i32, String> = Suspension::from(7);
    assert_eq!(suspension.try_force(), Ok(&7));
}

// =============================================================================
// Concurrency
// =============================================================================

#[rstest]
fn suspension_locked_runs_producer_once_across_threads() {
    const THREADS: usize = 16;

    let (calls, handle) = counter();
    let suspension = Arc::new(Suspension::with_policy(
        move || {
            handle.fetch_add(1, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(20));
            42_u64
        },
        EvaluationPolicy::Locked,
    ));
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let suspension = Arc::clone(&suspension);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                *suspension.force()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 42);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[rstest]
fn suspension_racy_publishes_single_value_across_threads() {
    const THREADS: usize = 16;

    let (calls, handle) = counter();
    // Each run yields a different number, so disagreement would be visible.
    let suspension = Arc::new(Suspension::with_policy(
        move || {
            thread::sleep(Duration::from_millis(5));
            handle.fetch_add(1, Ordering::SeqCst)
        },
        EvaluationPolicy::Racy,
    ));
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let suspension = Arc::clone(&suspension);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                *suspension.force()
            })
        })
        .collect();

    let observed: Vec<usize> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    let published = *suspension.force();
    assert!(observed.iter().all(|value| *value == published));
    assert!(calls.load(Ordering::SeqCst) >= 1);
    assert!(calls.load(Ordering::SeqCst) <= THREADS);
}

#[rstest]
fn suspension_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Suspension<String>>();
    assert_send_sync::<Suspension<u64, std::io::ErrorKind>>();
}

// =============================================================================
// Failures Are Not Cached
// =============================================================================

#[rstest]
#[case(EvaluationPolicy::Locked)]
#[case(EvaluationPolicy::Racy)]
fn suspension_panic_is_retried_on_next_force(#[case] policy: EvaluationPolicy) {
    let (calls, handle) = counter();
    let suspension = Suspension::with_policy(
        move || {
            assert!(
                handle.fetch_add(1, Ordering::SeqCst) > 0,
                "first attempt fails"
            );
            42
        },
        policy,
    );

    let first = catch_unwind(AssertUnwindSafe(|| *suspension.force()));
    assert!(first.is_err());
    assert!(!suspension.is_evaluated());

    assert_eq!(*suspension.force(), 42);
    assert_eq!(*suspension.force(), 42);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[rstest]
#[case(EvaluationPolicy::Locked)]
#[case(EvaluationPolicy::Racy)]
fn suspension_err_is_retried_on_next_force(#[case] policy: EvaluationPolicy) {
    let (calls, handle) = counter();
    let suspension = Suspension::fallible_with_policy(
        move || match handle.fetch_add(1, Ordering::SeqCst) {
            0 => Err("unavailable".to_string()),
            attempt => Ok(attempt * 10),
        },
        policy,
    );

    assert_eq!(suspension.try_force(), Err("unavailable".to_string()));
    assert_eq!(suspension.get(), None);
    assert_eq!(suspension.try_force(), Ok(&10));
    assert_eq!(suspension.try_force(), Ok(&10));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[rstest]
fn suspension_err_passes_through_unchanged() {
    #[derive(Debug, PartialEq)]
    struct Timeout {
        after_ms: u64,
    }

    let suspension: Suspension<u8, Timeout> = Suspension::fallible(|| Err(Timeout { after_ms: 30 }));
    assert_eq!(suspension.try_force(), Err(Timeout { after_ms: 30 }));
}

#[rstest]
fn suspension_locked_waiters_retry_after_failed_evaluation() {
    let (calls, handle) = counter();
    let suspension = Arc::new(Suspension::fallible(move || {
        match handle.fetch_add(1, Ordering::SeqCst) {
            0 => {
                thread::sleep(Duration::from_millis(20));
                Err(())
            }
            _ => Ok(5),
        }
    }));
    let barrier = Arc::new(Barrier::new(2));

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let suspension = Arc::clone(&suspension);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                suspension.try_force().copied()
            })
        })
        .collect();

    let mut outcomes: Vec<Result<i32, ()>> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();
    outcomes.sort();

    assert_eq!(outcomes, vec![Ok(5), Err(())]);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

// =============================================================================
// Re-entrant Forcing
// =============================================================================

#[rstest]
#[should_panic(expected = "re-entrantly")]
fn suspension_locked_reentrant_force_panics() {
    let suspension = Arc::new_cyclic(|this: &Weak<Suspension<i32>>| {
        let this = this.clone();
        Suspension::new(move || this.upgrade().map_or(0, |inner| *inner.force() + 1))
    });

    let _ = suspension.force();
}

#[rstest]
fn suspension_reentrant_failure_is_not_cached() {
    let suspension = Arc::new_cyclic(|this: &Weak<Suspension<i32>>| {
        let this = this.clone();
        Suspension::new(move || this.upgrade().map_or(0, |inner| *inner.force() + 1))
    });

    assert!(catch_unwind(AssertUnwindSafe(|| *suspension.force())).is_err());
    assert!(!suspension.is_evaluated());
}

// =============================================================================
// into_inner
// =============================================================================

#[rstest]
fn suspension_into_inner_evaluates_unforced_value() {
    let (calls, handle) = counter();
    let suspension = Suspension::new(move || {
        handle.fetch_add(1, Ordering::SeqCst);
        "owned".to_string()
    });

    assert_eq!(suspension.into_inner(), "owned");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[rstest]
fn suspension_try_into_inner_returns_err() {
    let suspension: Suspension<i32, &str> = Suspension::fallible(|| Err("boom"));
    assert_eq!(suspension.try_into_inner(), Err("boom"));
}
