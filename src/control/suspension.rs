//! Memoizing deferred computations that are safe to force from many threads.
//!
//! This module provides the [`Suspension<T, E>`] type, the evaluation substrate
//! for both laziness and stack safety in this crate. A suspension holds a
//! producer until it is first forced, publishes the produced value exactly
//! once, and hands every caller a reference to that single published value.
//!
//! # Failures are not memoized
//!
//! Only successes are cached. If the producer panics, or a fallible producer
//! returns `Err`, the failure propagates to the forcing caller unchanged and
//! the producer is kept. The next `force` runs it again.
//!
//! # Examples
//!
//! ```rust
//! use fixrt::control::Suspension;
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! let calls = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&calls);
//! let suspension = Suspension::new(move || {
//!     counter.fetch_add(1, Ordering::SeqCst);
//!     42
//! });
//!
//! assert_eq!(calls.load(Ordering::SeqCst), 0);
//! assert_eq!(*suspension.force(), 42);
//! assert_eq!(*suspension.force(), 42);
//! assert_eq!(calls.load(Ordering::SeqCst), 1);
//! ```

use std::cell::RefCell;
use std::convert::Infallible;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind, resume_unwind};
use std::sync::{Arc, OnceLock};

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

use super::policy::EvaluationPolicy;

type Producer<T, E> = Arc<dyn Fn() -> Result<T, E> + Send + Sync>;

/// The producer slot, guarded by the suspension's lock.
struct Pending<T, E> {
    /// `None` once a value has been published (or for `of` suspensions).
    producer: Option<Producer<T, E>>,
    /// Set while a `Locked` forcer runs the producer.
    evaluating: bool,
}

/// A memoizing holder of a deferred computation.
///
/// `Suspension<T, E>` defers a computation until it is first forced. Once a
/// value has been produced it is published, the producer is dropped, and all
/// subsequent forces return the published value without recomputation.
///
/// # Type Parameters
///
/// * `T` - The type of the computed value
/// * `E` - The failure type of a fallible producer. Defaults to
///   [`Infallible`], in which case [`force`](Self::force) returns `&T`
///   directly.
///
/// # Thread Safety
///
/// Producers are `Send + Sync`, so a suspension is `Send + Sync` whenever `T`
/// is. How concurrent forcers coordinate is chosen per suspension with an
/// [`EvaluationPolicy`]:
///
/// - `Locked` (the default): strict at-most-once execution of a successful
///   producer. Forcers wait for the in-flight evaluation.
/// - `Racy`: no lock is held while producing. The first published value wins.
///
/// Under both policies, two callers never observe two different cached values.
///
/// # Examples
///
/// ```rust
/// use fixrt::control::Suspension;
/// use std::sync::Arc;
/// use std::thread;
///
/// let shared = Arc::new(Suspension::new(|| (1..=10).product::<u64>()));
///
/// let handles: Vec<_> = (0..4)
///     .map(|_| {
///         let shared = Arc::clone(&shared);
///         thread::spawn(move || *shared.force())
///     })
///     .collect();
///
/// for handle in handles {
///     assert_eq!(handle.join().unwrap(), 3_628_800);
/// }
/// ```
pub struct Suspension<T, E = Infallible> {
    value: OnceLock<T>,
    pending: ReentrantMutex<RefCell<Pending<T, E>>>,
    policy: EvaluationPolicy,
}

impl<T: 'static> Suspension<T> {
    /// Creates an already evaluated suspension.
    ///
    /// `force` returns `value` immediately and never synchronizes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fixrt::control::Suspension;
    ///
    /// let suspension = Suspension::of(42);
    /// assert!(suspension.is_evaluated());
    /// assert_eq!(*suspension.force(), 42);
    /// ```
    #[inline]
    pub fn of(value: T) -> Self {
        Self::from(value)
    }

    /// Creates a deferred suspension using the default [`EvaluationPolicy`].
    ///
    /// The producer is not called until [`force`](Self::force) is invoked. It
    /// may be called again if it panics, so it should not depend on how many
    /// times it runs.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fixrt::control::Suspension;
    ///
    /// let suspension = Suspension::new(|| "computed".to_string());
    /// assert!(!suspension.is_evaluated());
    /// assert_eq!(suspension.force(), "computed");
    /// ```
    #[inline]
    pub fn new<F>(producer: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::with_policy(producer, EvaluationPolicy::default())
    }

    /// Creates a deferred suspension with an explicit [`EvaluationPolicy`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fixrt::control::{EvaluationPolicy, Suspension};
    ///
    /// let suspension = Suspension::with_policy(|| 7 * 6, EvaluationPolicy::Racy);
    /// assert_eq!(suspension.policy(), EvaluationPolicy::Racy);
    /// assert_eq!(*suspension.force(), 42);
    /// ```
    pub fn with_policy<F>(producer: F, policy: EvaluationPolicy) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::deferred(Arc::new(move || Ok::<T, Infallible>(producer())), policy)
    }

    /// Forces evaluation and returns a reference to the published value.
    ///
    /// # Panics
    ///
    /// - Propagates any panic raised by the producer. The failure is not
    ///   cached: the next call runs the producer again.
    /// - Panics if a `Locked` producer forces its own suspension.
    #[inline]
    pub fn force(&self) -> &T {
        match self.try_force() {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Consumes the suspension and returns its value, evaluating it first if
    /// it has not been forced yet.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fixrt::control::Suspension;
    ///
    /// let suspension = Suspension::new(|| vec![1, 2, 3]);
    /// assert_eq!(suspension.into_inner(), vec![1, 2, 3]);
    /// ```
    #[inline]
    pub fn into_inner(self) -> T {
        match self.try_into_inner() {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }
}

impl<T: 'static, E: 'static> Suspension<T, E> {
    /// Creates a deferred suspension over a fallible producer.
    ///
    /// Only `Ok` results are published. An `Err` is returned to the forcing
    /// caller and the producer is retried on the next force.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fixrt::control::Suspension;
    ///
    /// let parsed = Suspension::fallible(|| "42".parse::<i32>());
    /// assert_eq!(parsed.try_force(), Ok(&42));
    /// ```
    #[inline]
    pub fn fallible<F>(producer: F) -> Self
    where
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
    {
        Self::fallible_with_policy(producer, EvaluationPolicy::default())
    }

    /// Creates a deferred suspension over a fallible producer with an explicit
    /// [`EvaluationPolicy`].
    pub fn fallible_with_policy<F>(producer: F, policy: EvaluationPolicy) -> Self
    where
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
    {
        Self::deferred(Arc::new(producer), policy)
    }

    fn deferred(producer: Producer<T, E>, policy: EvaluationPolicy) -> Self {
        Self {
            value: OnceLock::new(),
            pending: ReentrantMutex::new(RefCell::new(Pending {
                producer: Some(producer),
                evaluating: false,
            })),
            policy,
        }
    }
}

impl<T, E> Suspension<T, E> {
    /// Forces evaluation, returning the published value or the producer's
    /// failure.
    ///
    /// # Errors
    ///
    /// Returns the producer's own `Err` unchanged. Nothing is cached in that
    /// case, so a later call retries the producer.
    ///
    /// # Panics
    ///
    /// Propagates producer panics (uncached), and panics if a `Locked`
    /// producer forces its own suspension.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fixrt::control::Suspension;
    /// use std::sync::Arc;
    /// use std::sync::atomic::{AtomicUsize, Ordering};
    ///
    /// let attempts = Arc::new(AtomicUsize::new(0));
    /// let counter = Arc::clone(&attempts);
    /// let flaky = Suspension::fallible(move || {
    ///     if counter.fetch_add(1, Ordering::SeqCst) == 0 {
    ///         Err("not yet")
    ///     } else {
    ///         Ok(42)
    ///     }
    /// });
    ///
    /// assert_eq!(flaky.try_force(), Err("not yet"));
    /// assert_eq!(flaky.try_force(), Ok(&42));
    /// assert_eq!(flaky.try_force(), Ok(&42));
    /// assert_eq!(attempts.load(Ordering::SeqCst), 2);
    /// ```
    pub fn try_force(&self) -> Result<&T, E> {
        if let Some(value) = self.value.get() {
            return Ok(value);
        }
        match self.policy {
            EvaluationPolicy::Locked => self.force_locked(),
            EvaluationPolicy::Racy => self.force_racy(),
        }
    }

    fn force_locked(&self) -> Result<&T, E> {
        let guard = self.pending.lock();
        // Published by the forcer we were waiting on.
        if let Some(value) = self.value.get() {
            return Ok(value);
        }

        let producer = Self::begin_evaluation(&guard);
        tracing::trace!(policy = %self.policy, "evaluating suspension");
        let outcome = catch_unwind(AssertUnwindSafe(|| producer()));
        guard.borrow_mut().evaluating = false;

        match outcome {
            Ok(Ok(value)) => {
                let value = self.value.get_or_init(|| value);
                guard.borrow_mut().producer = None;
                Ok(value)
            }
            Ok(Err(error)) => {
                tracing::debug!(policy = %self.policy, "suspension producer failed; not cached");
                Err(error)
            }
            Err(payload) => {
                tracing::debug!(policy = %self.policy, "suspension producer panicked; not cached");
                resume_unwind(payload)
            }
        }
    }

    fn begin_evaluation(guard: &ReentrantMutexGuard<'_, RefCell<Pending<T, E>>>) -> Producer<T, E> {
        let mut pending = guard.borrow_mut();
        // The lock is held by this thread, so the flag can only be ours.
        assert!(
            !pending.evaluating,
            "Suspension forced re-entrantly from within its own producer"
        );
        let Some(producer) = pending.producer.clone() else {
            unreachable!("an unpublished suspension always holds its producer")
        };
        pending.evaluating = true;
        producer
    }

    fn force_racy(&self) -> Result<&T, E> {
        let producer = self.pending.lock().borrow().producer.clone();
        let Some(producer) = producer else {
            return Ok(self.published());
        };

        tracing::trace!(policy = %self.policy, "evaluating suspension");
        let value = match producer() {
            Ok(value) => value,
            Err(error) => {
                tracing::debug!(policy = %self.policy, "suspension producer failed; not cached");
                return Err(error);
            }
        };

        if self.value.set(value).is_err() {
            tracing::trace!("suspension already published by a concurrent forcer");
        }
        self.pending.lock().borrow_mut().producer = None;
        Ok(self.published())
    }

    fn published(&self) -> &T {
        match self.value.get() {
            Some(value) => value,
            None => unreachable!("a suspension without a producer always holds its value"),
        }
    }

    /// Consumes the suspension and returns its value, running the producer if
    /// no value has been published yet.
    ///
    /// # Errors
    ///
    /// Returns the producer's `Err` if evaluation fails.
    pub fn try_into_inner(self) -> Result<T, E> {
        let Self { value, pending, .. } = self;
        if let Some(value) = value.into_inner() {
            return Ok(value);
        }
        match pending.into_inner().into_inner().producer {
            Some(producer) => producer(),
            None => unreachable!("an unpublished suspension always holds its producer"),
        }
    }

    /// Returns the published value without forcing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fixrt::control::Suspension;
    ///
    /// let suspension = Suspension::new(|| 42);
    /// assert_eq!(suspension.get(), None);
    /// suspension.force();
    /// assert_eq!(suspension.get(), Some(&42));
    /// ```
    #[inline]
    pub fn get(&self) -> Option<&T> {
        self.value.get()
    }

    /// Returns whether a value has been published.
    #[inline]
    pub fn is_evaluated(&self) -> bool {
        self.value.get().is_some()
    }

    /// Returns the policy concurrent forcers follow.
    #[inline]
    pub const fn policy(&self) -> EvaluationPolicy {
        self.policy
    }

    /// Moves the published value out, leaving the suspension empty.
    ///
    /// Only for tearing a suspension down: an emptied suspension that has
    /// already discarded its producer must not be forced again.
    pub(crate) fn take_published(&mut self) -> Option<T> {
        self.value.take()
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl<T, E> From<T> for Suspension<T, E> {
    fn from(value: T) -> Self {
        Self {
            value: OnceLock::from(value),
            pending: ReentrantMutex::new(RefCell::new(Pending {
                producer: None,
                evaluating: false,
            })),
            policy: EvaluationPolicy::default(),
        }
    }
}

impl<T: Default + 'static> Default for Suspension<T> {
    /// Creates a suspension that defers `T::default()`.
    fn default() -> Self {
        Self::new(T::default)
    }
}

impl<T: fmt::Debug, E> fmt::Debug for Suspension<T, E> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value.get() {
            Some(value) => formatter.debug_tuple("Suspension").field(value).finish(),
            None => formatter
                .debug_tuple("Suspension")
                .field(&"<unevaluated>")
                .finish(),
        }
    }
}
