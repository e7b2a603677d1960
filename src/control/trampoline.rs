//! Stack-safe recursion via trampolining.
//!
//! This module provides the `Trampoline<T>` type for expressing recursive
//! computations in a stack-safe manner. Instead of using the call stack, each
//! recursive step is returned as data, a [`Suspension`] that produces the next
//! step, and [`Trampoline::run`] drives the steps in a loop.
//!
//! # Motivation
//!
//! Rust does not guarantee tail call optimization. A function that recurses
//! once per logical step overflows the stack for deep inputs. Returning
//! `More` instead of recursing turns that recursion into iteration.
//!
//! # Examples
//!
//! ## Factorial
//!
//! ```rust
//! use fixrt::control::Trampoline;
//!
//! fn factorial(n: u64, accumulator: u64) -> Trampoline<u64> {
//!     if n <= 1 {
//!         Trampoline::done(accumulator)
//!     } else {
//!         Trampoline::suspend(move || factorial(n - 1, n * accumulator))
//!     }
//! }
//!
//! assert_eq!(factorial(20, 1).run(), 2_432_902_008_176_640_000);
//! ```
//!
//! ## Mutual Recursion
//!
//! ```rust
//! use fixrt::control::Trampoline;
//!
//! fn is_even(n: u64) -> Trampoline<bool> {
//!     if n == 0 {
//!         Trampoline::done(true)
//!     } else {
//!         Trampoline::suspend(move || is_odd(n - 1))
//!     }
//! }
//!
//! fn is_odd(n: u64) -> Trampoline<bool> {
//!     if n == 0 {
//!         Trampoline::done(false)
//!     } else {
//!         Trampoline::suspend(move || is_even(n - 1))
//!     }
//! }
//!
//! assert!(is_even(100_000).run());
//! assert!(!is_odd(100_000).run());
//! ```

use std::fmt;

use super::suspension::Suspension;

/// A step of a stack-safe recursive computation.
///
/// A trampoline is either finished (`Done`) or has a deferred next step
/// (`More`). The next step lives in a [`Suspension`], so it is not built until
/// the driver asks for it.
///
/// # Type Parameters
///
/// * `T` - The type of the final result.
///
/// # Non-termination
///
/// A chain of `More` steps that never reaches `Done` makes [`run`](Self::run)
/// loop forever. This is not detected; it is the trampolined form of unbounded
/// recursion.
///
/// # Examples
///
/// ```rust
/// use fixrt::control::{Suspension, Trampoline};
///
/// let trampoline = Trampoline::more(Suspension::new(|| Trampoline::done(42)));
/// assert_eq!(trampoline.run(), 42);
/// ```
pub enum Trampoline<T> {
    /// The computation has completed with a value.
    Done(T),
    /// The computation continues with the step produced by the suspension.
    More(NextStep<T>),
}

/// The deferred next step of a [`Trampoline`].
///
/// Wraps the boxed [`Suspension`] behind `More`. A forced suspension stores
/// the step it produced inline, so a chain of already evaluated steps nests
/// one level per step; dropping a `NextStep` unlinks that chain iteratively.
pub struct NextStep<T> {
    suspension: Option<Box<Suspension<Trampoline<T>>>>,
}

impl<T> NextStep<T> {
    fn new(suspension: Suspension<Trampoline<T>>) -> Self {
        Self {
            suspension: Some(Box::new(suspension)),
        }
    }

    /// Returns whether the next step has already been produced.
    pub fn is_evaluated(&self) -> bool {
        self.suspension
            .as_ref()
            .is_some_and(|suspension| suspension.is_evaluated())
    }
}

impl<T: 'static> NextStep<T> {
    fn into_step(mut self) -> Trampoline<T> {
        match self.suspension.take() {
            Some(suspension) => (*suspension).into_inner(),
            None => unreachable!("a next step is only emptied while it is dropped"),
        }
    }
}

impl<T> Drop for NextStep<T> {
    fn drop(&mut self) {
        let mut pending = self.suspension.take();
        while let Some(mut suspension) = pending {
            pending = match suspension.take_published() {
                Some(Trampoline::More(mut next)) => next.suspension.take(),
                _ => None,
            };
        }
    }
}

impl<T> Trampoline<T> {
    /// Creates a completed trampoline with the given value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fixrt::control::Trampoline;
    ///
    /// assert_eq!(Trampoline::done(42).run(), 42);
    /// ```
    #[inline]
    pub const fn done(value: T) -> Self {
        Self::Done(value)
    }

    /// Alias for [`done`](Self::done).
    #[inline]
    pub const fn pure(value: T) -> Self {
        Self::done(value)
    }

    /// Creates a trampoline that continues with the step produced by `next`.
    #[inline]
    pub fn more(next: Suspension<Self>) -> Self {
        Self::More(NextStep::new(next))
    }

    /// Returns `true` if this is a `Done` step.
    #[inline]
    pub const fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }
}

impl<T: 'static> Trampoline<T> {
    /// Creates a trampoline whose next step is produced by `thunk`.
    ///
    /// Shorthand for `Trampoline::more(Suspension::new(thunk))`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fixrt::control::Trampoline;
    ///
    /// let trampoline = Trampoline::suspend(|| Trampoline::done(42));
    /// assert!(!trampoline.is_done());
    /// assert_eq!(trampoline.run(), 42);
    /// ```
    #[inline]
    pub fn suspend<F>(thunk: F) -> Self
    where
        F: Fn() -> Self + Send + Sync + 'static,
    {
        Self::more(Suspension::new(thunk))
    }

    /// Runs the trampoline to completion and returns the final value.
    ///
    /// Each `More` step is consumed and replaced by the step its suspension
    /// produces, so any number of steps runs in constant stack space.
    ///
    /// # Panics
    ///
    /// Propagates any panic raised while producing a step.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fixrt::control::Trampoline;
    ///
    /// fn count_down(n: u64) -> Trampoline<u64> {
    ///     if n == 0 {
    ///         Trampoline::done(0)
    ///     } else {
    ///         Trampoline::suspend(move || count_down(n - 1))
    ///     }
    /// }
    ///
    /// // This would overflow the stack with regular recursion
    /// assert_eq!(count_down(1_000_000).run(), 0);
    /// ```
    pub fn run(self) -> T {
        let mut current = self;
        let mut steps: u64 = 0;

        loop {
            match current {
                Self::Done(value) => {
                    tracing::trace!(steps, "trampoline finished");
                    return value;
                }
                Self::More(next) => {
                    current = next.into_step();
                    steps += 1;
                }
            }
        }
    }

    /// Advances the trampoline by exactly one step.
    ///
    /// A `Done` trampoline is returned unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fixrt::control::Trampoline;
    ///
    /// let trampoline = Trampoline::suspend(|| Trampoline::suspend(|| Trampoline::done(1)));
    /// let trampoline = trampoline.step();
    /// assert!(!trampoline.is_done());
    /// let trampoline = trampoline.step();
    /// assert!(trampoline.is_done());
    /// assert_eq!(trampoline.run(), 1);
    /// ```
    pub fn step(self) -> Self {
        match self {
            Self::Done(value) => Self::Done(value),
            Self::More(next) => next.into_step(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Trampoline<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Done(value) => formatter.debug_tuple("Done").field(value).finish(),
            Self::More(_) => formatter.debug_tuple("More").field(&"<suspension>").finish(),
        }
    }
}
