//! Fixed-point combinators for recursive functional values.
//!
//! [`fix`] builds a function `f` satisfying `f = operator(f)` without wiring
//! a cyclic reference. The operator receives a *self proxy*: a function that,
//! when called, derives the fixed point again and delegates the call to it.
//! The self-reference is therefore deferred to call time rather than unrolled
//! at construction, and `fix` itself does no work.
//!
//! Deep recursion should go through the [`Trampoline`]-aware variants
//! ([`fix_trampoline`], [`fix_predicate`], [`fix_action`]): the operator
//! returns `More` steps for recursive calls, and the resulting function drives
//! them in a loop.
//!
//! # Examples
//!
//! ```rust
//! use fixrt::control::{Function, fix};
//! use std::sync::Arc;
//!
//! let factorial = fix(|this: Function<u64, u64>| -> Function<u64, u64> {
//!     Arc::new(move |n| if n <= 1 { 1 } else { n * this(n - 1) })
//! });
//!
//! assert_eq!(factorial(5), 120);
//! ```

use std::sync::Arc;

use super::suspension::Suspension;
use super::trampoline::Trampoline;

/// A shareable one-argument function.
pub type Function<A, B> = Arc<dyn Fn(A) -> B + Send + Sync>;

/// A shareable single-argument predicate.
pub type Predicate<A> = Function<A, bool>;

/// A shareable single-argument side-effecting action.
pub type Action<A> = Function<A, ()>;

type Operator<A, B> = Arc<dyn Fn(Function<A, B>) -> Function<A, B> + Send + Sync>;

/// Returns the fixed point of `operator`.
///
/// The returned function behaves as `operator(f)` where `f` is the returned
/// function itself. `operator` is not invoked until the returned function is
/// first called; the derived body is memoized for the lifetime of that value.
/// Each recursive call through the self proxy derives a fresh body.
///
/// Recursion through the self proxy uses the native stack. Use
/// [`fix_trampoline`] when recursion depth is unbounded.
///
/// # Examples
///
/// ```rust
/// use fixrt::control::{Function, fix};
/// use std::sync::Arc;
///
/// let fibonacci = fix(|this: Function<u32, u64>| -> Function<u32, u64> {
///     Arc::new(move |n| if n < 2 { u64::from(n) } else { this(n - 1) + this(n - 2) })
/// });
///
/// assert_eq!(fibonacci(10), 55);
/// ```
pub fn fix<A, B, O>(operator: O) -> Function<A, B>
where
    A: 'static,
    B: 'static,
    O: Fn(Function<A, B>) -> Function<A, B> + Send + Sync + 'static,
{
    derive(Arc::new(operator))
}

fn derive<A: 'static, B: 'static>(operator: Operator<A, B>) -> Function<A, B> {
    let body = Suspension::new(move || operator(self_proxy(Arc::clone(&operator))));
    Arc::new(move |argument| (body.force())(argument))
}

fn self_proxy<A: 'static, B: 'static>(operator: Operator<A, B>) -> Function<A, B> {
    Arc::new(move |argument| derive(Arc::clone(&operator))(argument))
}

/// Returns the fixed point of a trampolined `operator`, driven to completion.
///
/// The operator works over step-returning functions: recursive calls should be
/// wrapped in [`Trampoline::suspend`] so that each one becomes a `More` step
/// instead of a native call. The returned function runs the trampoline on
/// every invocation, so recursion depth is bounded only by time.
///
/// # Examples
///
/// ```rust
/// use fixrt::control::{Function, Trampoline, fix_trampoline};
/// use std::sync::Arc;
///
/// let sum_to = fix_trampoline(
///     |this: Function<(u64, u64), Trampoline<u64>>| -> Function<(u64, u64), Trampoline<u64>> {
///         Arc::new(move |(n, total)| {
///             if n == 0 {
///                 Trampoline::done(total)
///             } else {
///                 let this = Arc::clone(&this);
///                 Trampoline::suspend(move || this((n - 1, total + n)))
///             }
///         })
///     },
/// );
///
/// assert_eq!(sum_to((100_000, 0)), 5_000_050_000);
/// ```
pub fn fix_trampoline<A, B, O>(operator: O) -> Function<A, B>
where
    A: 'static,
    B: 'static,
    O: Fn(Function<A, Trampoline<B>>) -> Function<A, Trampoline<B>> + Send + Sync + 'static,
{
    let stepper = fix(operator);
    Arc::new(move |argument| stepper(argument).run())
}

/// Returns the fixed point of a trampolined predicate operator.
///
/// # Examples
///
/// ```rust
/// use fixrt::control::{Function, Trampoline, fix_predicate};
/// use std::sync::Arc;
///
/// let is_even = fix_predicate(|this: Function<u64, Trampoline<bool>>| -> Function<u64, Trampoline<bool>> {
///     Arc::new(move |n| match n {
///         0 => Trampoline::done(true),
///         1 => Trampoline::done(false),
///         _ => {
///             let this = Arc::clone(&this);
///             Trampoline::suspend(move || this(n - 2))
///         }
///     })
/// });
///
/// assert!(is_even(100_000));
/// assert!(!is_even(100_001));
/// ```
pub fn fix_predicate<A, O>(operator: O) -> Predicate<A>
where
    A: 'static,
    O: Fn(Function<A, Trampoline<bool>>) -> Function<A, Trampoline<bool>> + Send + Sync + 'static,
{
    fix_trampoline(operator)
}

/// Returns the fixed point of a trampolined side-effecting action operator.
///
/// The action's effects happen while the trampoline runs; the terminal step
/// carries `()`.
///
/// # Examples
///
/// ```rust
/// use fixrt::control::{Function, Trampoline, fix_action};
/// use std::sync::{Arc, Mutex};
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
/// let count_down = fix_action(move |this: Function<u32, Trampoline<()>>| -> Function<u32, Trampoline<()>> {
///     let sink = Arc::clone(&sink);
///     Arc::new(move |n| {
///         sink.lock().unwrap().push(n);
///         if n == 0 {
///             Trampoline::done(())
///         } else {
///             let this = Arc::clone(&this);
///             Trampoline::suspend(move || this(n - 1))
///         }
///     })
/// });
///
/// count_down(3);
/// assert_eq!(*seen.lock().unwrap(), vec![3, 2, 1, 0]);
/// ```
pub fn fix_action<A, O>(operator: O) -> Action<A>
where
    A: 'static,
    O: Fn(Function<A, Trampoline<()>>) -> Function<A, Trampoline<()>> + Send + Sync + 'static,
{
    fix_trampoline(operator)
}
