//! Shape adapters for functional values.
//!
//! Every adapter here takes functions and returns a function of a different
//! shape (arity, argument order, tupling) with the same evaluation semantics.
//! None of them hold state beyond the functions they capture, and none of them
//! can fail.

use std::sync::Arc;

use crate::control::Function;

/// Returns the value unchanged.
///
/// The identity function is the unit of [`compose`]:
/// `compose(identity, f)` and `compose(f, identity)` both behave as `f`.
///
/// # Examples
///
/// ```
/// use fixrt::compose::identity;
///
/// assert_eq!(identity(42), 42);
/// assert_eq!(identity("hello"), "hello");
/// ```
#[inline]
pub fn identity<T>(value: T) -> T {
    value
}

/// Creates a function that ignores its input and returns a clone of `value`.
///
/// # Examples
///
/// ```
/// use fixrt::compose::constant;
///
/// let zeros: Vec<i32> = vec![1, 2, 3].into_iter().map(constant(0)).collect();
/// assert_eq!(zeros, vec![0, 0, 0]);
/// ```
#[inline]
pub fn constant<T: Clone, U>(value: T) -> impl Fn(U) -> T {
    move |_| value.clone()
}

/// Composes two functions right to left: `compose(f, g)(x) == f(g(x))`.
///
/// # Examples
///
/// ```
/// use fixrt::compose::compose;
///
/// let add_one = |x: i32| x + 1;
/// let double = |x: i32| x * 2;
///
/// assert_eq!(compose(add_one, double)(5), 11);
/// ```
#[inline]
pub fn compose<A, B, C, F, G>(outer: F, inner: G) -> impl Fn(A) -> C
where
    F: Fn(B) -> C,
    G: Fn(A) -> B,
{
    move |input| outer(inner(input))
}

/// Composes two functions left to right: `pipe(f, g)(x) == g(f(x))`.
///
/// # Examples
///
/// ```
/// use fixrt::compose::pipe;
///
/// let add_one = |x: i32| x + 1;
/// let double = |x: i32| x * 2;
///
/// assert_eq!(pipe(add_one, double)(5), 12);
/// ```
#[inline]
pub fn pipe<A, B, C, F, G>(first: F, second: G) -> impl Fn(A) -> C
where
    F: Fn(A) -> B,
    G: Fn(B) -> C,
{
    move |input| second(first(input))
}

/// Swaps the arguments of a binary function: `flip(f)(b, a) == f(a, b)`.
///
/// # Examples
///
/// ```
/// use fixrt::compose::flip;
///
/// let subtract = |minuend: i32, subtrahend: i32| minuend - subtrahend;
/// assert_eq!(flip(subtract)(3, 10), 7);
/// ```
#[inline]
pub fn flip<A, B, C, F>(function: F) -> impl Fn(B, A) -> C
where
    F: Fn(A, B) -> C,
{
    move |second_argument, first_argument| function(first_argument, second_argument)
}

/// Converts a binary function into a function returning a [`Function`].
///
/// The first argument is cloned into each partial application, so a partial
/// application can be called any number of times.
///
/// # Examples
///
/// ```
/// use fixrt::compose::curry;
///
/// let add = curry(|first: i32, second: i32| first + second);
/// let add_five = add(5);
/// assert_eq!(add_five(3), 8);
/// assert_eq!(add_five(10), 15);
/// ```
pub fn curry<A, B, C, F>(function: F) -> Function<A, Function<B, C>>
where
    A: Clone + Send + Sync + 'static,
    B: 'static,
    C: 'static,
    F: Fn(A, B) -> C + Send + Sync + 'static,
{
    let function = Arc::new(function);
    Arc::new(move |first: A| -> Function<B, C> {
        let function = Arc::clone(&function);
        Arc::new(move |second| function(first.clone(), second))
    })
}

/// Converts a curried function back into a binary one:
/// `uncurry(f)(a, b) == f(a)(b)`.
///
/// # Examples
///
/// ```
/// use fixrt::compose::{curry, uncurry};
///
/// let multiply = uncurry(|first: i32| move |second: i32| first * second);
/// assert_eq!(multiply(6, 7), 42);
///
/// // Shared functions are called through closures.
/// let curried = curry(|first: i32, second: i32| first - second);
/// let subtract = uncurry(move |first: i32| {
///     let partial = curried(first);
///     move |second: i32| partial(second)
/// });
/// assert_eq!(subtract(10, 4), 6);
/// ```
#[inline]
pub fn uncurry<A, B, C, G, F>(function: F) -> impl Fn(A, B) -> C
where
    F: Fn(A) -> G,
    G: Fn(B) -> C,
{
    move |first, second| function(first)(second)
}

/// Turns a binary function into one taking a pair.
///
/// # Examples
///
/// ```
/// use fixrt::compose::gather;
///
/// let add = gather(|first: i32, second: i32| first + second);
/// assert_eq!(add((2, 3)), 5);
/// ```
#[inline]
pub fn gather<A, B, C, F>(function: F) -> impl Fn((A, B)) -> C
where
    F: Fn(A, B) -> C,
{
    move |(first, second)| function(first, second)
}

/// Turns a function taking a pair into a binary function. Inverse of [`gather`].
///
/// # Examples
///
/// ```
/// use fixrt::compose::spread;
///
/// let add = spread(|(first, second): (i32, i32)| first + second);
/// assert_eq!(add(2, 3), 5);
/// ```
#[inline]
pub fn spread<A, B, C, F>(function: F) -> impl Fn(A, B) -> C
where
    F: Fn((A, B)) -> C,
{
    move |first, second| function((first, second))
}

/// Applies two functions to the same input and pairs the results.
///
/// # Examples
///
/// ```
/// use fixrt::compose::zip;
///
/// let stats = zip(|text: String| text.len(), |text: String| text.to_uppercase());
/// assert_eq!(stats("abc".to_string()), (3, "ABC".to_string()));
/// ```
#[inline]
pub fn zip<A, B, C, F, G>(left: F, right: G) -> impl Fn(A) -> (B, C)
where
    A: Clone,
    F: Fn(A) -> B,
    G: Fn(A) -> C,
{
    move |input: A| (left(input.clone()), right(input))
}

/// Fixes the argument of a function, producing a zero-argument thunk.
///
/// # Examples
///
/// ```
/// use fixrt::compose::apply;
///
/// let thunk = apply(|n: u32| n * n, 12);
/// assert_eq!(thunk(), 144);
/// ```
#[inline]
pub fn apply<A, B, F>(function: F, argument: A) -> impl Fn() -> B
where
    A: Clone,
    F: Fn(A) -> B,
{
    move || function(argument.clone())
}

/// Moves a closure behind a shareable [`Function`].
///
/// # Examples
///
/// ```
/// use fixrt::compose::share;
/// use fixrt::control::Function;
///
/// let square: Function<i32, i32> = share(|n: i32| n * n);
/// let alias = square.clone();
/// assert_eq!(alias(9), 81);
/// ```
#[inline]
pub fn share<A, B, F>(function: F) -> Function<A, B>
where
    F: Fn(A) -> B + Send + Sync + 'static,
{
    Arc::new(function)
}

/// Negates a predicate.
///
/// # Examples
///
/// ```
/// use fixrt::compose::negate;
///
/// let is_odd = negate(|n: u32| n % 2 == 0);
/// assert!(is_odd(3));
/// ```
#[inline]
pub fn negate<A, P>(predicate: P) -> impl Fn(A) -> bool
where
    P: Fn(A) -> bool,
{
    move |input| !predicate(input)
}

/// Conjunction of two predicates. `right` is not evaluated when `left` fails.
///
/// # Examples
///
/// ```
/// use fixrt::compose::both;
///
/// let small_even = both(|n: u32| n % 2 == 0, |n: u32| n < 10);
/// assert!(small_even(4));
/// assert!(!small_even(12));
/// ```
#[inline]
pub fn both<A, P, Q>(left: P, right: Q) -> impl Fn(A) -> bool
where
    A: Clone,
    P: Fn(A) -> bool,
    Q: Fn(A) -> bool,
{
    move |input: A| left(input.clone()) && right(input)
}

/// Disjunction of two predicates. `right` is not evaluated when `left` holds.
///
/// # Examples
///
/// ```
/// use fixrt::compose::either;
///
/// let edge = either(|n: i32| n == 0, |n: i32| n == 100);
/// assert!(edge(100));
/// assert!(!edge(50));
/// ```
#[inline]
pub fn either<A, P, Q>(left: P, right: Q) -> impl Fn(A) -> bool
where
    A: Clone,
    P: Fn(A) -> bool,
    Q: Fn(A) -> bool,
{
    move |input: A| left(input.clone()) || right(input)
}
