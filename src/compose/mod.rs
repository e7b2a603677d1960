//! Combinator adapters for functional values.
//!
//! The engine in [`control`](crate::control) evaluates functional values; the
//! adapters in this module only rewire their shape. They are the primary
//! clients of the engine: a recursive predicate built with
//! [`fix_predicate`](crate::control::fix_predicate) can be negated, combined
//! or curried here without touching how it evaluates.
//!
//! # Overview
//!
//! - [`identity`], [`constant`]: the I and K combinators
//! - [`compose`], [`pipe`]: right-to-left and left-to-right composition
//! - [`flip`]: swaps the arguments of a binary function
//! - [`curry`], [`uncurry`]: binary functions to and from curried form
//! - [`gather`], [`spread`]: binary functions to and from pair-taking form
//! - [`zip`]: fans one input out to two functions
//! - [`apply`]: fixes an argument, producing a thunk
//! - [`share`]: moves a closure behind a [`Function`](crate::control::Function)
//! - [`negate`], [`both`], [`either`]: predicate combinators
//!
//! # Laws
//!
//! - **Associativity**: `compose(f, compose(g, h)) == compose(compose(f, g), h)`
//! - **Identity**: `compose(identity, f) == f == compose(f, identity)`
//! - **Pipe**: `pipe(f, g) == compose(g, f)`
//! - **Double Flip**: `flip(flip(f)) == f`
//! - **Curry**: `uncurry(curry(f)) == f`, `spread(gather(f)) == f`
//!
//! # Examples
//!
//! ```
//! use fixrt::compose::{compose, negate};
//! use fixrt::control::{Function, Trampoline, fix_predicate};
//! use std::sync::Arc;
//!
//! let is_even = fix_predicate(|this: Function<u32, Trampoline<bool>>| -> Function<u32, Trampoline<bool>> {
//!     Arc::new(move |n| match n {
//!         0 => Trampoline::done(true),
//!         1 => Trampoline::done(false),
//!         _ => {
//!             let this = Arc::clone(&this);
//!             Trampoline::suspend(move || this(n - 2))
//!         }
//!     })
//! });
//!
//! let is_odd = negate(move |n: u32| is_even(n));
//! let odd_successor = compose(is_odd, |n: u32| n + 1);
//! assert!(odd_successor(10));
//! assert!(!odd_successor(11));
//! ```

mod adapters;

pub use adapters::{
    apply, both, compose, constant, curry, either, flip, gather, identity, negate, pipe, share,
    spread, uncurry, zip,
};
