//! # fixrt
//!
//! A small functional-programming runtime: memoizing suspensions, stack-safe
//! trampolines and fixed-point combinators.
//!
//! ## Overview
//!
//! - **Suspensions**: deferred computations evaluated at most once and cached,
//!   safe to force concurrently under a documented evaluation policy
//! - **Trampolines**: recursion expressed as `Done`/`More` steps and driven by
//!   a loop, so depth never grows the native stack
//! - **Fixed points**: recursive transformers, predicates and actions built
//!   from an operator that receives a deferred handle to itself
//! - **Adapters**: compose, pipe, flip, curry, gather/spread, zip, apply
//!
//! ## Feature Flags
//!
//! - `control`: Suspension, Trampoline and the fixed-point combinators
//! - `compose`: Combinator adapters
//! - `serde`: `Serialize`/`Deserialize` for `EvaluationPolicy`
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use fixrt::prelude::*;
//! use std::sync::Arc;
//!
//! let count = fix_trampoline(
//!     |this: Function<(u64, u64), Trampoline<u64>>| -> Function<(u64, u64), Trampoline<u64>> {
//!         Arc::new(move |(remaining, seen)| {
//!             if remaining == 0 {
//!                 Trampoline::done(seen)
//!             } else {
//!                 let this = Arc::clone(&this);
//!                 Trampoline::suspend(move || this((remaining - 1, seen + 1)))
//!             }
//!         })
//!     },
//! );
//!
//! assert_eq!(count((1_000_000, 0)), 1_000_000);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use fixrt::prelude::*;
/// ```
pub mod prelude {
    #[cfg(feature = "compose")]
    pub use crate::compose::*;

    #[cfg(feature = "control")]
    pub use crate::control::*;
}

#[cfg(feature = "control")]
pub mod control;

#[cfg(feature = "compose")]
pub mod compose;
