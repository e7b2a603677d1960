//! The evaluation engine: suspensions, trampolines and fixed points.
//!
//! - [`Suspension`]: a memoizing deferred computation, safe to force from
//!   several threads under a documented [`EvaluationPolicy`]
//! - [`Trampoline`]: stack-safe recursion as a `Done`/`More` step machine
//! - [`fix`] and friends: recursive functional values without cyclic wiring
//!
//! `Suspension` is the single substrate for both laziness and stack safety:
//! every `More` step of a trampoline is a suspension, and every body derived
//! by a fixed point is held in one.
//!
//! # Examples
//!
//! ## Lazy Evaluation
//!
//! ```rust
//! use fixrt::control::Suspension;
//!
//! let suspension = Suspension::new(|| 6 * 7);
//! assert!(!suspension.is_evaluated());
//! assert_eq!(*suspension.force(), 42);
//! ```
//!
//! ## Stack-Safe Recursion
//!
//! ```rust
//! use fixrt::control::Trampoline;
//!
//! fn length(items: std::sync::Arc<[u8]>, index: usize) -> Trampoline<usize> {
//!     if index == items.len() {
//!         Trampoline::done(index)
//!     } else {
//!         Trampoline::suspend(move || length(std::sync::Arc::clone(&items), index + 1))
//!     }
//! }
//!
//! let items: std::sync::Arc<[u8]> = vec![0; 100_000].into();
//! assert_eq!(length(items, 0).run(), 100_000);
//! ```

mod fix;
mod policy;
mod suspension;
mod trampoline;

pub use fix::{Action, Function, Predicate, fix, fix_action, fix_predicate, fix_trampoline};
pub use policy::{EvaluationPolicy, UnknownPolicyError};
pub use suspension::Suspension;
pub use trampoline::{NextStep, Trampoline};
