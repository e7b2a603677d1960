//! Evaluation policies for forcing a shared [`Suspension`](super::Suspension).
//!
//! A suspension forced from several threads at once must still publish a
//! single value. There are two admissible ways to get there, and the choice is
//! part of the suspension's contract rather than an implementation detail:
//!
//! - [`EvaluationPolicy::Locked`]: the first forcer runs the producer while
//!   holding an exclusive lock. Every other forcer blocks until the value is
//!   published. A successful producer runs at most once.
//! - [`EvaluationPolicy::Racy`]: forcers run the producer without holding any
//!   lock. The first value published wins and every caller observes it. The
//!   producer may run more than once, so it must be pure.
//!
//! # Examples
//!
//! ```rust
//! use fixrt::control::EvaluationPolicy;
//!
//! let policy: EvaluationPolicy = "racy".parse().unwrap();
//! assert_eq!(policy, EvaluationPolicy::Racy);
//! assert_eq!(EvaluationPolicy::default(), EvaluationPolicy::Locked);
//! assert_eq!(EvaluationPolicy::Locked.to_string(), "locked");
//! ```

use std::fmt;
use std::str::FromStr;

/// How concurrent forcers of one suspension coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum EvaluationPolicy {
    /// The producer runs under an exclusive lock; other forcers wait.
    #[default]
    Locked,
    /// The producer may run concurrently; the first published value wins.
    Racy,
}

impl EvaluationPolicy {
    /// Returns the lowercase name of the policy.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Locked => "locked",
            Self::Racy => "racy",
        }
    }
}

impl fmt::Display for EvaluationPolicy {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

/// Error returned when parsing an unknown [`EvaluationPolicy`] name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPolicyError {
    name: String,
}

impl UnknownPolicyError {
    /// The name that failed to parse.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for UnknownPolicyError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "unknown evaluation policy `{}` (expected `locked` or `racy`)",
            self.name
        )
    }
}

impl std::error::Error for UnknownPolicyError {}

impl FromStr for EvaluationPolicy {
    type Err = UnknownPolicyError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        match source.trim().to_ascii_lowercase().as_str() {
            "locked" => Ok(Self::Locked),
            "racy" => Ok(Self::Racy),
            _ => Err(UnknownPolicyError {
                name: source.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("locked", EvaluationPolicy::Locked)]
    #[case("racy", EvaluationPolicy::Racy)]
    #[case("  Racy ", EvaluationPolicy::Racy)]
    #[case("LOCKED", EvaluationPolicy::Locked)]
    fn test_policy_parses_known_names(#[case] source: &str, #[case] expected: EvaluationPolicy) {
        assert_eq!(source.parse::<EvaluationPolicy>(), Ok(expected));
    }

    #[rstest]
    fn test_policy_rejects_unknown_name() {
        let error = "eager".parse::<EvaluationPolicy>().unwrap_err();
        assert_eq!(error.name(), "eager");
        assert!(error.to_string().contains("`eager`"));
    }

    #[rstest]
    fn test_policy_display_round_trips() {
        for policy in [EvaluationPolicy::Locked, EvaluationPolicy::Racy] {
            assert_eq!(policy.to_string().parse::<EvaluationPolicy>(), Ok(policy));
        }
    }
}
