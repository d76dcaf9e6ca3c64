//! Search strategies for repeatedly finding the most (batch) or least
//! (stream) significant point.
//!
//! Both strategies produce the same selection; they differ only in the
//! data structures used to find extremal scores.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::ReduceError;

/// Selects how extremal importance scores are found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum StrategyKind {
    /// Priority queues with targeted rescoring. O(n log n).
    #[default]
    Fast,

    /// Direct rescans on every step. O(n * N); the reference
    /// implementation the fast strategy is checked against.
    Simple,
}

impl StrategyKind {
    /// All strategies, in declaration order.
    pub const ALL: [Self; 2] = [Self::Fast, Self::Simple];

    /// Lowercase identifier, as accepted by [`FromStr`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Simple => "simple",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<StrategyKind> for &'static str {
    fn from(kind: StrategyKind) -> Self {
        kind.name()
    }
}

impl TryFrom<String> for StrategyKind {
    type Error = ReduceError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

impl FromStr for StrategyKind {
    type Err = ReduceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| {
                ReduceError::InvalidConfiguration(format!(
                    "unknown strategy `{s}` (expected `fast` or `simple`)"
                ))
            })
    }
}
