//! Distance metrics: how far a candidate sample is from a chord.
//!
//! This module defines the [`DistanceMetric`] trait for pluggable
//! importance scores and the [`MetricKind`] enum for selecting which
//! metric to use at runtime.
//!
//! # Strategy pattern
//!
//! Different metrics rank the same points differently. Vertical distance
//! only looks at the value axis and suits time series where `x` and `y`
//! have unrelated units; Euclidean distance treats both axes alike and
//! suits geometric curves.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{ReduceError, Sample};

/// Selects which distance metric scores candidate points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum MetricKind {
    /// Absolute difference between the candidate's `y` and the chord
    /// interpolated at the candidate's `x`.
    #[default]
    Vertical,

    /// Perpendicular distance from the candidate to the infinite line
    /// through the chord.
    Euclidean,
}

/// Trait for importance scores.
///
/// Input: the two anchors of a chord and a candidate sample between them.
/// Output: a non-negative score; larger means more significant.
pub trait DistanceMetric {
    /// Score `candidate` against the chord from `left` to `right`.
    fn score(&self, left: Sample, right: Sample, candidate: Sample) -> f64;
}

impl DistanceMetric for MetricKind {
    fn score(&self, left: Sample, right: Sample, candidate: Sample) -> f64 {
        match *self {
            Self::Vertical => vertical_distance(left, right, candidate),
            Self::Euclidean => perpendicular_distance(left, right, candidate),
        }
    }
}

impl MetricKind {
    /// All metrics, in declaration order.
    pub const ALL: [Self; 2] = [Self::Vertical, Self::Euclidean];

    /// Lowercase identifier, as accepted by [`FromStr`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Vertical => "vertical",
            Self::Euclidean => "euclidean",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<MetricKind> for &'static str {
    fn from(kind: MetricKind) -> Self {
        kind.name()
    }
}

impl TryFrom<String> for MetricKind {
    type Error = ReduceError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

impl FromStr for MetricKind {
    type Err = ReduceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| {
                ReduceError::InvalidConfiguration(format!(
                    "unknown metric `{s}` (expected `vertical` or `euclidean`)"
                ))
            })
    }
}

/// Vertical distance from `p` to the line through `a` and `b`.
///
/// When `a` and `b` share an `x`, the line value is `a.y`.
fn vertical_distance(a: Sample, b: Sample, p: Sample) -> f64 {
    let dx = b.x - a.x;
    if dx == 0.0 {
        return (p.y - a.y).abs();
    }

    let line_y = (b.y - a.y).mul_add((p.x - a.x) / dx, a.y);
    (p.y - line_y).abs()
}

/// Perpendicular distance from `p` to the line through anchors `a` and `b`.
///
/// The area of the parallelogram spanned by the chord and `a -> p`,
/// divided by the chord length. Coincident anchors fall back to the
/// distance from `p` to `a`.
fn perpendicular_distance(a: Sample, b: Sample, p: Sample) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let length_sq = dx.mul_add(dx, dy * dy);

    if length_sq == 0.0 {
        return p.distance(a);
    }

    let cross = dx.mul_add(a.y - p.y, -(dy * (a.x - p.x)));
    cross.abs() / length_sq.sqrt()
}
