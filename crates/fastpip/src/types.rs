//! Shared types for the fastpip reduction engine.

use serde::{Deserialize, Serialize};

use crate::metric::MetricKind;
use crate::strategy::StrategyKind;

/// A single 2D sample of a curve.
///
/// `x` is usually a timestamp or index and is expected to be
/// non-decreasing across a curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Horizontal position (time, index, ...).
    pub x: f64,
    /// Vertical position (the measured value).
    pub y: f64,
}

impl Sample {
    /// Create a new sample.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another sample.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy).sqrt()
    }
}

impl From<(f64, f64)> for Sample {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<Sample> for (f64, f64) {
    fn from(sample: Sample) -> Self {
        (sample.x, sample.y)
    }
}

/// An ordered sequence of samples, in increasing `x` order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Curve(Vec<Sample>);

impl Curve {
    /// Create a new curve from a vector of samples.
    #[must_use]
    pub const fn new(samples: Vec<Sample>) -> Self {
        Self(samples)
    }

    /// Returns `true` if the curve has no samples.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of samples in the curve.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the first sample, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Sample> {
        self.0.first()
    }

    /// Returns the last sample, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Sample> {
        self.0.last()
    }

    /// Returns a slice of all samples.
    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.0
    }

    /// Consumes the curve and returns the underlying vector of samples.
    #[must_use]
    pub fn into_samples(self) -> Vec<Sample> {
        self.0
    }
}

impl FromIterator<Sample> for Curve {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl FromIterator<(f64, f64)> for Curve {
    fn from_iter<I: IntoIterator<Item = (f64, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(Sample::from).collect())
    }
}

impl From<Vec<Sample>> for Curve {
    fn from(samples: Vec<Sample>) -> Self {
        Self(samples)
    }
}

/// Configuration for a single reduction.
///
/// Every field has a default, so a partial JSON object such as
/// `{"streaming": false}` deserializes into a complete config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReduceConfig {
    /// Reduce incrementally as samples arrive (`true`) or over the whole
    /// curve at once (`false`).
    pub streaming: bool,

    /// Which distance metric scores candidate points.
    pub metric: MetricKind,

    /// Which search strategy finds the extremal scores.
    pub strategy: StrategyKind,
}

impl ReduceConfig {
    /// Default for [`streaming`](Self::streaming).
    pub const DEFAULT_STREAMING: bool = true;

    /// Default for [`metric`](Self::metric).
    pub const DEFAULT_METRIC: MetricKind = MetricKind::Vertical;

    /// Default for [`strategy`](Self::strategy).
    pub const DEFAULT_STRATEGY: StrategyKind = StrategyKind::Fast;

    /// Build a config from metric and strategy identifiers such as
    /// `"euclidean"` or `"simple"`.
    ///
    /// # Errors
    ///
    /// Returns [`ReduceError::InvalidConfiguration`] if either name is
    /// not recognized.
    pub fn from_names(streaming: bool, metric: &str, strategy: &str) -> Result<Self, ReduceError> {
        Ok(Self {
            streaming,
            metric: metric.parse()?,
            strategy: strategy.parse()?,
        })
    }

    /// Batch-mode variant of this config.
    #[must_use]
    pub const fn batch(self) -> Self {
        Self {
            streaming: false,
            ..self
        }
    }

    /// Stream-mode variant of this config.
    #[must_use]
    pub const fn streaming(self) -> Self {
        Self {
            streaming: true,
            ..self
        }
    }

    /// This config with a different metric.
    #[must_use]
    pub const fn with_metric(self, metric: MetricKind) -> Self {
        Self { metric, ..self }
    }

    /// This config with a different strategy.
    #[must_use]
    pub const fn with_strategy(self, strategy: StrategyKind) -> Self {
        Self { strategy, ..self }
    }
}

impl Default for ReduceConfig {
    fn default() -> Self {
        Self {
            streaming: Self::DEFAULT_STREAMING,
            metric: Self::DEFAULT_METRIC,
            strategy: Self::DEFAULT_STRATEGY,
        }
    }
}

/// Errors that can occur when reducing a curve.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReduceError {
    /// An argument is out of range (e.g. a non-positive target count).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A metric or strategy identifier was not recognized.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}
