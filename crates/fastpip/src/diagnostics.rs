//! Reduction diagnostics: timing and counts for a single call.
//!
//! Intended for tuning the choice of mode, metric and strategy on real
//! data. Time is read through the [`Clock`] trait so the crate itself
//! stays free of platform timing APIs; callers supply
//! `std::time::Instant` on native targets or a fake clock in tests.
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since `std::time::Duration` does not implement serde
//! traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::{Curve, ReduceConfig, ReduceError, Sample};

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Source of monotonic timestamps.
pub trait Clock {
    /// Opaque timestamp type.
    type Instant;

    /// Current timestamp.
    fn now(&self) -> Self::Instant;

    /// Time elapsed since `since`.
    fn elapsed(&self, since: &Self::Instant) -> Duration;
}

/// Diagnostics collected from a single reduction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReduceDiagnostics {
    /// Configuration the reduction ran with.
    pub config: ReduceConfig,
    /// Requested target, as passed by the caller.
    pub requested_target: f64,
    /// Point count the target was floored to.
    pub effective_target: usize,
    /// Number of input samples.
    pub input_len: usize,
    /// Number of output samples.
    pub output_len: usize,
    /// Whether the input was returned unchanged without reducing.
    pub pass_through: bool,
    /// Wall-clock duration of the call (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
}

impl ReduceDiagnostics {
    /// Fraction of input samples that were kept (`1.0` for empty input).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn retention(&self) -> f64 {
        if self.input_len == 0 {
            return 1.0;
        }
        self.output_len as f64 / self.input_len as f64
    }

    /// Format as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mode = if self.config.streaming {
            "stream"
        } else {
            "batch"
        };
        let mut lines = vec![format!("Reduction Diagnostics\n{}", "=".repeat(40))];
        lines.push(format!(
            "Mode: {mode}  Metric: {}  Strategy: {}",
            self.config.metric, self.config.strategy,
        ));
        lines.push(format!(
            "Samples: {} -> {} ({:.1}% kept, target {} floored to {})",
            self.input_len,
            self.output_len,
            self.retention() * 100.0,
            self.requested_target,
            self.effective_target,
        ));
        if self.pass_through {
            lines.push("Input already within target; returned unchanged".to_string());
        }
        lines.push(format!(
            "Duration: {:.3}ms",
            self.duration.as_secs_f64() * 1000.0
        ));
        lines.join("\n")
    }
}

/// Run [`reduce`](crate::reduce) and collect [`ReduceDiagnostics`].
///
/// # Errors
///
/// Same as [`reduce`](crate::reduce); no diagnostics are produced for a
/// rejected call.
pub fn reduce_with_diagnostics<C: Clock>(
    samples: &[Sample],
    target: f64,
    config: &ReduceConfig,
    clock: &C,
) -> Result<(Curve, ReduceDiagnostics), ReduceError> {
    let effective_target = crate::target_count(target)?;
    let start = clock.now();
    let curve = crate::reduce(samples, target, config)?;
    let duration = clock.elapsed(&start);

    let diagnostics = ReduceDiagnostics {
        config: *config,
        requested_target: target,
        effective_target,
        input_len: samples.len(),
        output_len: curve.len(),
        pass_through: curve.len() == samples.len(),
        duration,
    };
    Ok((curve, diagnostics))
}
