//! fastpip: segmentation based on turning points (sans-IO).
//!
//! Reduces a long ordered sequence of `(x, y)` samples to a subsequence
//! of `N` perceptually important points: the peaks, troughs and
//! inflections that carry the shape of the curve. Typical use is cutting
//! a time series down before plotting or pattern matching.
//!
//! Two modes are available:
//!
//! - **batch** (`streaming = false`): globally best selection over the
//!   whole curve, see [`batch`].
//! - **stream** (`streaming = true`, the default): a bounded window that
//!   only ever looks at local neighbors, see [`stream`] and
//!   [`StreamReducer`].
//!
//! Each mode runs under either search [`StrategyKind`] and either
//! [`MetricKind`].
//!
//! # Preconditions
//!
//! Samples must be in non-decreasing `x` order. This is not checked and
//! unsorted input is never reordered; chord distances over revisited `x`
//! positions simply produce a poor segmentation.
//!
//! This crate has **no I/O dependencies** and keeps no state between
//! calls.

pub mod batch;
pub mod diagnostics;
mod heap;
pub mod metric;
pub mod strategy;
pub mod stream;
mod topology;
pub mod types;

pub use diagnostics::{Clock, ReduceDiagnostics};
pub use metric::{DistanceMetric, MetricKind};
pub use strategy::StrategyKind;
pub use stream::StreamReducer;
pub use types::{Curve, ReduceConfig, ReduceError, Sample};

/// Reduce `samples` to at most `target` perceptually important points.
///
/// Returns the input unchanged (as a new [`Curve`]) when it already has
/// at most `target` samples. Otherwise the result has exactly
/// `floor(target)` samples, starts and ends with the input's endpoints
/// and preserves input order.
///
/// # Errors
///
/// Returns [`ReduceError::InvalidArgument`] if `target` is not a
/// positive number, or if a reduction is needed but `floor(target) < 2`
/// (both endpoints are always kept).
///
/// # Example
///
/// ```
/// use fastpip::{ReduceConfig, Sample, reduce};
///
/// let samples: Vec<Sample> = [(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 1.0), (4.0, 0.0)]
///     .into_iter()
///     .map(Sample::from)
///     .collect();
/// let reduced = reduce(&samples, 3.0, &ReduceConfig::default().batch())?;
/// assert_eq!(
///     reduced.samples(),
///     &[Sample::new(0.0, 0.0), Sample::new(2.0, 2.0), Sample::new(4.0, 0.0)],
/// );
/// # Ok::<(), fastpip::ReduceError>(())
/// ```
pub fn reduce(
    samples: &[Sample],
    target: f64,
    config: &ReduceConfig,
) -> Result<Curve, ReduceError> {
    reduce_by(samples, target, config, |s| *s).map(Curve::new)
}

/// Reduce a sequence of arbitrary items, locating each one with
/// `project`.
///
/// Items are cloned into the result untouched. `project` is only called
/// when a reduction actually happens, so pass-through inputs may carry
/// payloads that have no meaningful position.
///
/// # Errors
///
/// Same as [`reduce`].
pub fn reduce_by<T, F>(
    items: &[T],
    target: f64,
    config: &ReduceConfig,
    project: F,
) -> Result<Vec<T>, ReduceError>
where
    T: Clone,
    F: Fn(&T) -> Sample,
{
    let indices = select_indices_by(items, target, config, project)?;
    Ok(indices.into_iter().map(|i| items[i].clone()).collect())
}

/// Indices of the samples [`reduce`] would keep, in increasing order.
///
/// # Errors
///
/// Same as [`reduce`].
pub fn select_indices(
    samples: &[Sample],
    target: f64,
    config: &ReduceConfig,
) -> Result<Vec<usize>, ReduceError> {
    select_indices_by(samples, target, config, |s| *s)
}

fn select_indices_by<T, F>(
    items: &[T],
    target: f64,
    config: &ReduceConfig,
    project: F,
) -> Result<Vec<usize>, ReduceError>
where
    F: Fn(&T) -> Sample,
{
    let count = target_count(target)?;
    if items.len() <= count {
        tracing::trace!(len = items.len(), requested = target, "input already within target");
        return Ok((0..items.len()).collect());
    }
    if count < 2 {
        return Err(ReduceError::InvalidArgument(format!(
            "target count {target} cannot keep both endpoints of a {}-sample curve",
            items.len()
        )));
    }

    let samples: Vec<Sample> = items.iter().map(project).collect();
    tracing::debug!(
        len = samples.len(),
        count,
        streaming = config.streaming,
        metric = %config.metric,
        strategy = %config.strategy,
        "reducing curve",
    );

    Ok(if config.streaming {
        stream::select(&samples, count, config.metric, config.strategy)
    } else {
        batch::select(&samples, count, config.metric, config.strategy)
    })
}

/// Validate a real-valued target and floor it to a point count.
///
/// Targets too large for `usize` saturate, which always means "keep
/// everything".
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn target_count(target: f64) -> Result<usize, ReduceError> {
    if target.is_nan() || target <= 0.0 {
        return Err(ReduceError::InvalidArgument(format!(
            "target count must be positive, got {target}"
        )));
    }
    Ok(target.floor() as usize)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn curve(points: &[(f64, f64)]) -> Vec<Sample> {
        points.iter().copied().map(Sample::from).collect()
    }

    fn tent() -> Vec<Sample> {
        curve(&[
            (0.0, 0.0),
            (1.0, 1.0),
            (2.0, 2.0),
            (3.0, 3.0),
            (4.0, 4.0),
            (5.0, 3.0),
            (6.0, 2.0),
            (7.0, 1.0),
            (8.0, 0.0),
        ])
    }

    #[test]
    fn target_count_floors() {
        assert_eq!(target_count(3.0).unwrap(), 3);
        assert_eq!(target_count(3.9).unwrap(), 3);
        assert_eq!(target_count(0.5).unwrap(), 0);
        assert_eq!(target_count(f64::INFINITY).unwrap(), usize::MAX);
    }

    #[test]
    fn target_count_rejects_non_positive() {
        for target in [0.0, -0.0, -3.0, f64::NAN, f64::NEG_INFINITY] {
            assert!(
                matches!(target_count(target), Err(ReduceError::InvalidArgument(_))),
                "{target} should be rejected"
            );
        }
    }

    #[test]
    fn empty_input_is_identity() {
        let result = reduce(&[], 5.0, &ReduceConfig::default()).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn non_positive_target_fails_even_for_empty_input() {
        let err = reduce(&[], 0.0, &ReduceConfig::default()).unwrap_err();
        assert!(matches!(err, ReduceError::InvalidArgument(_)));
    }

    #[test]
    fn fractional_target_is_floored() {
        let config = ReduceConfig::default().batch();
        let reduced = reduce(&tent(), 3.7, &config).unwrap();
        assert_eq!(reduced.len(), 3);
        let same_len = reduce(&tent(), 9.5, &config).unwrap();
        assert_eq!(same_len.samples(), tent().as_slice());
    }

    #[test]
    fn target_below_two_with_reduction_needed_fails() {
        let err = reduce(&tent(), 1.0, &ReduceConfig::default()).unwrap_err();
        assert!(matches!(err, ReduceError::InvalidArgument(_)));
        // A single sample fits a target of one.
        let single = curve(&[(1.0, 1.0)]);
        assert_eq!(
            reduce(&single, 1.0, &ReduceConfig::default()).unwrap().samples(),
            single.as_slice()
        );
    }

    #[test]
    fn select_indices_matches_reduce() {
        let config = ReduceConfig::default();
        let indices = select_indices(&tent(), 3.0, &config).unwrap();
        assert_eq!(indices, vec![0, 4, 8]);
        let reduced = reduce(&tent(), 3.0, &config).unwrap();
        let picked: Vec<Sample> = indices.iter().map(|&i| tent()[i]).collect();
        assert_eq!(reduced.samples(), picked.as_slice());
    }

    #[test]
    fn reduce_by_never_projects_pass_through_items() {
        let items: Vec<(u8, char)> = (0..10).zip("qwertasdfg".chars()).collect();
        let result = reduce_by(&items, 50.0, &ReduceConfig::default(), |_| {
            unreachable!("pass-through must not locate items")
        })
        .unwrap();
        assert_eq!(result, items);
    }

    #[test]
    fn reduce_by_keeps_payloads() {
        let items: Vec<(f64, f64, &str)> = tent()
            .iter()
            .enumerate()
            .map(|(i, s)| (s.x, s.y, ["a", "b", "c", "d", "e", "f", "g", "h", "i"][i]))
            .collect();
        let result = reduce_by(&items, 3.0, &ReduceConfig::default(), |&(x, y, _)| {
            Sample::new(x, y)
        })
        .unwrap();
        let labels: Vec<&str> = result.iter().map(|&(_, _, l)| l).collect();
        assert_eq!(labels, vec!["a", "e", "i"]);
    }
}
