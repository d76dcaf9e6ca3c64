//! Batch reduction: recursive worst-fit splitting over the whole curve.
//!
//! Starting from the two endpoints, repeatedly find, across every
//! interval between adjacent retained points, the interior point that is
//! farthest from its interval's chord, and keep it. This is
//! Douglas-Peucker driven by a fixed output size instead of a tolerance,
//! so every step keeps the globally most significant remaining point.
//!
//! Ties go to the higher score, then to the earlier input index.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::metric::{DistanceMetric, MetricKind};
use crate::strategy::StrategyKind;
use crate::topology::Topology;
use crate::types::Sample;

/// The best interior point of one retained interval.
#[derive(Debug, Clone, Copy)]
struct Split {
    score: f64,
    index: usize,
    left: usize,
    right: usize,
}

impl PartialEq for Split {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Split {}

impl PartialOrd for Split {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Split {
    /// Greater means "split here first": higher score, then lower index.
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.index.cmp(&self.index))
    }
}

/// Select the indices of `target` significant samples.
///
/// Returns every index when `samples` already has at most `target`
/// elements. `target` is raised to 2 since both endpoints are always kept.
#[must_use]
pub fn select(
    samples: &[Sample],
    target: usize,
    metric: MetricKind,
    strategy: StrategyKind,
) -> Vec<usize> {
    let target = target.max(2);
    if samples.len() <= target {
        return (0..samples.len()).collect();
    }

    match strategy {
        StrategyKind::Fast => select_fast(samples, target, metric),
        StrategyKind::Simple => select_simple(samples, target, metric),
    }
}

/// Find the interior point of `left..right` farthest from its chord.
fn best_split(samples: &[Sample], left: usize, right: usize, metric: MetricKind) -> Option<Split> {
    let (a, b) = (samples[left], samples[right]);
    ((left + 1)..right)
        .map(|index| Split {
            score: metric.score(a, b, samples[index]),
            index,
            left,
            right,
        })
        .max()
}

/// Rescan every retained interval on every step.
fn select_simple(samples: &[Sample], target: usize, metric: MetricKind) -> Vec<usize> {
    let mut retained = Topology::with_capacity(target);
    retained.push_back(0);
    retained.push_back(samples.len() - 1);

    while retained.len() < target {
        let best = retained
            .iter()
            .filter_map(|(slot, &left)| {
                let right = *retained.get(retained.next(slot)?)?;
                best_split(samples, left, right, metric).map(|split| (split, slot))
            })
            .max_by(|(a, _), (b, _)| a.cmp(b));

        let Some((split, slot)) = best else {
            break;
        };
        retained.insert_after(slot, split.index);
    }

    retained.iter().map(|(_, &index)| index).collect()
}

/// Keep each interval's best split in a max-heap.
///
/// An interval's candidate never changes until the interval itself is
/// split, so only the two new halves need scanning after each pop.
fn select_fast(samples: &[Sample], target: usize, metric: MetricKind) -> Vec<usize> {
    let last = samples.len() - 1;
    let mut kept = vec![false; samples.len()];
    kept[0] = true;
    kept[last] = true;
    let mut count = 2;

    let mut queue = BinaryHeap::new();
    queue.extend(best_split(samples, 0, last, metric));

    while count < target {
        let Some(split) = queue.pop() else {
            break;
        };
        kept[split.index] = true;
        count += 1;
        queue.extend(best_split(samples, split.left, split.index, metric));
        queue.extend(best_split(samples, split.index, split.right, metric));
    }

    kept.iter()
        .enumerate()
        .filter_map(|(index, &k)| k.then_some(index))
        .collect()
}

#[cfg(test)]
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

    fn double_tent() -> Vec<Sample> {
        curve(&[
            (0.0, 0.0),
            (1.0, 1.0),
            (2.0, 2.0),
            (3.0, 1.0),
            (4.0, 0.0),
            (5.0, 1.0),
            (6.0, 2.0),
            (7.0, 1.0),
            (8.0, 0.0),
        ])
    }

    #[test]
    fn short_input_keeps_everything() {
        let samples = curve(&[(0.0, 0.0), (1.0, 5.0), (2.0, 0.0)]);
        for strategy in StrategyKind::ALL {
            assert_eq!(
                select(&samples, 3, MetricKind::Vertical, strategy),
                vec![0, 1, 2]
            );
            assert_eq!(
                select(&samples, 10, MetricKind::Vertical, strategy),
                vec![0, 1, 2]
            );
        }
    }

    #[test]
    fn tent_keeps_apex() {
        for strategy in StrategyKind::ALL {
            assert_eq!(
                select(&tent(), 3, MetricKind::Vertical, strategy),
                vec![0, 4, 8]
            );
        }
    }

    #[test]
    fn double_tent_keeps_turning_points() {
        for strategy in StrategyKind::ALL {
            for metric in MetricKind::ALL {
                assert_eq!(
                    select(&double_tent(), 5, metric, strategy),
                    vec![0, 2, 4, 6, 8],
                    "{strategy} / {metric}"
                );
            }
        }
    }

    #[test]
    fn target_below_two_keeps_endpoints() {
        for strategy in StrategyKind::ALL {
            assert_eq!(select(&tent(), 0, MetricKind::Vertical, strategy), vec![0, 8]);
        }
    }

    #[test]
    fn collinear_ties_pick_earliest() {
        let samples = curve(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0), (4.0, 0.0)]);
        for strategy in StrategyKind::ALL {
            assert_eq!(
                select(&samples, 3, MetricKind::Vertical, strategy),
                vec![0, 1, 4]
            );
            assert_eq!(
                select(&samples, 4, MetricKind::Euclidean, strategy),
                vec![0, 1, 2, 4]
            );
        }
    }

    #[test]
    fn later_interval_can_win() {
        // Small bump early, big spike late: the spike is taken first,
        // then the bump.
        let samples = curve(&[
            (0.0, 0.0),
            (1.0, 1.0),
            (2.0, 0.0),
            (3.0, 0.0),
            (4.0, 9.0),
            (5.0, 0.0),
        ]);
        for strategy in StrategyKind::ALL {
            assert_eq!(
                select(&samples, 3, MetricKind::Vertical, strategy),
                vec![0, 4, 5]
            );
        }
    }

    #[test]
    fn split_ordering_prefers_score_then_earlier_index() {
        let high = Split {
            score: 2.0,
            index: 5,
            left: 0,
            right: 9,
        };
        let low_early = Split {
            score: 1.0,
            index: 1,
            ..high
        };
        let low_late = Split {
            score: 1.0,
            index: 3,
            ..high
        };
        assert!(high > low_early);
        assert!(low_early > low_late);
    }
}
