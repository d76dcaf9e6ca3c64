//! Stream reduction: a bounded window over samples as they arrive.
//!
//! The window holds at most `capacity` samples: the first sample seen,
//! the latest sample, and the most significant samples in between. Each
//! interior member is scored against its current neighbors in the
//! window. When an arrival pushes the window over capacity, the interior
//! member with the lowest score is evicted (ties evict the earliest
//! arrival) and its two neighbors are rescored.
//!
//! Nothing outside the window is ever revisited, so the result is an
//! online approximation of [`batch`](crate::batch) reduction and can
//! differ from it for the same input.

use crate::heap::{IndexedMinHeap, Priority};
use crate::metric::{DistanceMetric, MetricKind};
use crate::strategy::StrategyKind;
use crate::topology::Topology;
use crate::types::{Curve, ReduceError, Sample};

/// A retained sample together with its arrival index and score.
#[derive(Debug, Clone, Copy)]
struct Member {
    seq: usize,
    sample: Sample,
    score: f64,
}

impl Member {
    const fn new(seq: usize, sample: Sample) -> Self {
        Self {
            seq,
            sample,
            score: f64::INFINITY,
        }
    }

    const fn priority(&self) -> Priority {
        Priority::new(self.score, self.seq)
    }
}

/// Incremental reducer keeping at most `capacity` samples.
///
/// # Example
///
/// ```
/// use fastpip::{MetricKind, Sample, StrategyKind, StreamReducer};
///
/// let mut reducer = StreamReducer::new(3, MetricKind::Vertical, StrategyKind::Fast)?;
/// for x in 0..9 {
///     let x = f64::from(x);
///     reducer.push(Sample::new(x, 4.0 - (x - 4.0).abs()));
/// }
/// let kept: Vec<f64> = reducer.samples().iter().map(|s| s.x).collect();
/// assert_eq!(kept, vec![0.0, 4.0, 8.0]);
/// # Ok::<(), fastpip::ReduceError>(())
/// ```
#[derive(Debug, Clone)]
pub struct StreamReducer {
    window: Window,
    capacity: usize,
    metric: MetricKind,
    arrivals: usize,
}

/// Window storage, one variant per strategy.
#[derive(Debug, Clone)]
enum Window {
    Scan(ScanWindow),
    Heap(HeapWindow),
}

impl StreamReducer {
    /// Create a reducer that retains at most `capacity` samples.
    ///
    /// # Errors
    ///
    /// Returns [`ReduceError::InvalidArgument`] if `capacity < 2`: both
    /// endpoints must always fit in the window.
    pub fn new(
        capacity: usize,
        metric: MetricKind,
        strategy: StrategyKind,
    ) -> Result<Self, ReduceError> {
        if capacity < 2 {
            return Err(ReduceError::InvalidArgument(format!(
                "stream capacity must be at least 2, got {capacity}"
            )));
        }
        Ok(Self::build(capacity, metric, strategy))
    }

    fn build(capacity: usize, metric: MetricKind, strategy: StrategyKind) -> Self {
        let window = match strategy {
            StrategyKind::Simple => Window::Scan(ScanWindow::default()),
            StrategyKind::Fast => Window::Heap(HeapWindow::default()),
        };
        Self {
            window,
            capacity,
            metric,
            arrivals: 0,
        }
    }

    /// Feed the next sample, returning the sample evicted to make room
    /// for it, if any.
    pub fn push(&mut self, sample: Sample) -> Option<Sample> {
        let member = Member::new(self.arrivals, sample);
        self.arrivals += 1;
        match &mut self.window {
            Window::Scan(w) => w.push(member, self.capacity, self.metric),
            Window::Heap(w) => w.push(member, self.capacity, self.metric),
        }
    }

    /// Maximum number of retained samples.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Metric used to score window members.
    #[must_use]
    pub const fn metric(&self) -> MetricKind {
        self.metric
    }

    /// Strategy backing the window.
    #[must_use]
    pub const fn strategy(&self) -> StrategyKind {
        match self.window {
            Window::Scan(_) => StrategyKind::Simple,
            Window::Heap(_) => StrategyKind::Fast,
        }
    }

    /// Total number of samples pushed so far.
    #[must_use]
    pub const fn arrivals(&self) -> usize {
        self.arrivals
    }

    /// Number of samples currently retained.
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.window {
            Window::Scan(w) => w.members.len(),
            Window::Heap(w) => w.members.len(),
        }
    }

    /// Returns `true` if nothing has been pushed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Arrival indices of the retained samples, in order.
    #[must_use]
    pub fn indices(&self) -> Vec<usize> {
        self.members().map(|m| m.seq).collect()
    }

    /// The retained samples, in order.
    #[must_use]
    pub fn samples(&self) -> Vec<Sample> {
        self.members().map(|m| m.sample).collect()
    }

    /// Consume the reducer and return the retained samples as a curve.
    #[must_use]
    pub fn into_curve(self) -> Curve {
        Curve::new(self.samples())
    }

    fn members(&self) -> Box<dyn Iterator<Item = &Member> + '_> {
        match &self.window {
            Window::Scan(w) => Box::new(w.members.iter()),
            Window::Heap(w) => Box::new(w.members.iter().map(|(_, m)| m)),
        }
    }
}

impl Extend<Sample> for StreamReducer {
    fn extend<I: IntoIterator<Item = Sample>>(&mut self, iter: I) {
        for sample in iter {
            self.push(sample);
        }
    }
}

/// Stream `samples` through a window of `target` and return the arrival
/// indices left in it. `target` is raised to 2.
#[must_use]
pub fn select(
    samples: &[Sample],
    target: usize,
    metric: MetricKind,
    strategy: StrategyKind,
) -> Vec<usize> {
    let mut reducer = StreamReducer::build(target.max(2), metric, strategy);
    reducer.extend(samples.iter().copied());
    reducer.indices()
}

/// Window kept in a plain vector; eviction scans for the minimum.
#[derive(Debug, Clone, Default)]
struct ScanWindow {
    members: Vec<Member>,
}

impl ScanWindow {
    fn push(&mut self, member: Member, capacity: usize, metric: MetricKind) -> Option<Sample> {
        self.members.push(member);
        let len = self.members.len();
        if len >= 3 {
            self.rescore(len - 2, metric);
        }
        if len <= capacity {
            return None;
        }

        let victim = (1..len - 1).min_by_key(|&i| self.members[i].priority())?;
        let evicted = self.members.remove(victim);
        self.rescore(victim - 1, metric);
        self.rescore(victim, metric);
        Some(evicted.sample)
    }

    /// Rescore the member at `i` against its neighbors; endpoints are
    /// left alone.
    fn rescore(&mut self, i: usize, metric: MetricKind) {
        if i == 0 || i + 1 >= self.members.len() {
            return;
        }
        let (left, right) = (self.members[i - 1].sample, self.members[i + 1].sample);
        let member = &mut self.members[i];
        member.score = metric.score(left, right, member.sample);
    }
}

/// Window kept in a linked arena; interior members live in an indexed
/// min-heap so eviction and rescoring are O(log N).
#[derive(Debug, Clone, Default)]
struct HeapWindow {
    members: Topology<Member>,
    queue: IndexedMinHeap,
}

impl HeapWindow {
    fn push(&mut self, member: Member, capacity: usize, metric: MetricKind) -> Option<Sample> {
        let previous_tail = self.members.tail();
        self.members.push_back(member);
        if let Some(slot) = previous_tail {
            self.rescore(slot, metric);
        }
        if self.members.len() <= capacity {
            return None;
        }

        let (victim, _) = self.queue.pop()?;
        let neighbors = [self.members.prev(victim), self.members.next(victim)];
        let evicted = self.members.remove(victim)?;
        for slot in neighbors.into_iter().flatten() {
            self.rescore(slot, metric);
        }
        Some(evicted.sample)
    }

    /// Rescore the member at `slot` and reposition it in the queue.
    /// Endpoints are kept out of the queue.
    fn rescore(&mut self, slot: usize, metric: MetricKind) {
        let neighbors = (self.members.prev(slot), self.members.next(slot));
        let (Some(prev), Some(next)) = neighbors else {
            self.queue.remove(slot);
            return;
        };
        let (Some(left), Some(right)) = (self.members.get(prev), self.members.get(next)) else {
            return;
        };
        let (left, right) = (left.sample, right.sample);

        if let Some(member) = self.members.get_mut(slot) {
            member.score = metric.score(left, right, member.sample);
            let priority = member.priority();
            self.queue.push(slot, priority);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn curve(points: &[(f64, f64)]) -> Vec<Sample> {
        points.iter().copied().map(Sample::from).collect()
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
    fn capacity_below_two_is_rejected() {
        for capacity in [0, 1] {
            let err = StreamReducer::new(capacity, MetricKind::Vertical, StrategyKind::Fast)
                .unwrap_err();
            assert!(matches!(err, ReduceError::InvalidArgument(_)));
        }
    }

    #[test]
    fn fills_before_evicting() {
        for strategy in StrategyKind::ALL {
            let mut reducer = StreamReducer::new(4, MetricKind::Vertical, strategy).unwrap();
            assert!(reducer.is_empty());
            for x in 0..4 {
                assert_eq!(reducer.push(Sample::new(f64::from(x), 0.0)), None);
            }
            assert_eq!(reducer.len(), 4);
            assert_eq!(reducer.capacity(), 4);
            assert_eq!(reducer.metric(), MetricKind::Vertical);
            assert_eq!(reducer.strategy(), strategy);
        }
    }

    #[test]
    fn eviction_returns_least_significant_sample() {
        for strategy in StrategyKind::ALL {
            let mut reducer = StreamReducer::new(3, MetricKind::Vertical, strategy).unwrap();
            reducer.push(Sample::new(0.0, 0.0));
            reducer.push(Sample::new(1.0, 5.0));
            reducer.push(Sample::new(2.0, 0.0));
            // (2, 0) lies on the chord from (1, 5) to (3, -5).
            let evicted = reducer.push(Sample::new(3.0, -5.0));
            assert_eq!(evicted, Some(Sample::new(2.0, 0.0)));
            assert_eq!(reducer.indices(), vec![0, 1, 3]);
            assert_eq!(reducer.arrivals(), 4);
        }
    }

    #[test]
    fn endpoints_always_retained() {
        for strategy in StrategyKind::ALL {
            let mut reducer = StreamReducer::new(2, MetricKind::Euclidean, strategy).unwrap();
            reducer.extend(double_tent());
            assert_eq!(
                reducer.samples(),
                vec![Sample::new(0.0, 0.0), Sample::new(8.0, 0.0)]
            );
        }
    }

    #[test]
    fn double_tent_keeps_turning_points() {
        for strategy in StrategyKind::ALL {
            assert_eq!(
                select(&double_tent(), 5, MetricKind::Vertical, strategy),
                vec![0, 2, 4, 6, 8]
            );
        }
    }

    #[test]
    fn early_evictions_are_final() {
        // Batch keeps (3, 1); the window dropped it while (4, 3) still
        // looked more significant and cannot bring it back.
        let samples = curve(&[
            (0.0, 0.0),
            (1.0, 0.0),
            (2.0, 0.0),
            (3.0, 1.0),
            (4.0, 3.0),
            (5.0, 7.0),
            (6.0, 0.0),
        ]);
        for strategy in StrategyKind::ALL {
            assert_eq!(
                select(&samples, 4, MetricKind::Vertical, strategy),
                vec![0, 4, 5, 6]
            );
        }
    }

    #[test]
    fn into_curve_matches_samples() {
        let mut reducer = StreamReducer::new(3, MetricKind::Vertical, StrategyKind::Fast).unwrap();
        reducer.extend(double_tent());
        let samples = reducer.samples();
        assert_eq!(reducer.into_curve().into_samples(), samples);
    }

    #[test]
    fn heap_window_reuses_slots() {
        let mut window = HeapWindow::default();
        for (seq, sample) in double_tent().into_iter().enumerate() {
            window.push(Member::new(seq, sample), 3, MetricKind::Vertical);
        }
        assert_eq!(window.members.len(), 3);
        assert!(window.members.slots() <= 4);
        assert_eq!(window.queue.len(), 1);
    }
}
