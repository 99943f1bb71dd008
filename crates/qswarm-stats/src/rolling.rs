use std::collections::VecDeque;

/// Bounded FIFO of the most recent samples.
///
/// Pushing into a full window evicts the oldest sample first. The mean is only
/// reported once the window is full, so callers never act on a partial average.
///
/// # Example
///
/// ```
/// use qswarm_stats::rolling::RollingWindow;
///
/// let mut window = RollingWindow::new(3);
/// window.push(1.0);
/// window.push(2.0);
/// assert_eq!(window.full_mean(), None);
///
/// window.push(6.0);
/// assert_eq!(window.full_mean(), Some(3.0));
///
/// // 1.0 is evicted
/// window.push(4.0);
/// assert_eq!(window.full_mean(), Some(4.0));
/// ```
#[derive(Debug, Clone)]
pub struct RollingWindow {
    capacity: usize,
    samples: VecDeque<f64>,
}

impl RollingWindow {
    /// Creates an empty window holding at most `capacity` samples.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "rolling window capacity must be positive");
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity),
        }
    }

    /// Appends a sample, evicting the oldest one if the window is full.
    ///
    /// Returns the evicted sample, if any.
    pub fn push(&mut self, sample: f64) -> Option<f64> {
        let evicted = if self.samples.len() >= self.capacity {
            self.samples.pop_front()
        } else {
            None
        };
        self.samples.push_back(sample);
        evicted
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.samples.len() == self.capacity
    }

    /// Iterates over the samples from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }

    /// Returns the arithmetic mean once the window holds exactly `capacity` samples.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn full_mean(&self) -> Option<f64> {
        if !self.is_full() {
            return None;
        }
        Some(self.samples.iter().sum::<f64>() / self.samples.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_when_full() {
        let mut window = RollingWindow::new(2);
        assert_eq!(window.push(1.0), None);
        assert_eq!(window.push(2.0), None);
        assert_eq!(window.push(3.0), Some(1.0));
        assert_eq!(window.iter().collect::<Vec<_>>(), vec![2.0, 3.0]);
        assert_eq!(window.len(), 2);
        assert_eq!(window.capacity(), 2);
    }

    #[test]
    fn mean_only_when_full() {
        let mut window = RollingWindow::new(5);
        for sample in [10.0, -4.0, 3.0, 1.0] {
            window.push(sample);
            assert_eq!(window.full_mean(), None);
        }
        window.push(0.0);
        assert_eq!(window.full_mean(), Some(2.0));
    }

    #[test]
    #[should_panic(expected = "capacity")]
    fn zero_capacity_is_rejected() {
        let _ = RollingWindow::new(0);
    }
}
