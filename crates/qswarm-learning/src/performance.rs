use qswarm_stats::rolling::RollingWindow;
use serde::Serialize;

use crate::{mutation::MutationMagnitude, params::TrainingParams};

/// Outcome of recording one learning-speed sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, derive_more::IsVariant)]
#[serde(tag = "verdict", content = "average", rename_all = "snake_case")]
pub enum PerformanceVerdict {
    /// The window is not full yet.
    Filling,
    /// First full window; its average becomes the baseline.
    Baseline(f64),
    /// The average did not drop far enough to react.
    Steady(f64),
    /// The average dropped to or below `threshold * previous`; the magnitude was boosted.
    Regressed(f64),
}

/// Watches how quickly successes follow each other and boosts mutation when it slows.
///
/// Each sample is the change in the episode counter between two successes. Once
/// the window is full, every new sample produces an average that is compared with
/// the previous one.
#[derive(Debug, Clone)]
pub struct PerformanceTracker {
    window: RollingWindow,
    threshold: f64,
    baseline: Option<f64>,
}

impl PerformanceTracker {
    #[must_use]
    pub fn new(window: usize, threshold: f64) -> Self {
        Self {
            window: RollingWindow::new(window),
            threshold,
            baseline: None,
        }
    }

    #[must_use]
    pub fn from_params(params: &TrainingParams) -> Self {
        Self::new(params.performance_window, params.performance_threshold)
    }

    /// Average of the previous full window, if one has been seen.
    #[must_use]
    pub fn previous_average(&self) -> Option<f64> {
        self.baseline
    }

    #[must_use]
    pub fn samples(&self) -> &RollingWindow {
        &self.window
    }

    pub fn record(&mut self, sample: f64, magnitude: &mut MutationMagnitude) -> PerformanceVerdict {
        self.window.push(sample);
        let Some(average) = self.window.full_mean() else {
            return PerformanceVerdict::Filling;
        };
        let verdict = match self.baseline {
            None => PerformanceVerdict::Baseline(average),
            Some(previous) if average <= previous * self.threshold => {
                magnitude.boost();
                PerformanceVerdict::Regressed(average)
            }
            Some(_) => PerformanceVerdict::Steady(average),
        };
        self.baseline = Some(average);
        verdict
    }
}
