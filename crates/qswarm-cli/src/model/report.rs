use chrono::{DateTime, Utc};
use qswarm_arena::ArenaLayout;
use qswarm_learning::{
    observer::{SuccessReport, TickReport, TrainingStatus},
    params::TrainingParams,
};
use qswarm_stats::descriptive::DescriptiveStats;
use serde::{Deserialize, Serialize};

/// Result of a `qswarm train` run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    pub name: String,
    pub trained_at: DateTime<Utc>,
    /// Seed of the first attempt; attempt `n` uses `seed + n`.
    pub seed: u64,
    pub params: TrainingParams,
    pub layout: ArenaLayout,
    pub total_ticks: u64,
    pub attempts: Vec<AttemptRecord>,
}

/// Why an attempt stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptEnd {
    /// The episode limit was reached without a success.
    Exhausted,
    /// The run's tick budget ran out.
    TickLimit,
}

/// One trainer lifetime, from spawn to exhaustion or the end of the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub attempt: u32,
    pub seed: u64,
    pub end: AttemptEnd,
    pub ticks: u64,
    pub successes: Vec<SuccessReport>,
    /// Per-tick scores since the last success.
    pub score_history: Vec<TickReport>,
    pub final_status: TrainingStatus,
    /// Q-table entries across the population at the end of the attempt.
    pub table_entries: usize,
    pub episodes_to_success: Option<EpisodeStats>,
}

/// Summary of how many ticks each success took.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
}

impl EpisodeStats {
    #[expect(clippy::cast_precision_loss)]
    pub fn from_successes(successes: &[SuccessReport]) -> Option<Self> {
        let stats =
            DescriptiveStats::new(successes.iter().map(|s| s.episodes_taken as f64))?;
        Some(Self::from(stats))
    }
}

impl From<DescriptiveStats> for EpisodeStats {
    fn from(stats: DescriptiveStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean,
            median: stats.median,
            std_dev: stats.std_dev,
        }
    }
}
