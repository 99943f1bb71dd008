use crate::{
    mutation::MutationMagnitude,
    observer::TrainingStatus,
    params::TrainingParams,
    performance::PerformanceTracker,
    population::AgentId,
};

/// Counters and adaptive state shared by the collision and post-step hooks.
///
/// There is a single writer: the hooks take `&mut TrainingState` in turn and never
/// overlap.
#[derive(Debug, Clone)]
pub struct TrainingState {
    pub(crate) episode_count: u64,
    pub(crate) iterations_count: u64,
    pub(crate) success_streak: u64,
    /// Episode count at the previous success; `None` until the first one.
    pub(crate) previous_episode_count: Option<u64>,
    pub(crate) last_winner: Option<AgentId>,
    /// Winner of the current tick, cleared by the post-step hook.
    pub(crate) tick_winner: Option<AgentId>,
    pub(crate) mutation: MutationMagnitude,
    pub(crate) performance: PerformanceTracker,
    pub(crate) terminated: bool,
}

impl TrainingState {
    #[must_use]
    pub fn new(params: &TrainingParams) -> Self {
        Self {
            episode_count: 0,
            iterations_count: 0,
            success_streak: 0,
            previous_episode_count: None,
            last_winner: None,
            tick_winner: None,
            mutation: MutationMagnitude::from_params(params),
            performance: PerformanceTracker::from_params(params),
            terminated: false,
        }
    }

    /// Ticks since the last success.
    #[must_use]
    pub fn episode_count(&self) -> u64 {
        self.episode_count
    }

    /// Total number of successes.
    #[must_use]
    pub fn iterations_count(&self) -> u64 {
        self.iterations_count
    }

    /// Consecutive successes by the same agent, not counting the first.
    #[must_use]
    pub fn success_streak(&self) -> u64 {
        self.success_streak
    }

    #[must_use]
    pub fn previous_episode_count(&self) -> Option<u64> {
        self.previous_episode_count
    }

    #[must_use]
    pub fn last_winner(&self) -> Option<AgentId> {
        self.last_winner
    }

    #[must_use]
    pub fn tick_winner(&self) -> Option<AgentId> {
        self.tick_winner
    }

    #[must_use]
    pub fn mutation(&self) -> &MutationMagnitude {
        &self.mutation
    }

    #[must_use]
    pub fn performance(&self) -> &PerformanceTracker {
        &self.performance
    }

    /// Whether the episode limit was reached. No further updates happen once set.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    #[must_use]
    pub fn status(&self) -> TrainingStatus {
        TrainingStatus {
            episode_count: self.episode_count,
            iterations_count: self.iterations_count,
            last_winner: self.last_winner,
            success_streak: self.success_streak,
            mutation_magnitude: self.mutation.value(),
        }
    }
}
