use qswarm_arena::Environment;
use rand::Rng;
use serde::Serialize;

use crate::{
    learner::Learner,
    observer::{TickReport, TrainingObserver},
    params::TrainingParams,
    population::Population,
    training_state::TrainingState,
};

/// Result of one post-step hook.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, derive_more::IsVariant)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TickOutcome {
    /// Every agent was updated; training goes on.
    Continue(TickReport),
    /// The episode limit was reached on this tick. The environment should be rebuilt.
    Exhausted(TickReport),
    /// The limit was reached earlier; nothing was updated.
    Halted,
}

/// Drives the default learning update of every agent once per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeController {
    max_episodes: u64,
    success_reward: f64,
    loser_penalty: f64,
    idle_reward: f64,
}

impl EpisodeController {
    #[must_use]
    pub const fn new(params: &TrainingParams) -> Self {
        Self {
            max_episodes: params.max_episodes,
            success_reward: params.success_reward,
            loser_penalty: params.loser_penalty,
            idle_reward: params.idle_reward,
        }
    }

    /// Runs the post-step hook.
    ///
    /// On a tick with a winner, every agent's score is cleared before its update, the
    /// winner is rewarded with the success reward and everyone else with the loser
    /// penalty. The chosen action becomes each agent's velocity for the next step.
    pub fn after_step<E, R, O>(
        &self,
        learner: &Learner,
        state: &mut TrainingState,
        population: &mut Population,
        env: &mut E,
        rng: &mut R,
        observer: &mut O,
    ) -> TickOutcome
    where
        E: Environment + ?Sized,
        R: Rng + ?Sized,
        O: TrainingObserver + ?Sized,
    {
        if state.terminated {
            return TickOutcome::Halted;
        }

        let mut best = f64::NEG_INFINITY;
        let mut worst = f64::INFINITY;
        let winner = state.tick_winner;
        for slot in 0..population.len() {
            let (agent, table) = match population.slot_mut(slot) {
                Some(Ok(pair)) => pair,
                Some(Err(error)) => {
                    tracing::warn!(%error, "tick update skipped");
                    continue;
                }
                None => break,
            };
            let reward = match winner {
                Some(winner) => {
                    agent.reset_score();
                    if winner == agent.id() {
                        self.success_reward
                    } else {
                        self.loser_penalty
                    }
                }
                None => self.idle_reward,
            };
            let Some(kinematics) = env.kinematics(agent.body()) else {
                tracing::warn!(agent = %agent.id(), "tick update skipped, agent has no body");
                continue;
            };
            let transition = learner.default_update(table, kinematics, reward, rng);
            env.set_velocity(agent.body(), learner.velocity_of(transition.action));

            best = best.max(agent.score());
            worst = worst.min(agent.score());
        }

        state.tick_winner = None;
        let report = TickReport {
            episode: state.episode_count,
            best_score: best,
            worst_score: worst,
        };
        observer.on_tick(&report);
        state.episode_count += 1;
        observer.on_status(&state.status());

        if state.episode_count >= self.max_episodes {
            state.terminated = true;
            tracing::info!(
                episodes = state.episode_count,
                iterations = state.iterations_count,
                "episode limit reached, environment reset required"
            );
            return TickOutcome::Exhausted(report);
        }
        TickOutcome::Continue(report)
    }
}
