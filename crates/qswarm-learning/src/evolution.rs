//! Collision handling and winner-take-all evolution.
//!
//! [`EvolutionManager::on_collision`] runs once per reported contact. The first
//! population agent in slot order that takes part in the contact is resolved against
//! the body it touched:
//!
//! - **Target** - the agent wins the tick. Counters and the streak are updated, the
//!   learning-speed delta is fed to the performance tracker, the winner is moved back
//!   to the start and every other agent is replaced by a mutated clone of the winner.
//!   The mutation magnitude decays once afterwards.
//! - **Wall or obstacle** - the agent loses score and runs the collision update with
//!   the collision penalty.
//! - **Anything else** - the collision update runs with the idle reward.
//!
//! Once a tick has a winner, every later contact in the same tick is ignored.

use qswarm_arena::{BodyKind, CollisionPair, Environment, Vec2};
use rand::Rng;
use serde::Serialize;

use crate::{
    error::{MissingBodyError, SkipReason},
    learner::Learner,
    mutation,
    observer::{SuccessReport, TrainingObserver},
    params::TrainingParams,
    performance::PerformanceVerdict,
    population::{AgentId, Population},
    training_state::TrainingState,
    update::Transition,
};

/// What a single contact did to the training state.
#[derive(Debug, Clone, PartialEq, Serialize, derive_more::IsVariant)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CollisionOutcome {
    /// No agent was involved, the tick already has a winner or training has stopped.
    Ignored,
    /// The agent reached the target.
    Success {
        report: SuccessReport,
        /// Agents that were replaced by mutated clones of the winner.
        replaced: Vec<AgentId>,
    },
    /// The agent hit a wall or obstacle.
    Penalized {
        agent: AgentId,
        transition: Transition,
    },
    /// The agent touched a body that carries no reward.
    Neutral {
        agent: AgentId,
        transition: Transition,
    },
    /// The agent could not be updated.
    Skipped { reason: SkipReason },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvolutionManager {
    success_reward: f64,
    collision_penalty: f64,
    idle_reward: f64,
}

impl EvolutionManager {
    #[must_use]
    pub const fn new(params: &TrainingParams) -> Self {
        Self {
            success_reward: params.success_reward,
            collision_penalty: params.collision_penalty,
            idle_reward: params.idle_reward,
        }
    }

    #[expect(clippy::too_many_arguments)]
    pub fn on_collision<E, R, O>(
        &self,
        learner: &Learner,
        state: &mut TrainingState,
        population: &mut Population,
        env: &mut E,
        pair: CollisionPair,
        rng: &mut R,
        observer: &mut O,
    ) -> CollisionOutcome
    where
        E: Environment + ?Sized,
        R: Rng + ?Sized,
        O: TrainingObserver + ?Sized,
    {
        if state.terminated || state.tick_winner.is_some() {
            return CollisionOutcome::Ignored;
        }
        let Some((slot, other)) = population
            .agents()
            .iter()
            .enumerate()
            .find_map(|(slot, agent)| pair.other(agent.body()).map(|other| (slot, other)))
        else {
            return CollisionOutcome::Ignored;
        };

        match env.body_kind(other) {
            Some(BodyKind::Target) => self.succeed(state, population, env, slot, rng, observer),
            Some(BodyKind::Wall | BodyKind::Obstacle) => {
                let contact = Contact::Penalty(self.collision_penalty);
                collide(learner, population, env, slot, contact, rng).unwrap_or_else(skipped)
            }
            Some(BodyKind::Agent) | None => {
                let contact = Contact::Idle(self.idle_reward);
                collide(learner, population, env, slot, contact, rng).unwrap_or_else(skipped)
            }
        }
    }

    fn succeed<E, R, O>(
        &self,
        state: &mut TrainingState,
        population: &mut Population,
        env: &mut E,
        winner_slot: usize,
        rng: &mut R,
        observer: &mut O,
    ) -> CollisionOutcome
    where
        E: Environment + ?Sized,
        R: Rng + ?Sized,
        O: TrainingObserver + ?Sized,
    {
        let Some(agent) = population.agent_mut(winner_slot) else {
            return CollisionOutcome::Ignored;
        };
        agent.add_score(self.success_reward);
        let (winner, winner_body) = (agent.id(), agent.body());

        let episodes_taken = state.episode_count;
        if let Some(previous) = state.previous_episode_count {
            #[expect(clippy::cast_precision_loss)]
            let delta = previous as f64 - episodes_taken as f64;
            match state.performance.record(delta, &mut state.mutation) {
                PerformanceVerdict::Filling | PerformanceVerdict::Steady(_) => {}
                PerformanceVerdict::Baseline(average) => {
                    tracing::debug!(average, "learning-speed baseline established");
                }
                PerformanceVerdict::Regressed(average) => {
                    tracing::debug!(
                        average,
                        magnitude = state.mutation.value(),
                        "learning slowed down, mutation boosted"
                    );
                }
            }
        }
        state.previous_episode_count = Some(episodes_taken);
        state.tick_winner = Some(winner);
        state.iterations_count += 1;
        state.success_streak = if state.last_winner == Some(winner) {
            state.success_streak + 1
        } else {
            0
        };
        state.last_winner = Some(winner);

        let report = SuccessReport {
            iteration: state.iterations_count,
            episodes_taken,
            mutation_magnitude: state.mutation.value(),
            winner,
            streak: state.success_streak,
        };
        tracing::info!(
            iteration = report.iteration,
            episodes = report.episodes_taken,
            %winner,
            streak = report.streak,
            magnitude = report.mutation_magnitude,
            "agent reached the target"
        );
        observer.on_success(&report);
        observer.on_chart_reset();
        state.episode_count = 0;
        observer.on_status(&state.status());

        let start = env.start_position();
        env.reset_agent(winner_body, start, Vec2::ZERO);

        let source = match population.table(winner) {
            Ok(table) => table.clone(),
            Err(error) => {
                tracing::warn!(%error, "cannot clone the winner, population left unchanged");
                return CollisionOutcome::Success {
                    report,
                    replaced: vec![],
                };
            }
        };
        let mut replaced = Vec::with_capacity(population.len().saturating_sub(1));
        for slot in 0..population.len() {
            if slot == winner_slot {
                continue;
            }
            let table = mutation::mutate(&source, &state.mutation, rng);
            let body = env.spawn_agent(start);
            let old = population.replace(slot, body, table);
            env.remove_agent(old.body());
            replaced.push(old.id());
        }
        state.mutation.decay();
        tracing::debug!(
            cloned = replaced.len(),
            magnitude = state.mutation.value(),
            "winner cloned, mutation decayed"
        );

        CollisionOutcome::Success { report, replaced }
    }
}

#[derive(Debug, Clone, Copy)]
enum Contact {
    /// Reward that is also added to the score.
    Penalty(f64),
    Idle(f64),
}

fn collide<E, R>(
    learner: &Learner,
    population: &mut Population,
    env: &E,
    slot: usize,
    contact: Contact,
    rng: &mut R,
) -> Result<CollisionOutcome, SkipReason>
where
    E: Environment + ?Sized,
    R: Rng + ?Sized,
{
    let (agent, table) = match population.slot_mut(slot) {
        Some(Ok(pair)) => pair,
        Some(Err(error)) => return Err(error.into()),
        None => return Ok(CollisionOutcome::Ignored),
    };
    let kinematics = env
        .kinematics(agent.body())
        .ok_or(MissingBodyError { agent: agent.id() })?;
    let (Contact::Penalty(reward) | Contact::Idle(reward)) = contact;
    if let Contact::Penalty(penalty) = contact {
        agent.add_score(penalty);
    }
    let transition = learner.collision_update(table, kinematics, reward, rng);
    let agent = agent.id();
    Ok(match contact {
        Contact::Penalty(_) => CollisionOutcome::Penalized { agent, transition },
        Contact::Idle(_) => CollisionOutcome::Neutral { agent, transition },
    })
}

fn skipped(reason: SkipReason) -> CollisionOutcome {
    tracing::warn!(%reason, "collision update skipped");
    CollisionOutcome::Skipped { reason }
}
