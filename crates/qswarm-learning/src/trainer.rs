use qswarm_arena::{CollisionPair, Environment};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::{
    episode::{EpisodeController, TickOutcome},
    error::InvariantViolation,
    evolution::{CollisionOutcome, EvolutionManager},
    learner::Learner,
    observer::{TrainingObserver, TrainingStatus},
    params::{ParamsError, TrainingParams},
    population::Population,
    training_state::TrainingState,
};

/// Entry point wiring the learning components to an environment.
///
/// The environment drives the trainer through two hooks per simulation step: zero or
/// more [`on_collision`](Self::on_collision) calls for the contacts that began during
/// the step, then one [`after_step`](Self::after_step) call. Both hooks check the
/// population invariants before returning and report a violation as `Err`; training
/// must stop when that happens.
///
/// All randomness comes from one [`Pcg32`] seeded at construction, so a run is
/// reproducible from its seed and the sequence of environment events.
///
/// # Example
///
/// ```
/// use qswarm_arena::{Arena, ArenaLayout};
/// use qswarm_learning::{episode::TickOutcome, params::TrainingParams, trainer::Trainer};
///
/// let mut arena = Arena::new(ArenaLayout::default()).unwrap();
/// let params = TrainingParams {
///     population_size: 4,
///     ..TrainingParams::default()
/// };
/// let mut trainer = Trainer::new(params, &mut arena, 7).unwrap();
///
/// for _ in 0..50 {
///     for pair in arena.step() {
///         trainer.on_collision(&mut arena, pair, &mut ()).unwrap();
///     }
///     let outcome = trainer.after_step(&mut arena, &mut ()).unwrap();
///     assert!(outcome.is_continue());
/// }
/// assert_eq!(trainer.population().len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct Trainer {
    params: TrainingParams,
    learner: Learner,
    evolution: EvolutionManager,
    episodes: EpisodeController,
    state: TrainingState,
    population: Population,
    rng: Pcg32,
    seed: u64,
}

impl Trainer {
    /// Validates `params` and spawns the population at the environment's start.
    pub fn new<E>(params: TrainingParams, env: &mut E, seed: u64) -> Result<Self, ParamsError>
    where
        E: Environment + ?Sized,
    {
        params.validate()?;
        let population = Population::spawn(params.population_size, env);
        tracing::debug!(
            population = params.population_size,
            seed,
            "trainer initialized"
        );
        Ok(Self {
            learner: Learner::new(&params),
            evolution: EvolutionManager::new(&params),
            episodes: EpisodeController::new(&params),
            state: TrainingState::new(&params),
            population,
            rng: Pcg32::seed_from_u64(seed),
            seed,
            params,
        })
    }

    /// Collision hook, called for each contact that began during the last step.
    pub fn on_collision<E, O>(
        &mut self,
        env: &mut E,
        pair: CollisionPair,
        observer: &mut O,
    ) -> Result<CollisionOutcome, InvariantViolation>
    where
        E: Environment + ?Sized,
        O: TrainingObserver + ?Sized,
    {
        let outcome = self.evolution.on_collision(
            &self.learner,
            &mut self.state,
            &mut self.population,
            env,
            pair,
            &mut self.rng,
            observer,
        );
        self.verify()?;
        Ok(outcome)
    }

    /// Post-step hook, called once per step after all collision hooks.
    pub fn after_step<E, O>(
        &mut self,
        env: &mut E,
        observer: &mut O,
    ) -> Result<TickOutcome, InvariantViolation>
    where
        E: Environment + ?Sized,
        O: TrainingObserver + ?Sized,
    {
        let outcome = self.episodes.after_step(
            &self.learner,
            &mut self.state,
            &mut self.population,
            env,
            &mut self.rng,
            observer,
        );
        self.verify()?;
        Ok(outcome)
    }

    fn verify(&self) -> Result<(), InvariantViolation> {
        self.population
            .verify(self.params.population_size)
            .inspect_err(|error| tracing::error!(%error, "population invariant violated"))
    }

    #[must_use]
    pub fn status(&self) -> TrainingStatus {
        self.state.status()
    }

    #[must_use]
    pub fn state(&self) -> &TrainingState {
        &self.state
    }

    #[must_use]
    pub fn population(&self) -> &Population {
        &self.population
    }

    #[must_use]
    pub fn params(&self) -> &TrainingParams {
        &self.params
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[cfg(test)]
    pub(crate) fn population_mut(&mut self) -> &mut Population {
        &mut self.population
    }
}

#[cfg(test)]
mod tests {
    use qswarm_arena::{BodyId, BodyKind, Vec2};

    use super::*;
    use crate::{
        error::SkipReason,
        population::AgentId,
        state::StateKey,
        test_support::{MockEnvironment, RecordingObserver},
    };

    const START: Vec2 = Vec2::new(100.0, 100.0);

    struct Fixture {
        env: MockEnvironment,
        trainer: Trainer,
        observer: RecordingObserver,
        target: BodyId,
        obstacle: BodyId,
    }

    impl Fixture {
        fn new(params: TrainingParams) -> Self {
            let mut env = MockEnvironment::new(START);
            let target = env.add_static(BodyKind::Target);
            let obstacle = env.add_static(BodyKind::Obstacle);
            let trainer = Trainer::new(params, &mut env, 1).unwrap();
            Self {
                env,
                trainer,
                observer: RecordingObserver::default(),
                target,
                obstacle,
            }
        }

        fn with_population(size: usize) -> Self {
            Self::new(TrainingParams {
                population_size: size,
                ..TrainingParams::default()
            })
        }

        fn tick(&mut self) -> TickOutcome {
            self.trainer
                .after_step(&mut self.env, &mut self.observer)
                .unwrap()
        }

        fn collide(&mut self, body: BodyId, other: BodyId) -> CollisionOutcome {
            self.trainer
                .on_collision(
                    &mut self.env,
                    CollisionPair::new(body, other),
                    &mut self.observer,
                )
                .unwrap()
        }

        fn agent(&self, slot: usize) -> (AgentId, BodyId) {
            let agent = &self.trainer.population().agents()[slot];
            (agent.id(), agent.body())
        }
    }

    #[test]
    fn rejects_invalid_params() {
        let mut env = MockEnvironment::new(START);
        let params = TrainingParams {
            alpha: 2.0,
            ..TrainingParams::default()
        };
        assert!(Trainer::new(params, &mut env, 0).is_err());
        assert_eq!(env.agent_count(), 0);
    }

    #[test]
    fn single_success_clones_winner() {
        let mut fx = Fixture::with_population(2);
        for _ in 0..3 {
            assert!(fx.tick().is_continue());
        }
        let (a, a_body) = fx.agent(0);
        let (b, b_body) = fx.agent(1);
        fx.env.place(a_body, Vec2::new(650.0, 120.0), Vec2::new(5.0, 0.0));
        let before = fx.trainer.population().table(a).unwrap().clone();

        let outcome = fx.collide(a_body, fx.target);
        let CollisionOutcome::Success { report, replaced } = outcome else {
            panic!("expected success, got {outcome:?}");
        };
        assert_eq!(report.winner, a);
        assert_eq!(report.iteration, 1);
        assert_eq!(report.episodes_taken, 3);
        assert_eq!(report.streak, 0);
        assert!((report.mutation_magnitude - 0.3).abs() < 1e-12);
        assert_eq!(replaced, vec![b]);

        // winner keeps its identity and body, moved back to the start
        let population = fx.trainer.population();
        assert_eq!(fx.agent(0), (a, a_body));
        assert_eq!(population.agents()[0].score(), 1.0);
        assert_eq!(fx.env.resets, vec![a_body]);
        let k = fx.env.kinematics(a_body).unwrap();
        assert_eq!(k.position, START);
        assert_eq!(k.velocity, Vec2::ZERO);

        // loser replaced by a fresh agent holding a perturbed copy
        let (new_b, new_b_body) = fx.agent(1);
        assert_ne!(new_b, a);
        assert_ne!(new_b, b);
        assert_ne!(new_b_body, b_body);
        assert_eq!(fx.env.removed, vec![b_body]);
        assert_eq!(fx.env.kinematics(new_b_body).unwrap().position, START);
        let winner_table = population.table(a).unwrap();
        let clone = population.table(new_b).unwrap();
        // reaching the target runs no collision update
        assert_eq!(winner_table, &before);
        for action in crate::action::Action::ALL {
            assert_eq!(
                winner_table.peek(StateKey::Coarse { x: 6, y: 1 }, action),
                None
            );
        }
        assert!(!winner_table.is_empty());
        assert!(winner_table.keys().eq(clone.keys()));
        for ((_, &w), (_, &c)) in winner_table.iter().zip(clone.iter()) {
            assert!((w - c).abs() <= 0.3);
        }
        assert!(population.table(b).is_err());

        let state = fx.trainer.state();
        assert_eq!(state.episode_count(), 0);
        assert_eq!(state.iterations_count(), 1);
        assert_eq!(state.previous_episode_count(), Some(3));
        assert_eq!(state.tick_winner(), Some(a));
        assert!((state.mutation().value() - 0.297).abs() < 1e-12);
        assert_eq!(fx.observer.successes.len(), 1);
        assert_eq!(fx.observer.chart_resets, 1);

        // a second contact in the same tick is ignored
        assert!(fx.collide(new_b_body, fx.obstacle).is_ignored());
        assert!(fx.collide(a_body, fx.target).is_ignored());
        assert_eq!(fx.trainer.state().iterations_count(), 1);

        // the post-step hook clears every score and the tick winner
        let TickOutcome::Continue(report) = fx.tick() else {
            panic!("expected the run to continue");
        };
        assert_eq!(report.episode, 0);
        assert_eq!(report.best_score, 0.0);
        assert_eq!(report.worst_score, 0.0);
        assert_eq!(fx.trainer.state().tick_winner(), None);
        assert_eq!(fx.trainer.state().episode_count(), 1);
    }

    #[test]
    fn success_emits_status() {
        let mut fx = Fixture::with_population(2);
        let (a, body) = fx.agent(0);
        assert!(fx.collide(body, fx.target).is_success());
        assert_eq!(fx.observer.successes.len(), 1);
        assert_eq!(fx.observer.statuses.len(), 1);
        let status = fx.observer.statuses[0];
        assert_eq!(status.iterations_count, 1);
        assert_eq!(status.episode_count, 0);
        assert_eq!(status.last_winner, Some(a));
    }

    #[test]
    fn decays_once_per_success() {
        let mut fx = Fixture::with_population(5);
        fx.tick();
        let (_, body) = fx.agent(2);
        let outcome = fx.collide(body, fx.target);
        let CollisionOutcome::Success { replaced, .. } = outcome else {
            panic!("expected success, got {outcome:?}");
        };
        assert_eq!(replaced.len(), 4);
        assert_eq!(fx.env.agent_count(), 5);
        assert!((fx.trainer.state().mutation().value() - 0.297).abs() < 1e-12);
    }

    #[test]
    fn obstacle_collision_runs_coarse_update() {
        let mut fx = Fixture::with_population(1);
        let (a, body) = fx.agent(0);
        fx.env.place(body, Vec2::new(250.0, 150.0), Vec2::new(0.0, -5.0));

        let outcome = fx.collide(body, fx.obstacle);
        let CollisionOutcome::Penalized { agent, transition } = outcome else {
            panic!("expected penalty, got {outcome:?}");
        };
        assert_eq!(agent, a);
        assert_eq!(transition.state, StateKey::Coarse { x: 2, y: 1 });
        assert_eq!(transition.next_state, transition.state);
        assert_eq!(transition.reward, -1.0);
        let expected = transition.previous_value
            + 0.1 * (-1.0 + 0.9 * transition.max_next - transition.previous_value);
        assert!((transition.updated_value - expected).abs() < 1e-12);

        let population = fx.trainer.population();
        assert_eq!(population.agents()[0].score(), -1.0);
        assert_eq!(
            population
                .table(a)
                .unwrap()
                .peek(transition.state, transition.action),
            Some(transition.updated_value)
        );
        assert_eq!(fx.trainer.state().iterations_count(), 0);
        assert!(fx.env.resets.is_empty());
    }

    #[test]
    fn pair_order_does_not_matter() {
        let mut fx = Fixture::with_population(1);
        let (_, body) = fx.agent(0);
        assert!(fx.collide(fx.obstacle, body).is_penalized());
        assert!(fx.collide(fx.target, body).is_success());
    }

    #[test]
    fn contact_between_agents_is_neutral() {
        let mut fx = Fixture::with_population(2);
        let (_, a_body) = fx.agent(0);
        let (_, b_body) = fx.agent(1);
        let outcome = fx.collide(a_body, b_body);
        let CollisionOutcome::Neutral { transition, .. } = outcome else {
            panic!("expected neutral contact, got {outcome:?}");
        };
        assert_eq!(transition.reward, 0.0);
        assert_eq!(fx.trainer.population().agents()[0].score(), 0.0);
    }

    #[test]
    fn unrelated_contact_is_ignored() {
        let mut fx = Fixture::with_population(1);
        assert!(fx.collide(fx.obstacle, fx.target).is_ignored());
    }

    #[test]
    fn missing_table_skips_agent() {
        let mut fx = Fixture::with_population(2);
        let (a, body) = fx.agent(0);
        fx.trainer.population_mut().detach_table(a);

        let outcome = fx.collide(body, fx.obstacle);
        assert_eq!(
            outcome,
            CollisionOutcome::Skipped {
                reason: SkipReason::MissingTable(a)
            }
        );
        assert_eq!(fx.trainer.population().agents()[0].score(), 0.0);

        // the other agent is still updated
        assert!(fx.tick().is_continue());
        let (b, _) = fx.agent(1);
        assert!(!fx.trainer.population().table(b).unwrap().is_empty());
    }

    #[test]
    fn missing_body_skips_agent() {
        let mut fx = Fixture::with_population(1);
        let (a, body) = fx.agent(0);
        fx.env.remove_agent(body);
        let outcome = fx.collide(body, fx.obstacle);
        let CollisionOutcome::Skipped { reason } = outcome else {
            panic!("expected skip, got {outcome:?}");
        };
        assert_eq!(reason, SkipReason::MissingBody(a));
        assert_eq!(reason.agent(), a);
    }

    #[test]
    fn streak_counts_repeat_winners() {
        let mut fx = Fixture::with_population(3);
        let (_, body) = fx.agent(1);
        fx.collide(body, fx.target);
        fx.tick();
        fx.tick();
        let outcome = fx.collide(body, fx.target);
        let CollisionOutcome::Success { report, .. } = outcome else {
            panic!("expected success, got {outcome:?}");
        };
        assert_eq!(report.streak, 1);
        assert_eq!(report.episodes_taken, 2);
        assert_eq!(report.iteration, 2);

        // first success at episode 0 still sets the previous count, so one delta is recorded
        assert_eq!(fx.trainer.state().performance().samples().len(), 1);

        fx.tick();
        let (_, other) = fx.agent(0);
        let outcome = fx.collide(other, fx.target);
        let CollisionOutcome::Success { report, .. } = outcome else {
            panic!("expected success, got {outcome:?}");
        };
        assert_eq!(report.streak, 0);
        assert_eq!(fx.trainer.status().last_winner, Some(report.winner));
    }

    #[test]
    fn exhaustion_signals_once_then_halts() {
        let mut fx = Fixture::new(TrainingParams {
            population_size: 2,
            max_episodes: 5,
            ..TrainingParams::default()
        });
        for _ in 0..4 {
            assert!(fx.tick().is_continue());
        }
        assert!(fx.tick().is_exhausted());
        assert!(fx.trainer.state().is_terminated());
        assert_eq!(fx.observer.ticks.len(), 5);

        let (a, body) = fx.agent(0);
        let before = fx.trainer.population().table(a).unwrap().clone();
        assert_eq!(fx.tick(), TickOutcome::Halted);
        assert_eq!(fx.tick(), TickOutcome::Halted);
        assert!(fx.collide(body, fx.obstacle).is_ignored());
        assert!(fx.collide(body, fx.target).is_ignored());

        assert_eq!(fx.observer.ticks.len(), 5);
        assert_eq!(fx.observer.statuses.len(), 5);
        assert_eq!(fx.trainer.population().table(a).unwrap(), &before);
    }

    #[test]
    fn tick_sets_velocity_from_chosen_action() {
        let mut fx = Fixture::with_population(1);
        fx.tick();
        let (_, body) = fx.agent(0);
        let velocity = fx.env.kinematics(body).unwrap().velocity;
        assert!(
            crate::action::Action::ALL
                .iter()
                .any(|action| action.velocity(5.0) == velocity)
        );
    }

    #[test]
    fn same_seed_same_run() {
        let run = || {
            let mut fx = Fixture::with_population(3);
            for i in 0..20 {
                if i == 10 {
                    let (_, body) = fx.agent(1);
                    fx.collide(body, fx.target);
                }
                fx.tick();
            }
            let tables: Vec<_> = fx
                .trainer
                .population()
                .agents()
                .iter()
                .map(|agent| fx.trainer.population().table(agent.id()).unwrap().clone())
                .collect();
            (tables, fx.trainer.status())
        };
        assert_eq!(run(), run());
    }
}
