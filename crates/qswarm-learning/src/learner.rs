use qswarm_arena::{Kinematics, Vec2};
use rand::Rng;

use crate::{
    action::Action,
    params::TrainingParams,
    policy::EpsilonGreedy,
    q_table::QTable,
    state::StateEncoder,
    update::{TdUpdate, Transition},
};

/// Single-agent learning step: encode the state, pick an action, update the table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Learner {
    encoder: StateEncoder,
    policy: EpsilonGreedy,
    update: TdUpdate,
    action_speed: f64,
}

impl Learner {
    #[must_use]
    pub fn new(params: &TrainingParams) -> Self {
        Self {
            encoder: StateEncoder::new(params.bucket_size),
            policy: EpsilonGreedy::new(params.epsilon),
            update: TdUpdate::new(params.alpha, params.gamma),
            action_speed: params.action_speed,
        }
    }

    /// Per-tick update.
    ///
    /// The action is chosen and updated in the extended state while the next-state
    /// maximum is taken over the coarse state of the same position.
    pub fn default_update<R>(
        &self,
        table: &mut QTable,
        kinematics: Kinematics,
        reward: f64,
        rng: &mut R,
    ) -> Transition
    where
        R: Rng + ?Sized,
    {
        let state = self.encoder.extended(kinematics);
        let action = self.policy.choose_action(table, state, rng);
        let next_state = self.encoder.coarse(kinematics.position);
        self.update.apply(table, state, action, reward, next_state, rng)
    }

    /// Update applied when an agent hits a wall or obstacle, entirely in coarse states.
    pub fn collision_update<R>(
        &self,
        table: &mut QTable,
        kinematics: Kinematics,
        reward: f64,
        rng: &mut R,
    ) -> Transition
    where
        R: Rng + ?Sized,
    {
        let state = self.encoder.coarse(kinematics.position);
        let action = self.policy.choose_action(table, state, rng);
        self.update.apply(table, state, action, reward, state, rng)
    }

    /// Velocity an action sets for the next step.
    #[must_use]
    pub const fn velocity_of(&self, action: Action) -> Vec2 {
        action.velocity(self.action_speed)
    }
}
