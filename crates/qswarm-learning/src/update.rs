use rand::Rng;
use serde::Serialize;

use crate::{action::Action, q_table::QTable, state::StateKey};

/// One applied temporal-difference update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transition {
    pub state: StateKey,
    pub action: Action,
    pub reward: f64,
    pub next_state: StateKey,
    pub previous_value: f64,
    pub max_next: f64,
    pub updated_value: f64,
}

/// Q-learning update rule: `Q(s,a) += alpha * (r + gamma * max_a' Q(s',a') - Q(s,a))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TdUpdate {
    alpha: f64,
    gamma: f64,
}

impl TdUpdate {
    #[must_use]
    pub const fn new(alpha: f64, gamma: f64) -> Self {
        Self { alpha, gamma }
    }

    /// Applies the update to `table` and returns what happened.
    ///
    /// `Q(s,a)` is read before the next-state maximum, so when `s == s'` the maximum
    /// sees the value as it was before this update.
    pub fn apply<R>(
        &self,
        table: &mut QTable,
        state: StateKey,
        action: Action,
        reward: f64,
        next_state: StateKey,
        rng: &mut R,
    ) -> Transition
    where
        R: Rng + ?Sized,
    {
        let previous_value = table.get(state, action, rng);
        let max_next = table.max_over_actions(next_state, rng);
        let updated_value =
            previous_value + self.alpha * (reward + self.gamma * max_next - previous_value);
        table.set(state, action, updated_value);
        Transition {
            state,
            action,
            reward,
            next_state,
            previous_value,
            max_next,
            updated_value,
        }
    }
}
