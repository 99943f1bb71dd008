use arrayvec::ArrayVec;
use rand::{Rng, seq::IndexedRandom};

use crate::{action::Action, q_table::QTable, state::StateKey};

/// Epsilon-greedy action selection.
///
/// With probability `epsilon` a uniformly random action is taken. Otherwise the
/// action with the highest value is taken, breaking exact ties uniformly at random.
/// Looking up the values materializes any missing entries of the state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpsilonGreedy {
    epsilon: f64,
}

impl EpsilonGreedy {
    #[must_use]
    pub const fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }

    pub fn choose_action<R>(&self, table: &mut QTable, state: StateKey, rng: &mut R) -> Action
    where
        R: Rng + ?Sized,
    {
        if rng.random::<f64>() < self.epsilon {
            return random_action(rng);
        }
        self.greedy_action(table, state, rng)
    }

    /// Picks uniformly among the actions whose value equals the maximum.
    pub fn greedy_action<R>(&self, table: &mut QTable, state: StateKey, rng: &mut R) -> Action
    where
        R: Rng + ?Sized,
    {
        let values = table.action_values(state, rng);
        let max = values
            .iter()
            .map(|&(_, value)| value)
            .fold(f64::NEG_INFINITY, f64::max);
        #[expect(clippy::float_cmp)]
        let best: ArrayVec<Action, { Action::LEN }> = values
            .iter()
            .filter(|&&(_, value)| value == max)
            .map(|&(action, _)| action)
            .collect();
        match best.choose(rng) {
            Some(&action) => action,
            // only reachable when every value is NaN
            None => random_action(rng),
        }
    }
}

fn random_action<R>(rng: &mut R) -> Action
where
    R: Rng + ?Sized,
{
    Action::ALL[rng.random_range(0..Action::LEN)]
}
