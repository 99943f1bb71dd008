//! Mutation of cloned Q-tables.
//!
//! When an agent reaches the target, every other agent receives a copy of the winner's
//! table with each value perturbed by uniform noise:
//!
//! ```text
//! v' = v + m * U(-1, 1)
//! ```
//!
//! The magnitude `m` is controlled by [`MutationMagnitude`]:
//!
//! - **Decay** - multiplied by `decay` once per success, never below `floor`
//! - **Boost** - divided by `decay^2` when learning slows down, never above `ceiling`
//!
//! The boost is driven by [`PerformanceTracker`](crate::performance::PerformanceTracker).

use rand::Rng;

use crate::{params::TrainingParams, q_table::QTable};

/// Current mutation magnitude and the bounds it moves within.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MutationMagnitude {
    value: f64,
    decay: f64,
    floor: f64,
    ceiling: f64,
}

impl MutationMagnitude {
    #[must_use]
    pub const fn new(value: f64, decay: f64, floor: f64, ceiling: f64) -> Self {
        Self {
            value,
            decay,
            floor,
            ceiling,
        }
    }

    #[must_use]
    pub const fn from_params(params: &TrainingParams) -> Self {
        Self::new(
            params.initial_mutation_magnitude,
            params.mutation_decay,
            params.mutation_floor,
            params.mutation_ceiling,
        )
    }

    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// Shrinks the magnitude by one decay step, clamped at the floor.
    pub fn decay(&mut self) {
        self.value = f64::max(self.floor, self.value * self.decay);
    }

    /// Grows the magnitude by two decay steps, clamped at the ceiling.
    pub fn boost(&mut self) {
        self.value = f64::min(self.ceiling, self.value / (self.decay * self.decay));
    }
}

/// Returns a perturbed copy of `source` with the same key set.
///
/// Each value receives independent noise drawn from `m * U(-1, 1)`. The source table
/// is not touched.
///
/// # Example
///
/// ```
/// use qswarm_learning::{
///     action::Action, mutation, mutation::MutationMagnitude, q_table::QTable,
///     state::StateKey,
/// };
/// use rand::SeedableRng;
/// use rand_pcg::Pcg32;
///
/// let mut rng = Pcg32::seed_from_u64(0);
/// let mut source = QTable::new();
/// source.set(StateKey::Coarse { x: 0, y: 0 }, Action::Left, 1.0);
///
/// let magnitude = MutationMagnitude::new(0.3, 0.99, 0.01, 0.5);
/// let child = mutation::mutate(&source, &magnitude, &mut rng);
/// let value = child.peek(StateKey::Coarse { x: 0, y: 0 }, Action::Left).unwrap();
/// assert!((value - 1.0).abs() <= 0.3);
/// ```
pub fn mutate<R>(source: &QTable, magnitude: &MutationMagnitude, rng: &mut R) -> QTable
where
    R: Rng + ?Sized,
{
    let m = magnitude.value();
    source
        .iter()
        .map(|(&key, &value)| (key, value + m * rng.random_range(-1.0..1.0)))
        .collect()
}
