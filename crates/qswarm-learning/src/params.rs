//! Training parameters.
//!
//! [`TrainingParams`] gathers every constant the learner, the evolution step and the
//! adaptive mutation controller use. The defaults reproduce the reference setup:
//!
//! | parameter | default |
//! |---|---|
//! | `alpha` | 0.1 |
//! | `gamma` | 0.9 |
//! | `epsilon` | 0.2 |
//! | `max_episodes` | 2000 |
//! | `population_size` | 10 |
//! | `bucket_size` | 100 |
//! | `action_speed` | 5 |
//! | `initial_mutation_magnitude` | 0.3 |
//! | `mutation_decay` | 0.99 |
//! | `mutation_floor` / `mutation_ceiling` | 0.01 / 0.5 |
//! | `performance_window` | 5 |
//! | `performance_threshold` | 0.9 |
//!
//! Parameters deserialize with `#[serde(default)]`, so a configuration file only has to
//! list the values it overrides.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingParams {
    /// Learning rate of the TD update.
    pub alpha: f64,
    /// Discount factor of the TD update.
    pub gamma: f64,
    /// Probability of taking a uniformly random action.
    pub epsilon: f64,
    /// Ticks without a success before the run signals exhaustion.
    pub max_episodes: u64,
    pub population_size: usize,
    /// Edge length of one state bucket, in arena units.
    pub bucket_size: f64,
    /// Speed an action sets along its axis.
    pub action_speed: f64,
    /// Reward for the winner on a success tick; also added to the winner's score.
    pub success_reward: f64,
    /// Reward for every other agent on a success tick.
    pub loser_penalty: f64,
    /// Reward for hitting a wall or obstacle; also added to the agent's score.
    pub collision_penalty: f64,
    /// Reward on ticks without a success.
    pub idle_reward: f64,
    pub initial_mutation_magnitude: f64,
    pub mutation_decay: f64,
    pub mutation_floor: f64,
    pub mutation_ceiling: f64,
    /// Number of learning-speed samples averaged by the performance tracker.
    pub performance_window: usize,
    /// A window average at or below `previous * threshold` boosts the mutation magnitude.
    pub performance_threshold: f64,
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            gamma: 0.9,
            epsilon: 0.2,
            max_episodes: 2000,
            population_size: 10,
            bucket_size: 100.0,
            action_speed: 5.0,
            success_reward: 1.0,
            loser_penalty: -0.5,
            collision_penalty: -1.0,
            idle_reward: 0.0,
            initial_mutation_magnitude: 0.3,
            mutation_decay: 0.99,
            mutation_floor: 0.01,
            mutation_ceiling: 0.5,
            performance_window: 5,
            performance_threshold: 0.9,
        }
    }
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ParamsError {
    #[display("`{name}` must be within {min}..={max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[display("`{name}` must be positive")]
    Zero { name: &'static str },
    #[display("mutation floor {floor} exceeds ceiling {ceiling}")]
    InvertedMutationBounds { floor: f64, ceiling: f64 },
}

fn check_range(name: &'static str, value: f64, min: f64, max: f64) -> Result<(), ParamsError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ParamsError::OutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}

fn check_finite(name: &'static str, value: f64) -> Result<(), ParamsError> {
    check_range(name, value, f64::MIN, f64::MAX)
}

impl TrainingParams {
    /// Checks that every parameter is usable.
    ///
    /// Probabilities must lie in `[0, 1]`, counts must be non-zero and the mutation
    /// bounds must be ordered and positive.
    pub fn validate(&self) -> Result<(), ParamsError> {
        check_range("alpha", self.alpha, 0.0, 1.0)?;
        check_range("gamma", self.gamma, 0.0, 1.0)?;
        check_range("epsilon", self.epsilon, 0.0, 1.0)?;
        check_range("mutation_decay", self.mutation_decay, f64::MIN_POSITIVE, 1.0)?;
        check_range(
            "performance_threshold",
            self.performance_threshold,
            0.0,
            f64::MAX,
        )?;
        check_range("bucket_size", self.bucket_size, f64::MIN_POSITIVE, f64::MAX)?;
        check_range("mutation_floor", self.mutation_floor, 0.0, f64::MAX)?;
        check_finite("action_speed", self.action_speed)?;
        check_finite("success_reward", self.success_reward)?;
        check_finite("loser_penalty", self.loser_penalty)?;
        check_finite("collision_penalty", self.collision_penalty)?;
        check_finite("idle_reward", self.idle_reward)?;
        check_finite("mutation_ceiling", self.mutation_ceiling)?;
        if self.mutation_floor > self.mutation_ceiling {
            return Err(ParamsError::InvertedMutationBounds {
                floor: self.mutation_floor,
                ceiling: self.mutation_ceiling,
            });
        }
        check_range(
            "initial_mutation_magnitude",
            self.initial_mutation_magnitude,
            self.mutation_floor,
            self.mutation_ceiling,
        )?;
        if self.max_episodes == 0 {
            return Err(ParamsError::Zero {
                name: "max_episodes",
            });
        }
        if self.population_size == 0 {
            return Err(ParamsError::Zero {
                name: "population_size",
            });
        }
        if self.performance_window == 0 {
            return Err(ParamsError::Zero {
                name: "performance_window",
            });
        }
        Ok(())
    }
}
