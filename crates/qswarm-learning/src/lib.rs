//! Multi-agent tabular Q-learning with winner-take-all evolution.
//!
//! A fixed population of agents learns to reach a target in a 2-D environment. Each
//! agent owns a Q-table over discretized states and four movement actions. When an
//! agent reaches the target, every other agent is replaced by a mutated copy of the
//! winner, and the mutation magnitude adapts to how quickly successes follow each other.
//!
//! # How Training Works
//!
//! 1. **Spawn** - [`Trainer::new`](trainer::Trainer::new) creates the population at the
//!    environment's start position with empty tables
//! 2. **Collisions** - for every contact that began during a step, the environment calls
//!    [`Trainer::on_collision`](trainer::Trainer::on_collision); target contacts trigger
//!    evolution, wall and obstacle contacts are penalized
//! 3. **Post-step** - once per step, [`Trainer::after_step`](trainer::Trainer::after_step)
//!    runs the default update for every agent and sets its next velocity
//! 4. **Exhaustion** - after `max_episodes` ticks without a success the trainer reports
//!    [`TickOutcome::Exhausted`](episode::TickOutcome::Exhausted) and stops updating; the
//!    caller rebuilds the environment and starts over
//!
//! # Architecture
//!
//! ```text
//! Environment (qswarm-arena)
//!     ↓ collision / post-step hooks
//! Trainer
//!     ├── EvolutionManager   success, penalties, cloning
//!     ├── EpisodeController  per-tick updates, exhaustion
//!     └── TrainingState      counters, mutation magnitude, performance window
//!             ↓ uses
//! Learner = StateEncoder + EpsilonGreedy + TdUpdate
//!     ↓ reads and writes
//! QTable (one per agent, lazily initialized)
//! ```
//!
//! # Learning Parameters
//!
//! All constants live in [`TrainingParams`](params::TrainingParams), which deserializes
//! from partial JSON. See the [`params`] module for defaults.
//!
//! # State Resolutions
//!
//! The default update chooses and updates actions in the extended state (position and
//! velocity signs) but bootstraps from the coarse, position-only state. Collision updates
//! are coarse on both sides. See [`state`] for the encodings.
//!
//! # Reproducibility
//!
//! Every random draw, including lazy Q-table initialization, comes from a single seeded
//! [`rand_pcg::Pcg32`] owned by the trainer. Q-tables iterate in key order, so the
//! same seed and event sequence reproduce the same tables.

pub mod action;
pub mod episode;
pub mod error;
pub mod evolution;
pub mod learner;
pub mod mutation;
pub mod observer;
pub mod params;
pub mod performance;
pub mod policy;
pub mod population;
pub mod q_table;
pub mod state;
pub mod trainer;
pub mod training_state;
pub mod update;

#[cfg(test)]
mod test_support;
