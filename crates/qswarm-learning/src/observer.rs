//! Reporting hooks.
//!
//! The training core pushes three kinds of records to a [`TrainingObserver`]:
//!
//! - [`TickReport`] after every post-step hook, with the best and worst agent scores
//! - [`SuccessReport`] whenever an agent reaches the target
//! - [`TrainingStatus`] after every tick and every success
//!
//! `on_chart_reset` is called on each success, marking the point where a per-attempt
//! score history should start over. Observers only read; nothing they do feeds back
//! into training.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::population::AgentId;

/// Scores of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    /// Value of the episode counter when the tick started.
    pub episode: u64,
    pub best_score: f64,
    pub worst_score: f64,
}

/// One arrival at the target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SuccessReport {
    /// 1-based count of successes so far, including this one.
    pub iteration: u64,
    /// Ticks since the previous success.
    pub episodes_taken: u64,
    /// Mutation magnitude before this success decayed it.
    pub mutation_magnitude: f64,
    pub winner: AgentId,
    pub streak: u64,
}

/// Snapshot of the training counters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingStatus {
    pub episode_count: u64,
    pub iterations_count: u64,
    pub last_winner: Option<AgentId>,
    pub success_streak: u64,
    pub mutation_magnitude: f64,
}

impl fmt::Display for TrainingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "episode {} | iteration {} | last winner ",
            self.episode_count, self.iterations_count
        )?;
        match self.last_winner {
            Some(winner) => write!(f, "{winner}")?,
            None => f.write_str("-")?,
        }
        write!(
            f,
            " | streak {} | mutation {:.3}",
            self.success_streak, self.mutation_magnitude
        )
    }
}

pub trait TrainingObserver {
    fn on_tick(&mut self, _report: &TickReport) {}
    fn on_success(&mut self, _report: &SuccessReport) {}
    fn on_chart_reset(&mut self) {}
    fn on_status(&mut self, _status: &TrainingStatus) {}
}

impl TrainingObserver for () {}

impl<T> TrainingObserver for &mut T
where
    T: TrainingObserver + ?Sized,
{
    fn on_tick(&mut self, report: &TickReport) {
        (**self).on_tick(report);
    }

    fn on_success(&mut self, report: &SuccessReport) {
        (**self).on_success(report);
    }

    fn on_chart_reset(&mut self) {
        (**self).on_chart_reset();
    }

    fn on_status(&mut self, status: &TrainingStatus) {
        (**self).on_status(status);
    }
}
