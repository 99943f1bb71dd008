use qswarm_learning::{
    observer::{SuccessReport, TickReport, TrainingObserver, TrainingStatus},
    trainer::Trainer,
};

use crate::model::report::{AttemptEnd, AttemptRecord, EpisodeStats};

/// Observer that keeps what the report needs and logs periodic status lines.
#[derive(Debug)]
pub struct RunRecorder {
    status_interval: u64,
    ticks: u64,
    /// Tick count of the last logged status line.
    last_logged: Option<u64>,
    successes: Vec<SuccessReport>,
    score_history: Vec<TickReport>,
}

impl RunRecorder {
    /// `status_interval` is the number of ticks between status lines; 0 disables them.
    pub fn new(status_interval: u64) -> Self {
        Self {
            status_interval,
            ticks: 0,
            last_logged: None,
            successes: vec![],
            score_history: vec![],
        }
    }

    /// Closes the current attempt and starts recording a new one.
    pub fn finish_attempt(
        &mut self,
        attempt: u32,
        trainer: &Trainer,
        end: AttemptEnd,
    ) -> AttemptRecord {
        let successes = std::mem::take(&mut self.successes);
        self.last_logged = None;
        let record = AttemptRecord {
            attempt,
            seed: trainer.seed(),
            end,
            ticks: std::mem::take(&mut self.ticks),
            episodes_to_success: EpisodeStats::from_successes(&successes),
            successes,
            score_history: std::mem::take(&mut self.score_history),
            final_status: trainer.status(),
            table_entries: trainer.population().table_entries(),
        };
        tracing::info!(
            attempt,
            ?end,
            ticks = record.ticks,
            successes = record.successes.len(),
            "attempt finished"
        );
        record
    }
}

impl TrainingObserver for RunRecorder {
    fn on_tick(&mut self, report: &TickReport) {
        self.ticks += 1;
        self.score_history.push(*report);
    }

    fn on_success(&mut self, report: &SuccessReport) {
        self.successes.push(*report);
    }

    fn on_chart_reset(&mut self) {
        self.score_history.clear();
    }

    fn on_status(&mut self, status: &TrainingStatus) {
        // a success and the tick before it share a tick count; log that count once
        if self.status_interval > 0
            && self.ticks % self.status_interval == 0
            && self.last_logged != Some(self.ticks)
        {
            self.last_logged = Some(self.ticks);
            tracing::info!("{status}");
        }
    }
}

#[cfg(test)]
mod tests {
    use qswarm_arena::{Arena, ArenaLayout};
    use qswarm_learning::{params::TrainingParams, population::AgentId};

    use super::*;

    fn tick(episode: u64) -> TickReport {
        TickReport {
            episode,
            best_score: 0.0,
            worst_score: -1.0,
        }
    }

    #[test]
    fn chart_reset_clears_history() {
        let mut recorder = RunRecorder::new(0);
        recorder.on_tick(&tick(0));
        recorder.on_tick(&tick(1));
        recorder.on_success(&SuccessReport {
            iteration: 1,
            episodes_taken: 2,
            mutation_magnitude: 0.3,
            winner: AgentId(1),
            streak: 0,
        });
        recorder.on_chart_reset();
        recorder.on_tick(&tick(0));
        assert_eq!(recorder.score_history, vec![tick(0)]);
        assert_eq!(recorder.ticks, 3);
    }

    #[test]
    fn finish_attempt_resets_recorder() {
        let mut arena = Arena::new(ArenaLayout::default()).unwrap();
        let params = TrainingParams {
            population_size: 2,
            ..TrainingParams::default()
        };
        let trainer = Trainer::new(params, &mut arena, 3).unwrap();
        let mut recorder = RunRecorder::new(0);
        recorder.on_tick(&tick(0));

        let record = recorder.finish_attempt(0, &trainer, AttemptEnd::Exhausted);
        assert_eq!(record.ticks, 1);
        assert_eq!(record.seed, 3);
        assert_eq!(record.score_history.len(), 1);
        assert!(record.episodes_to_success.is_none());
        assert_eq!(recorder.ticks, 0);
        assert!(recorder.score_history.is_empty());
    }

    #[test]
    fn status_logged_once_per_interval() {
        let status = TrainingStatus {
            episode_count: 0,
            iterations_count: 0,
            last_winner: None,
            success_streak: 0,
            mutation_magnitude: 0.3,
        };
        let mut recorder = RunRecorder::new(2);
        recorder.on_tick(&tick(0));
        recorder.on_status(&status);
        assert_eq!(recorder.last_logged, None);

        recorder.on_tick(&tick(1));
        recorder.on_status(&status);
        assert_eq!(recorder.last_logged, Some(2));

        // success status right after the logged tick
        recorder.on_status(&status);
        assert_eq!(recorder.last_logged, Some(2));
    }
}
