use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use qswarm_arena::{Arena, ArenaLayout};
use qswarm_learning::{episode::TickOutcome, params::TrainingParams, trainer::Trainer};
use rand::Rng as _;

use crate::{
    model::report::{AttemptEnd, AttemptRecord, TrainingReport},
    recorder::RunRecorder,
    util::{self, Output},
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Training parameters JSON file; missing fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Arena layout JSON file; missing fields keep their defaults
    #[arg(long)]
    layout: Option<PathBuf>,
    /// Seed of the first attempt; drawn at random if omitted
    #[arg(long)]
    pub(super) seed: Option<u64>,
    /// Number of agents, overriding the config file
    #[arg(long)]
    pub(super) population: Option<usize>,
    /// Ticks without a success before an attempt is abandoned, overriding the config file
    #[arg(long)]
    max_episodes: Option<u64>,
    /// Total tick budget across all attempts
    #[arg(long, default_value_t = 100_000)]
    max_ticks: u64,
    /// How many times a fresh arena and trainer replace an exhausted attempt
    #[arg(long, default_value_t = 0)]
    pub(super) restarts: u32,
    /// Ticks between status lines; 0 disables them
    #[arg(long, default_value_t = 1000)]
    status_interval: u64,
    /// Report name
    #[arg(long, default_value = "qswarm")]
    name: String,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

fn load_params(arg: &TrainArg) -> anyhow::Result<TrainingParams> {
    let mut params: TrainingParams =
        util::read_json_or_default("training parameters", arg.config.as_ref())?;
    if let Some(population) = arg.population {
        params.population_size = population;
    }
    if let Some(max_episodes) = arg.max_episodes {
        params.max_episodes = max_episodes;
    }
    params
        .validate()
        .context("Invalid training parameters")?;
    Ok(params)
}

fn load_layout(arg: &TrainArg) -> anyhow::Result<ArenaLayout> {
    let layout: ArenaLayout = util::read_json_or_default("arena layout", arg.layout.as_ref())?;
    layout.validate().context("Invalid arena layout")?;
    Ok(layout)
}

/// Runs one trainer until it is exhausted or the tick budget runs out.
fn run_attempt(
    attempt: u32,
    seed: u64,
    params: &TrainingParams,
    layout: &ArenaLayout,
    tick_budget: u64,
    recorder: &mut RunRecorder,
) -> anyhow::Result<AttemptRecord> {
    let mut arena = Arena::new(layout.clone()).context("Failed to build arena")?;
    let mut trainer = Trainer::new(params.clone(), &mut arena, seed)
        .context("Failed to create trainer")?;
    tracing::info!(attempt, seed, "attempt started");

    let mut end = AttemptEnd::TickLimit;
    for _ in 0..tick_budget {
        for pair in arena.step() {
            trainer
                .on_collision(&mut arena, pair, recorder)
                .context("Training stopped in collision hook")?;
        }
        let outcome = trainer
            .after_step(&mut arena, recorder)
            .context("Training stopped in post-step hook")?;
        if matches!(outcome, TickOutcome::Exhausted(_) | TickOutcome::Halted) {
            end = AttemptEnd::Exhausted;
            break;
        }
    }
    Ok(recorder.finish_attempt(attempt, &trainer, end))
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let params = load_params(arg)?;
    let layout = load_layout(arg)?;
    let seed = arg.seed.unwrap_or_else(|| rand::rng().random());
    tracing::info!(
        seed,
        population = params.population_size,
        max_episodes = params.max_episodes,
        max_ticks = arg.max_ticks,
        "training started"
    );

    let mut recorder = RunRecorder::new(arg.status_interval);
    let mut attempts = vec![];
    let mut total_ticks = 0;
    for attempt in 0..=arg.restarts {
        let budget = arg.max_ticks - total_ticks;
        if budget == 0 {
            break;
        }
        let record = run_attempt(
            attempt,
            seed.wrapping_add(u64::from(attempt)),
            &params,
            &layout,
            budget,
            &mut recorder,
        )?;
        total_ticks += record.ticks;
        let end = record.end;
        attempts.push(record);
        if end == AttemptEnd::TickLimit {
            break;
        }
    }

    let report = TrainingReport {
        name: arg.name.clone(),
        trained_at: Utc::now(),
        seed,
        params,
        layout,
        total_ticks,
        attempts,
    };
    Output::save_json(&report, arg.output.clone())?;

    eprintln!();
    eprintln!("Training finished");
    if let Some(path) = &arg.output {
        eprintln!("  Path: {}", path.display());
    }
    eprintln!("  Name: {}", report.name);
    eprintln!("  Trained at: {}", report.trained_at);
    eprintln!("  Seed: {}", report.seed);
    eprintln!("  Ticks: {}", report.total_ticks);
    for attempt in &report.attempts {
        eprintln!(
            "  Attempt #{}: {:?} after {} ticks, {} successes, {} table entries",
            attempt.attempt,
            attempt.end,
            attempt.ticks,
            attempt.successes.len(),
            attempt.table_entries,
        );
        if let Some(stats) = &attempt.episodes_to_success {
            eprintln!(
                "    Episodes per success: min {:.0}, median {:.1}, mean {:.1}, max {:.0}",
                stats.min, stats.median, stats.mean, stats.max
            );
        }
        eprintln!("    {}", attempt.final_status);
    }

    Ok(())
}
