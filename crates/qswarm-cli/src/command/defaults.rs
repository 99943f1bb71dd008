use std::path::PathBuf;

use qswarm_arena::ArenaLayout;
use qswarm_learning::params::TrainingParams;
use serde::Serialize;

use crate::util::Output;

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum DefaultsKind {
    /// Parameters and layout in one document
    #[default]
    All,
    /// Training parameters, usable with `train --config`
    Params,
    /// Arena layout, usable with `train --layout`
    Layout,
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct DefaultsArg {
    /// Which defaults to print
    #[arg(value_enum, default_value_t)]
    kind: DefaultsKind,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct Defaults {
    params: TrainingParams,
    layout: ArenaLayout,
}

pub(crate) fn run(arg: &DefaultsArg) -> anyhow::Result<()> {
    let output = arg.output.clone();
    match arg.kind {
        DefaultsKind::All => Output::save_json(
            &Defaults {
                params: TrainingParams::default(),
                layout: ArenaLayout::default(),
            },
            output,
        ),
        DefaultsKind::Params => Output::save_json(&TrainingParams::default(), output),
        DefaultsKind::Layout => Output::save_json(&ArenaLayout::default(), output),
    }
}
