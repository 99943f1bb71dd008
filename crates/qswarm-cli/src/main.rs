mod command;
mod model;
mod recorder;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
