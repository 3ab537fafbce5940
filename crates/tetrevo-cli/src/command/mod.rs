use clap::{Parser, Subcommand};

use self::{auto_play::AutoPlayArg, show_population::ShowPopulationArg, train::TrainArg};
use crate::logging;

mod auto_play;
mod show_population;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Log at debug level (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Evolve feature weights with the genetic algorithm
    Train(#[clap(flatten)] TrainArg),
    /// Let the agent play games with a trained or built-in weight vector
    AutoPlay(#[clap(flatten)] AutoPlayArg),
    /// Summarize a population file written by `train`
    ShowPopulation(#[clap(flatten)] ShowPopulationArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    logging::init(args.verbose)?;
    match args.mode {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::AutoPlay(arg) => auto_play::run(&arg)?,
        Mode::ShowPopulation(arg) => show_population::run(&arg)?,
    }
    Ok(())
}
