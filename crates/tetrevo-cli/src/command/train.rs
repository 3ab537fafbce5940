use std::path::PathBuf;

use anyhow::Context;
use tetrevo_training::{
    config::{BreedingStrategy, TrainingConfig},
    trainer::Trainer,
};
use tracing::info;

use crate::{model::ai_model::AiModel, util};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// JSON file with training parameters; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    population_size: Option<usize>,
    /// Generations to run on top of the starting population
    #[arg(long)]
    generations: Option<usize>,
    /// Lowest-ranked individuals replaced every generation
    #[arg(long)]
    replace_count: Option<usize>,
    /// Parent selection and crossover: roulette, tournament or consecutive
    #[arg(long)]
    breeding: Option<BreedingStrategy>,
    /// Choose moves with 2-ply lookahead
    #[arg(long)]
    lookahead: bool,
    /// Games played per fitness evaluation
    #[arg(long)]
    games: Option<usize>,
    /// Placements after which a game stops
    #[arg(long)]
    move_cap: Option<usize>,
    /// Worker threads evaluating fitness
    #[arg(long)]
    max_concurrency: Option<usize>,
    /// Population file, rewritten after every generation
    #[arg(long)]
    weights_file: Option<PathBuf>,
    /// Start from the population in the weights file
    #[arg(long)]
    resume: bool,
    /// Abort when the weights file cannot be read or written
    #[arg(long)]
    strict: bool,
    #[arg(long)]
    seed: Option<u64>,
    /// Model name recorded in the exported JSON
    #[arg(long, default_value = "tetrevo")]
    name: String,
    /// Export the best individual as a JSON model (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

impl TrainArg {
    fn to_config(&self) -> anyhow::Result<TrainingConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_training_config_file(path)?,
            None => TrainingConfig::default(),
        };
        let overrides = [
            (&mut config.population_size, self.population_size),
            (&mut config.generations, self.generations),
            (&mut config.replace_count, self.replace_count),
            (&mut config.games_per_individual, self.games),
            (&mut config.move_cap, self.move_cap),
            (&mut config.max_concurrency, self.max_concurrency),
        ];
        for (field, value) in overrides {
            if let Some(value) = value {
                *field = value;
            }
        }
        if let Some(breeding) = self.breeding {
            config.breeding = breeding;
        }
        if let Some(path) = &self.weights_file {
            config.weights_path.clone_from(path);
        }
        config.seed = self.seed.or(config.seed);
        config.lookahead |= self.lookahead;
        config.resume |= self.resume;
        config.strict_persistence |= self.strict;
        Ok(config)
    }
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let config = arg.to_config()?;
    let weights_path = config.weights_path.clone();

    let mut trainer = Trainer::new(config).context("Failed to set up training")?;
    let population = trainer.run().context("Training failed")?;

    let best = population.best().context("Population is empty")?;
    let model = AiModel::from_individual(arg.name.clone(), population.generation(), best);
    util::Output::save_json(&model, arg.output.clone())?;

    let output = arg
        .output
        .as_ref()
        .map_or_else(|| "stdout".to_owned(), |path| path.display().to_string());
    info!(
        name = %model.name,
        generation = model.generation,
        fitness = ?model.fitness,
        population_file = %weights_path.display(),
        %output,
        "model saved"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser as _;

    use super::*;

    #[derive(Debug, clap::Parser)]
    struct Cli {
        #[clap(flatten)]
        arg: TrainArg,
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from([
            "train",
            "--population-size",
            "10",
            "--replace-count",
            "8",
            "--breeding",
            "tournament",
            "--lookahead",
            "--seed",
            "3",
        ]);
        let config = cli.arg.to_config().unwrap();
        assert_eq!(config.population_size, 10);
        assert_eq!(config.replace_count, 8);
        assert_eq!(config.breeding, BreedingStrategy::Tournament);
        assert!(config.lookahead);
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.generations, TrainingConfig::default().generations);
        assert_eq!(config.validate(), Ok(()));
    }
}
