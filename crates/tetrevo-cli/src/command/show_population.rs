use std::path::PathBuf;

use anyhow::Context;
use tetrevo_evaluator::board_feature::ALL_BOARD_FEATURES;
use tetrevo_training::{genetic::Population, persistence};
use tracing::info;

use crate::{model::ai_model::AiModel, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ShowPopulationArg {
    /// Population file written by `train`
    #[arg(default_value = "weights.txt")]
    path: PathBuf,
    /// Number of individuals to list
    #[arg(long, default_value_t = 10)]
    top: usize,
    /// Export the best individual as a model file
    #[arg(long)]
    export: Option<PathBuf>,
    /// Model name used with --export
    #[arg(long, default_value = "tetrevo")]
    name: String,
}

pub(crate) fn run(arg: &ShowPopulationArg) -> anyhow::Result<()> {
    let population = persistence::read_population(&arg.path, None)
        .with_context(|| format!("Failed to read population file: {}", arg.path.display()))?;
    print!("{}", render_summary(&population, arg.top));

    if let Some(path) = &arg.export {
        let best = population.best().context("Population file is empty")?;
        let model = AiModel::from_individual(arg.name.clone(), population.generation(), best);
        Output::save_json(&model, Some(path.clone()))?;
        info!(name = %model.name, path = %path.display(), "model exported");
    }
    Ok(())
}

fn render_summary(population: &Population, top: usize) -> String {
    let evaluated = population
        .individuals()
        .iter()
        .filter(|ind| ind.is_evaluated())
        .count();
    let mut lines = vec![
        format!("generation: {}", population.generation()),
        format!("individuals: {} ({evaluated} evaluated)", population.len()),
    ];
    if let Some(stats) = population.compute_fitness_stats() {
        lines.push(format!(
            "fitness: best {} / median {} / mean {:.1} / worst {} / std dev {:.1}",
            stats.max, stats.median, stats.mean, stats.min, stats.std_dev
        ));
    }

    lines.push(String::new());
    let header = ALL_BOARD_FEATURES
        .iter()
        .map(|feature| format!(" {:>18}", feature.id()))
        .collect::<String>();
    lines.push(format!("{:>4} {:>8}{header}", "rank", "fitness"));
    for (rank, individual) in population.individuals().iter().take(top).enumerate() {
        let fitness = individual
            .fitness()
            .map_or_else(|| "-".to_owned(), |f| f.to_string());
        let weights = individual
            .weights()
            .as_array()
            .iter()
            .map(|w| format!(" {w:>18.6}"))
            .collect::<String>();
        lines.push(format!("{:>4} {fitness:>8}{weights}", rank + 1));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
