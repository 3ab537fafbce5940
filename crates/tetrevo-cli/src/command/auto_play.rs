use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use rand::Rng as _;
use tetrevo_engine::{GameState, PieceSeed};
use tetrevo_evaluator::{
    feature_weights::FeatureWeights,
    placement_evaluator::FeatureBasedPlacementEvaluator,
    turn_evaluator::{SearchDepth, TurnEvaluator},
};
use tetrevo_training::persistence;
use tracing::info;

use crate::{
    model::play_record::{GameRecord, PlayRecord},
    util,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct AutoPlayArg {
    /// Model file (JSON) exported by `train`
    #[arg(long, conflicts_with = "weights_file")]
    model: Option<PathBuf>,
    /// Population file; plays with its first (best ranked) individual
    #[arg(long)]
    weights_file: Option<PathBuf>,
    /// Number of games to play
    #[arg(long, default_value_t = 1)]
    games: usize,
    /// Placements after which a game stops
    #[arg(long, default_value_t = 100_000)]
    move_cap: usize,
    /// Choose moves with 2-ply lookahead
    #[arg(long)]
    lookahead: bool,
    /// Seed of the piece sequences (random if omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Save a JSON record of the games to this file
    #[arg(long)]
    record: Option<PathBuf>,
    /// Print the final board of every game
    #[arg(long)]
    print_board: bool,
}

impl AutoPlayArg {
    fn load_weights(&self) -> anyhow::Result<FeatureWeights> {
        if let Some(path) = &self.model {
            return util::read_ai_model_file(path)?.to_feature_weights();
        }
        if let Some(path) = &self.weights_file {
            let population = persistence::read_population(path, None)
                .with_context(|| format!("Failed to read population file: {}", path.display()))?;
            let best = population.best().context("Population file is empty")?;
            return Ok(*best.weights());
        }
        info!("no model given; using the built-in weights");
        Ok(FeatureWeights::DEFAULT)
    }
}

pub(crate) fn run(arg: &AutoPlayArg) -> anyhow::Result<()> {
    let weights = arg.load_weights()?;
    let depth = if arg.lookahead {
        SearchDepth::Lookahead
    } else {
        SearchDepth::Greedy
    };
    let turn_evaluator =
        TurnEvaluator::new(Box::new(FeatureBasedPlacementEvaluator::new(weights)), depth);

    let seed = arg
        .seed
        .map_or_else(|| rand::rng().random(), PieceSeed::from);
    let mut games = Vec::with_capacity(arg.games);
    for (game, seed) in seed.split(arg.games).into_iter().enumerate() {
        let mut state = GameState::with_seed(seed);
        let stats = turn_evaluator.play_session(&mut state, arg.move_cap);
        info!(
            game,
            %seed,
            placements = stats.placements(),
            rows_cleared = stats.total_rows_cleared(),
            lost = state.is_over(),
            "game finished"
        );
        if arg.print_board {
            println!("game {game}:\n{}", state.board());
        }
        games.push(GameRecord {
            seed,
            lost: state.is_over(),
            stats,
            final_board: state.board().to_string().lines().map(str::to_owned).collect(),
        });
    }

    let total_rows: usize = games.iter().map(|g| g.stats.total_rows_cleared()).sum();
    info!(
        games = games.len(),
        mean_rows_cleared = total_rows.checked_div(games.len()).unwrap_or(0),
        ?depth,
        "auto-play finished"
    );

    if let Some(path) = &arg.record {
        let record = PlayRecord {
            recorded_at: Utc::now(),
            weights: weights
                .iter_by_id()
                .map(|(id, w)| (id.to_owned(), w))
                .collect(),
            depth,
            move_cap: arg.move_cap,
            games,
        };
        util::Output::save_json(&record, Some(path.clone()))?;
        info!(path = %path.display(), "play record saved");
    }
    Ok(())
}
