use std::collections::BTreeMap;

use anyhow::{Context, bail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tetrevo_evaluator::{
    board_feature::{ALL_BOARD_FEATURES, FEATURE_COUNT},
    feature_weights::FeatureWeights,
};
use tetrevo_training::genetic::Individual;

/// A trained weight vector, exported as JSON.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AiModel {
    pub name: String,
    pub trained_at: DateTime<Utc>,
    /// Completed generations of the population the weights came from.
    pub generation: usize,
    /// Rows cleared per game; `None` if the individual was never evaluated.
    pub fitness: Option<u32>,
    /// Weights keyed by feature id.
    pub weights: BTreeMap<String, f64>,
}

impl AiModel {
    pub fn from_individual(name: String, generation: usize, individual: &Individual) -> Self {
        Self {
            name,
            trained_at: Utc::now(),
            generation,
            fitness: individual.fitness(),
            weights: individual
                .weights()
                .iter_by_id()
                .map(|(id, w)| (id.to_owned(), w))
                .collect(),
        }
    }

    /// Orders the weights by feature; every feature must be present exactly once.
    pub fn to_feature_weights(&self) -> anyhow::Result<FeatureWeights> {
        if let Some(id) = self
            .weights
            .keys()
            .find(|id| ALL_BOARD_FEATURES.iter().all(|f| f.id() != id.as_str()))
        {
            bail!("Feature ID {id} in model not found");
        }
        let mut weights = [0.0; FEATURE_COUNT];
        for (w, feature) in weights.iter_mut().zip(ALL_BOARD_FEATURES) {
            *w = *self
                .weights
                .get(feature.id())
                .with_context(|| format!("Model has no weight for feature {}", feature.id()))?;
        }
        Ok(FeatureWeights::new(weights))
    }
}
