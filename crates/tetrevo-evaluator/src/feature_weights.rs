use std::{iter, ops::Index};

use serde::{Deserialize, Serialize};

use crate::board_feature::{ALL_BOARD_FEATURES, FEATURE_COUNT, REWARD_INDEX};

/// One coefficient per board feature, in [`ALL_BOARD_FEATURES`] order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureWeights([f64; FEATURE_COUNT]);

/// Error returned when a weight slice has the wrong number of entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("expected {FEATURE_COUNT} weights, found {found}")]
pub struct WeightCountError {
    pub found: usize,
}

impl FeatureWeights {
    /// Hand-tuned weights that clear many rows without any training.
    pub const DEFAULT: Self = Self([
        -7.323_298_208_568_506,
        -5.797_158_461_156_61,
        -4.194_861_543_999_046,
        -3.908_041_863_765,
        -7.193_861_810_393_222,
        8.580_230_809_919_557,
    ]);

    #[must_use]
    pub const fn new(weights: [f64; FEATURE_COUNT]) -> Self {
        Self(weights)
    }

    pub fn from_slice(weights: &[f64]) -> Result<Self, WeightCountError> {
        let weights = weights.try_into().map_err(|_| WeightCountError {
            found: weights.len(),
        })?;
        Ok(Self(weights))
    }

    #[must_use]
    pub fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    #[must_use]
    pub fn as_mut_array(&mut self) -> &mut [f64; FEATURE_COUNT] {
        &mut self.0
    }

    /// Returns the coefficient of the rows-cleared reward term.
    #[must_use]
    pub fn reward(&self) -> f64 {
        self.0[REWARD_INDEX]
    }

    /// Iterates `(feature id, weight)` pairs.
    pub fn iter_by_id(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        iter::zip(ALL_BOARD_FEATURES, &self.0).map(|(f, w)| (f.id(), *w))
    }
}

impl Default for FeatureWeights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Index<usize> for FeatureWeights {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}
