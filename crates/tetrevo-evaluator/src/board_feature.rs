//! Board features scored by the placement evaluator.
//!
//! The agent uses a fixed set of six features. Their order in
//! [`ALL_BOARD_FEATURES`] is the order of the coefficients in
//! [`FeatureWeights`](crate::feature_weights::FeatureWeights) and in persisted
//! weight files:
//!
//! | index | id                   | measures                                |
//! |-------|----------------------|-----------------------------------------|
//! | 0     | `row_transitions`    | horizontal filled/empty changes         |
//! | 1     | `column_transitions` | vertical filled/empty changes           |
//! | 2     | `holes`              | covered empty cells × [`HOLE_SCALE`]    |
//! | 3     | `wells`              | triangular sum of well depths           |
//! | 4     | `max_height`         | tallest column                          |
//! | 5     | `rows_cleared`       | rows cleared by the placement (reward)  |
//!
//! The first five are penalties and conventionally carry non-positive weights; the
//! last one, at [`REWARD_INDEX`], is the reward term.

use std::fmt;

use crate::placement_analysis::PlacementAnalysis;

/// Number of weighted features.
pub const FEATURE_COUNT: usize = 6;

/// Position of the rows-cleared reward term in the weight vector.
pub const REWARD_INDEX: usize = 5;

/// Multiplier applied to the raw hole count.
pub const HOLE_SCALE: f64 = 10.0;

pub trait BoardFeature: fmt::Debug + Send + Sync {
    /// Stable identifier, used as a key in exported models.
    #[must_use]
    fn id(&self) -> &'static str;
    #[must_use]
    fn name(&self) -> &'static str;
    #[must_use]
    fn extract(&self, analysis: &PlacementAnalysis) -> f64;
}

pub const ALL_BOARD_FEATURES: [&dyn BoardFeature; FEATURE_COUNT] = [
    &RowTransitions,
    &ColumnTransitions,
    &Holes,
    &Wells,
    &MaxHeight,
    &RowsCleared,
];

/// Returns the weight index of the feature with the given id.
#[must_use]
pub fn feature_index(id: &str) -> Option<usize> {
    ALL_BOARD_FEATURES.iter().position(|f| f.id() == id)
}

#[derive(Debug, Clone, Copy)]
pub struct RowTransitions;

impl BoardFeature for RowTransitions {
    fn id(&self) -> &'static str {
        "row_transitions"
    }
    fn name(&self) -> &'static str {
        "Row Transitions"
    }
    fn extract(&self, analysis: &PlacementAnalysis) -> f64 {
        analysis.board_analysis().row_transitions().into()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ColumnTransitions;

impl BoardFeature for ColumnTransitions {
    fn id(&self) -> &'static str {
        "column_transitions"
    }
    fn name(&self) -> &'static str {
        "Column Transitions"
    }
    fn extract(&self, analysis: &PlacementAnalysis) -> f64 {
        analysis.board_analysis().column_transitions().into()
    }
}

/// Empty cells below the top of their column, scaled by [`HOLE_SCALE`].
#[derive(Debug, Clone, Copy)]
pub struct Holes;

impl BoardFeature for Holes {
    fn id(&self) -> &'static str {
        "holes"
    }
    fn name(&self) -> &'static str {
        "Holes"
    }
    fn extract(&self, analysis: &PlacementAnalysis) -> f64 {
        f64::from(analysis.board_analysis().num_holes()) * HOLE_SCALE
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Wells;

impl BoardFeature for Wells {
    fn id(&self) -> &'static str {
        "wells"
    }
    fn name(&self) -> &'static str {
        "Wells"
    }
    fn extract(&self, analysis: &PlacementAnalysis) -> f64 {
        analysis.board_analysis().wells().into()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MaxHeight;

impl BoardFeature for MaxHeight {
    fn id(&self) -> &'static str {
        "max_height"
    }
    fn name(&self) -> &'static str {
        "Max Height"
    }
    #[expect(clippy::cast_precision_loss)]
    fn extract(&self, analysis: &PlacementAnalysis) -> f64 {
        analysis.board_analysis().max_height() as f64
    }
}

/// Rows cleared by the evaluated placement sequence.
///
/// For a two-ply analysis this counts the rows of both placements.
#[derive(Debug, Clone, Copy)]
pub struct RowsCleared;

impl BoardFeature for RowsCleared {
    fn id(&self) -> &'static str {
        "rows_cleared"
    }
    fn name(&self) -> &'static str {
        "Rows Cleared"
    }
    fn extract(&self, analysis: &PlacementAnalysis) -> f64 {
        analysis.rows_cleared().into()
    }
}
