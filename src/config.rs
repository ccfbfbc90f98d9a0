//! Shared configuration values.
//!
//! Thresholds and budgets are passed explicitly into the operations that
//! consume them; nothing here is read as ambient global state. Formatting
//! constants (comment precision, the 0.5-point loss threshold) are fixed
//! contract values and deliberately not configurable.

use serde::Deserialize;

use crate::engine::AnalysisQuery;

fn d_undo_point_loss() -> f64 {
    2.0
}
fn d_undo_fraction() -> f64 {
    1.0
}
fn d_max_visits() -> u32 {
    500
}
fn d_fast_visits() -> u32 {
    25
}

/// Teaching-mode thresholds for the fractional auto-undo decision.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TeachingConfig {
    /// Minimum points lost before a move is a candidate for undoing.
    #[serde(default = "d_undo_point_loss")]
    pub undo_point_loss: f64,

    /// Fraction of over-threshold moves that get undone, in [0, 1]. A node
    /// is undone when its fixed undo threshold falls below this fraction,
    /// so the decision is deterministic per node.
    #[serde(default = "d_undo_fraction")]
    pub undo_fraction: f64,
}

impl Default for TeachingConfig {
    fn default() -> Self {
        Self {
            undo_point_loss: d_undo_point_loss(),
            undo_fraction: d_undo_fraction(),
        }
    }
}

impl TeachingConfig {
    pub fn with_point_loss(mut self, points: f64) -> Self {
        self.undo_point_loss = points;
        self
    }

    pub fn with_fraction(mut self, fraction: f64) -> Self {
        self.undo_fraction = fraction;
        self
    }
}

/// Default visit budgets for analysis requests.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EngineDefaults {
    /// Budget for the position the user is looking at.
    #[serde(default = "d_max_visits")]
    pub max_visits: u32,

    /// Budget for background sweeps over the rest of the game.
    #[serde(default = "d_fast_visits")]
    pub fast_visits: u32,
}

impl Default for EngineDefaults {
    fn default() -> Self {
        Self {
            max_visits: d_max_visits(),
            fast_visits: d_fast_visits(),
        }
    }
}

impl EngineDefaults {
    /// Query for the active position: full budget, default priority.
    pub fn standard_query(&self) -> AnalysisQuery {
        AnalysisQuery::new().with_visits(self.max_visits)
    }

    /// Query for a background sweep: small budget, low priority.
    pub fn sweep_query(&self) -> AnalysisQuery {
        AnalysisQuery::new()
            .with_visits(self.fast_visits)
            .with_priority(AnalysisQuery::PRIORITY_SWEEP)
    }
}
