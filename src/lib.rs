//! Go game tree with streaming engine-analysis aggregation.
//!
//! This crate maintains a persistent tree of game positions and folds
//! asynchronous, out-of-order, variable-fidelity evaluation results from an
//! external engine into consistent per-node state, from which it derives
//! comparable statistics and stable human-readable commentary.
//!
//! # Overview
//!
//! - [`Move`] / [`Player`]: immutable play values with a GTP text codec.
//! - [`PropertyMap`]: ordered tag -> values state for file round-trips.
//! - [`GameTree`] / [`GameNode`]: arena-allocated position tree; parents are
//!   non-owning [`NodeId`] back-references, children owned and
//!   insertion-ordered.
//! - [`AnalysisState`] / [`EngineResult`]: per-node analysis container and
//!   the merge rules for streaming updates — per-move records are replaced
//!   only by strictly higher visit counts, so any completion order converges
//!   to the same state.
//! - Derived statistics ([`GameTree::score`], [`GameTree::points_lost`],
//!   [`GameTree::candidate_moves`], [`GameTree::policy_ranking`]): pure reads
//!   that degrade to explicit absence while analysis is pending.
//! - [`GameTree::comment`] / [`GameTree::sgf_properties`]: commentary
//!   synthesis for display and export.
//! - [`AnalysisEngine`]: the consumed capability to evaluate positions
//!   asynchronously, with one-shot completion handlers.
//!
//! # Usage
//!
//! ```rust,ignore
//! use kifu::{AnalysisQuery, CommentOptions, GameTree, Move, Player, PropertyMap, RecordingEngine};
//!
//! let mut tree = GameTree::new(19, 19);
//! let mv = Move::from_gtp("D4", Player::Black)?;
//! let node = tree.add_child(tree.root(), mv, PropertyMap::new());
//!
//! // Submit to the engine; the result merges whenever it completes.
//! let engine = RecordingEngine::new();
//! tree.analyze(node, &engine, AnalysisQuery::new().with_visits(500))?;
//!
//! // Readers degrade gracefully until then.
//! assert_eq!(tree.score(node), None);
//! assert_eq!(tree.comment(node, CommentOptions::default()), "Analyzing move...");
//! ```

pub mod analysis;
pub mod comment;
pub mod config;
pub mod engine;
pub mod moves;
pub mod node;
pub mod props;
pub mod stats;
pub mod tree;

// Re-export main types
pub use analysis::{
    AnalysisState, EngineResult, MoveInfo, MoveRecord, PayloadError, RootSummary, ORDER_UNRANKED,
};
pub use comment::{format_score, format_win_rate, CommentOptions};
pub use config::{EngineDefaults, TeachingConfig};
pub use engine::{
    AnalysisEngine, AnalysisQuery, CompletionHandler, EngineError, PendingRequest, RecordingEngine,
};
pub use moves::{player_sign, Move, ParseMoveError, Player};
pub use node::{GameNode, NodeId};
pub use props::PropertyMap;
pub use stats::CandidateMove;
pub use tree::GameTree;
