//! The consumed analysis-engine capability.
//!
//! The core does not own the evaluation engine; it only needs the ability to
//! submit a position (with an optional move-refinement target) at a priority
//! and eventually receive a structured result, or never receive one. Retries,
//! process lifecycle and protocol framing belong to the engine collaborator.

use std::sync::Mutex;

use thiserror::Error;

use crate::analysis::EngineResult;
use crate::moves::Move;
use crate::node::NodeId;
use crate::tree::GameTree;

/// Errors from submitting an analysis request.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine unavailable: {0}")]
    Unavailable(String),

    #[error("request rejected: {0}")]
    Rejected(String),
}

/// One-shot completion callback: invoked at most once per accepted request.
/// A superseded or cancelled request simply never delivers.
pub type CompletionHandler = Box<dyn FnOnce(&mut GameTree, EngineResult) + Send>;

/// Parameters for one analysis request.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisQuery {
    /// Scheduling priority; higher runs sooner.
    pub priority: i32,

    /// Visit budget; None lets the engine pick.
    pub max_visits: Option<u32>,

    /// Whether the engine may cut the search off on its time limit.
    pub time_limit: bool,

    /// When set, refine this single candidate move instead of analyzing the
    /// whole position; the result is reinterpreted per
    /// [`EngineResult::Refined`].
    pub refine_move: Option<Move>,
}

impl AnalysisQuery {
    /// Priority for the active position the user is looking at.
    pub const PRIORITY_DEFAULT: i32 = 0;
    /// Priority for background sweeps over the rest of the game.
    pub const PRIORITY_SWEEP: i32 = -100;
    /// Priority for extra per-move refinement passes.
    pub const PRIORITY_REFINE: i32 = -50;

    pub fn new() -> Self {
        Self {
            priority: Self::PRIORITY_DEFAULT,
            max_visits: None,
            time_limit: true,
            refine_move: None,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_visits(mut self, visits: u32) -> Self {
        self.max_visits = Some(visits);
        self
    }

    pub fn without_time_limit(mut self) -> Self {
        self.time_limit = false;
        self
    }

    /// Turn this into a refinement request for `mv`.
    pub fn refining(mut self, mv: Move) -> Self {
        self.refine_move = Some(mv);
        self.priority = Self::PRIORITY_REFINE;
        self
    }
}

impl Default for AnalysisQuery {
    fn default() -> Self {
        Self::new()
    }
}

/// Capability to evaluate positions asynchronously.
///
/// Submitting returns immediately; the handler runs later, at most once, when
/// the collaborator completes the request.
pub trait AnalysisEngine: Send + Sync {
    fn request_analysis(
        &self,
        node: NodeId,
        query: AnalysisQuery,
        on_complete: CompletionHandler,
    ) -> Result<(), EngineError>;
}

/// An accepted request held by [`RecordingEngine`].
pub struct PendingRequest {
    pub node: NodeId,
    pub query: AnalysisQuery,
    pub handler: CompletionHandler,
}

/// Test double: queues accepted requests and lets the caller complete them in
/// any order, which is how out-of-order convergence gets exercised.
#[derive(Default)]
pub struct RecordingEngine {
    pending: Mutex<Vec<PendingRequest>>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    /// Remove and return the request at `index` (submission order).
    pub fn take(&self, index: usize) -> Option<PendingRequest> {
        let mut pending = self.pending.lock().unwrap();
        if index < pending.len() {
            Some(pending.remove(index))
        } else {
            None
        }
    }

    /// Complete the request at `index` with `result`, delivering it into the
    /// tree. Returns false if no such request is pending.
    pub fn complete(&self, index: usize, tree: &mut GameTree, result: EngineResult) -> bool {
        match self.take(index) {
            Some(request) => {
                (request.handler)(tree, result);
                true
            }
            None => false,
        }
    }

    /// Drop all pending requests without completing them (supersede/cancel:
    /// the handlers never run, the tree keeps its pre-merge state).
    pub fn cancel_all(&self) -> usize {
        let mut pending = self.pending.lock().unwrap();
        let cancelled = pending.len();
        pending.clear();
        cancelled
    }
}

impl AnalysisEngine for RecordingEngine {
    fn request_analysis(
        &self,
        node: NodeId,
        query: AnalysisQuery,
        on_complete: CompletionHandler,
    ) -> Result<(), EngineError> {
        self.pending.lock().unwrap().push(PendingRequest {
            node,
            query,
            handler: on_complete,
        });
        Ok(())
    }
}
