//! Derived statistics over the tree.
//!
//! Everything here is a pure read of the target node and, for cross-move
//! comparisons, its parent. Missing analysis always propagates as explicit
//! absence (None or empty), never as stale or fabricated numbers.

use tracing::warn;

use crate::analysis::MoveRecord;
use crate::config::TeachingConfig;
use crate::moves::{player_sign, Move};
use crate::node::NodeId;
use crate::tree::GameTree;

/// One engine-evaluated alternative at a node, ranked for display.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateMove {
    pub gtp: String,
    pub visits: u32,
    pub score_lead: f64,
    pub winrate: Option<f64>,
    /// Engine-assigned rank; [`crate::ORDER_UNRANKED`] when it never ranked
    /// this move.
    pub order: u32,
    /// Evaluation drop versus the position's root score, from the mover's
    /// perspective; 0 is the engine's preferred move.
    pub points_lost: f64,
    pub pv: Option<Vec<String>>,
}

impl CandidateMove {
    fn from_record(record: &MoveRecord, points_lost: f64) -> Self {
        Self {
            gtp: record.gtp.clone(),
            visits: record.visits,
            score_lead: record.score_lead,
            winrate: record.winrate,
            order: record.order,
            points_lost,
            pv: record.pv.clone(),
        }
    }
}

impl GameTree {
    /// Whether at least one full result has merged into this node.
    pub fn analysis_ready(&self, id: NodeId) -> bool {
        self.get(id).analysis.root.is_some()
    }

    /// Score margin of the position; positive favors Black. None until ready.
    pub fn score(&self, id: NodeId) -> Option<f64> {
        self.get(id)
            .analysis
            .root
            .as_ref()
            .map(|root| root.score_lead)
    }

    /// Black's win probability in [0, 1]. None until ready.
    pub fn win_rate(&self, id: NodeId) -> Option<f64> {
        self.get(id).analysis.root.as_ref().map(|root| root.winrate)
    }

    /// How much the evaluation worsened, from the mover's perspective, after
    /// the move actually played. Defined only for a node with a single move,
    /// a parent, and analysis ready on both.
    pub fn points_lost(&self, id: NodeId) -> Option<f64> {
        let node = self.get(id);
        let mv = node.single_move()?;
        if node.parent.is_none() {
            return None;
        }
        let parent_score = self.score(node.parent)?;
        let score = self.score(id)?;
        Some(player_sign(mv.player) * (parent_score - score))
    }

    /// Engine-evaluated alternatives at this node, best move first: sorted
    /// ascending by `(order, points_lost)`.
    ///
    /// Not ready yields empty. A root-only analysis (no per-move records)
    /// synthesizes one candidate from the top policy move with zero points
    /// lost; when the policy is also absent, the ranking stays empty.
    pub fn candidate_moves(&self, id: NodeId) -> Vec<CandidateMove> {
        let node = self.get(id);
        let Some(root) = node.analysis.root.as_ref() else {
            return Vec::new();
        };

        if node.analysis.moves.is_empty() {
            let Some(ranking) = self.policy_ranking(id) else {
                return Vec::new();
            };
            let Some((_, top)) = ranking.first() else {
                return Vec::new();
            };
            return vec![CandidateMove {
                gtp: top.gtp(),
                visits: root.visits,
                score_lead: root.score_lead,
                winrate: Some(root.winrate),
                order: 0,
                points_lost: 0.0,
                pv: None,
            }];
        }

        let sign = node.next_player().sign();
        let mut candidates: Vec<CandidateMove> = node
            .analysis
            .moves
            .values()
            .map(|record| {
                let points_lost = sign * (root.score_lead - record.score_lead);
                CandidateMove::from_record(record, points_lost)
            })
            .collect();
        candidates.sort_by(|a, b| {
            a.order.cmp(&b.order).then(
                a.points_lost
                    .partial_cmp(&b.points_lost)
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
        });
        candidates
    }

    /// The network's raw move preference at this node, highest probability
    /// first: one entry per intersection plus one for pass, attributed to
    /// the player to move. None without a policy.
    pub fn policy_ranking(&self, id: NodeId) -> Option<Vec<(f32, Move)>> {
        let node = self.get(id);
        let policy = node.analysis.policy.as_ref()?;
        let (width, height) = self.board_size();
        let (w, h) = (width as usize, height as usize);
        if policy.len() != w * h + 1 {
            warn!(
                node = id.0,
                len = policy.len(),
                expected = w * h + 1,
                "policy length does not match board, ignoring"
            );
            return None;
        }

        let next = node.next_player();
        let mut moves = Vec::with_capacity(w * h + 1);
        for x in 0..w {
            for y in 0..h {
                let prob = policy[y * w + x];
                moves.push((prob, Move::place(next, (x as u8, y as u8))));
            }
        }
        moves.push((policy[w * h], Move::pass(next)));
        moves.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        Some(moves)
    }

    /// Teaching-mode fractional undo decision. True when the move lost more
    /// than the configured points and the node's fixed undo threshold falls
    /// below the undo fraction; repeated evaluation of the same node always
    /// agrees.
    pub fn should_auto_undo(&self, id: NodeId, config: &TeachingConfig) -> bool {
        let Some(points_lost) = self.points_lost(id) else {
            return false;
        };
        points_lost > config.undo_point_loss
            && self.get(id).undo_threshold() < config.undo_fraction
    }
}
