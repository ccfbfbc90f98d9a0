//! Game tree node representation.
//!
//! Each node represents a board position reached by a move (or setup
//! placements) from the parent. The parent link is a non-owning [`NodeId`]
//! index into the tree's arena; children are owned, insertion-ordered ids.

use crate::analysis::AnalysisState;
use crate::moves::{Move, Player};
use crate::props::PropertyMap;

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }
}

/// A node in the game tree.
///
/// The move and placements are fixed at construction; a corrected move is a
/// new child, never a mutation. The `undo_threshold` is sampled once from a
/// uniform [0, 1) distribution at construction and never recomputed, so any
/// probabilistic undo decision against this node is deterministic.
#[derive(Debug, Clone)]
pub struct GameNode {
    /// Parent node index (NONE for root).
    pub parent: NodeId,

    /// Child node indices, in insertion order.
    pub children: Vec<NodeId>,

    /// The move played at this node (None at root and setup-only nodes).
    mv: Option<Move>,

    /// Simultaneous stone placements (setup nodes, e.g. handicap stones).
    placements: Vec<Move>,

    /// Import/export property state for this node.
    pub properties: PropertyMap,

    /// Aggregated engine analysis, created empty at construction.
    pub analysis: AnalysisState,

    /// Teaching-mode verdict: None = unanalyzed, Some(false) = kept,
    /// Some(true) = undone.
    pub auto_undo: Option<bool>,

    /// Free-text engine commentary, appended last to synthesized comments.
    pub ai_thoughts: String,

    undo_threshold: f64,
}

impl GameNode {
    pub(crate) fn new_root(undo_threshold: f64) -> Self {
        Self {
            parent: NodeId::NONE,
            children: Vec::new(),
            mv: None,
            placements: Vec::new(),
            properties: PropertyMap::new(),
            analysis: AnalysisState::new(),
            auto_undo: None,
            ai_thoughts: String::new(),
            undo_threshold,
        }
    }

    pub(crate) fn new_child(
        parent: NodeId,
        mv: Move,
        properties: PropertyMap,
        undo_threshold: f64,
    ) -> Self {
        Self {
            parent,
            children: Vec::new(),
            mv: Some(mv),
            placements: Vec::new(),
            properties,
            analysis: AnalysisState::new(),
            auto_undo: None,
            ai_thoughts: String::new(),
            undo_threshold,
        }
    }

    pub(crate) fn new_setup_child(
        parent: NodeId,
        placements: Vec<Move>,
        properties: PropertyMap,
        undo_threshold: f64,
    ) -> Self {
        Self {
            parent,
            children: Vec::new(),
            mv: None,
            placements,
            properties,
            analysis: AnalysisState::new(),
            auto_undo: None,
            ai_thoughts: String::new(),
            undo_threshold,
        }
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// The move played at this node, if any.
    #[inline]
    pub fn mv(&self) -> Option<Move> {
        self.mv
    }

    #[inline]
    pub fn placements(&self) -> &[Move] {
        &self.placements
    }

    /// Placements first, then the played move, as the ordered list of stones
    /// this node adds to the board.
    pub fn move_with_placements(&self) -> Vec<Move> {
        let mut moves = self.placements.clone();
        moves.extend(self.mv);
        moves
    }

    /// The unique move at this node, when it carries exactly one move or
    /// placement.
    pub fn single_move(&self) -> Option<Move> {
        match (self.mv, self.placements.as_slice()) {
            (Some(mv), []) => Some(mv),
            (None, [placement]) => Some(*placement),
            _ => None,
        }
    }

    /// Whether this node's single move is a pass.
    pub fn is_pass(&self) -> bool {
        self.single_move().is_some_and(|mv| mv.is_pass())
    }

    /// The player who moved at this node.
    #[inline]
    pub fn player(&self) -> Option<Player> {
        self.mv.and_then(|mv| mv.player)
    }

    /// The player to move after this node. Turn alternation when a move was
    /// played; at setup nodes carrying only Black stones, White moves next
    /// (handicap convention); otherwise Black.
    pub fn next_player(&self) -> Player {
        if let Some(player) = self.player() {
            return player.opponent();
        }
        if !self.placements.is_empty()
            && self
                .placements
                .iter()
                .all(|mv| mv.player == Some(Player::Black))
        {
            return Player::White;
        }
        Player::Black
    }

    /// The uniform [0, 1) sample fixed at construction.
    #[inline]
    pub fn undo_threshold(&self) -> f64 {
        self.undo_threshold
    }
}
