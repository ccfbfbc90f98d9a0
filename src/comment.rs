//! Commentary synthesis from derived statistics.
//!
//! Builds the human-readable text block for a node, for interactive display
//! and for embedding into SGF output. Output is regenerated from analysis
//! state, so identical state always yields identical text. The point-loss
//! threshold and decimal precision are fixed contract values.

use crate::node::NodeId;
use crate::props::PropertyMap;
use crate::tree::GameTree;

/// Point loss below which the sgf comment omits the loss figure.
const POINT_LOSS_MENTION: f64 = 0.5;

/// Independent flags selecting which commentary sections to emit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommentOptions {
    /// File export: scores, win rates, point losses and the undo note.
    pub sgf: bool,
    /// Teaching mode: policy rank of the played move.
    pub teach: bool,
    /// On-screen hints: predicted and top policy moves.
    pub hints: bool,
}

impl CommentOptions {
    /// Everything that belongs in exported files.
    pub fn sgf_export() -> Self {
        Self {
            sgf: true,
            ..Self::default()
        }
    }

    pub fn with_teach(mut self) -> Self {
        self.teach = true;
        self
    }

    pub fn with_hints(mut self) -> Self {
        self.hints = true;
        self
    }
}

/// `"B+3.5"` / `"W+0.5"` score notation; positive scores favor Black.
pub fn format_score(score: f64) -> String {
    let side = if score >= 0.0 { 'B' } else { 'W' };
    format!("{}+{:.1}", side, score.abs())
}

/// `"B 55.0%"` / `"W 62.3%"`: the favored side with its win probability.
pub fn format_win_rate(winrate: f64) -> String {
    let side = if winrate > 0.5 { 'B' } else { 'W' };
    format!("{} {:.1}%", side, winrate.max(1.0 - winrate) * 100.0)
}

impl GameTree {
    /// Synthesize the comment text for a node.
    ///
    /// Root and move-less nodes produce empty text; un-analyzed nodes a
    /// placeholder. Never panics on missing analysis anywhere.
    pub fn comment(&self, id: NodeId, options: CommentOptions) -> String {
        let node = self.get(id);
        let Some(single) = node.single_move() else {
            return String::new();
        };
        if node.parent.is_none() {
            return String::new();
        }

        if !self.analysis_ready(id) {
            return if options.sgf {
                "No analysis available".to_string()
            } else {
                "Analyzing move...".to_string()
            };
        }

        let player = single.player.map(|p| p.initial()).unwrap_or('?');
        let mut text = format!("Move {}: {} {}\n", self.depth(id), player, single.gtp());

        if options.sgf {
            if let Some(score) = self.score(id) {
                text += &format!("Score: {}\n", format_score(score));
            }
            if let Some(winrate) = self.win_rate(id) {
                text += &format!("Win Rate: {}\n", format_win_rate(winrate));
            }
        }

        let parent = node.parent;
        if self.analysis_ready(parent) {
            if options.sgf || options.hints {
                if let Some(top) = self.candidate_moves(parent).first() {
                    if top.gtp != single.gtp() {
                        text += &format!(
                            "Predicted top move was {} ({}).\n",
                            top.gtp,
                            format_score(top.score_lead)
                        );
                        if options.sgf {
                            if let Some(points_lost) = self.points_lost(id) {
                                if points_lost > POINT_LOSS_MENTION {
                                    text +=
                                        &format!("Estimated point loss: {points_lost:.1}\n");
                                }
                            }
                        }
                    } else {
                        text += "Move was predicted best move.\n";
                    }
                }
            }
            if options.sgf || options.hints || options.teach {
                if let Some(ranking) = self.policy_ranking(parent) {
                    let rank = ranking
                        .iter()
                        .position(|(_, mv)| *mv == single)
                        .map(|ix| ix + 1);
                    if let Some(rank) = rank {
                        text += &format!("Move was #{rank} according to policy.\n");
                    }
                    if rank != Some(1) && (options.sgf || options.hints) {
                        let (prob, top) = &ranking[0];
                        text += &format!(
                            "Top policy move was {} ({:.1}%).\n",
                            top.gtp(),
                            prob * 100.0
                        );
                    }
                }
            }
        }

        if node.auto_undo == Some(true) && options.sgf {
            text += "Move was automatically undone in teaching mode.";
        }
        if !node.ai_thoughts.is_empty() {
            text += &format!("\nAI thought process: {}", node.ai_thoughts);
        }
        text
    }

    /// The node's properties for file export, with the synthesized sgf
    /// comment concatenated onto any pre-existing comment value.
    pub fn sgf_properties(&self, id: NodeId) -> PropertyMap {
        let mut properties = self.get(id).properties.clone();
        let comment = self.comment(id, CommentOptions::sgf_export());
        if !comment.is_empty() {
            let existing: String = properties
                .get("C")
                .map(|values| values.concat())
                .unwrap_or_default();
            properties.set("C", vec![existing + &comment]);
        }
        properties
    }
}
