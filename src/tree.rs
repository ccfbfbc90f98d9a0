//! Game tree with arena allocation.
//!
//! Nodes are stored in a contiguous Vec and referenced by [`NodeId`]
//! indices; the parent link is a non-owning index, so a subtree has no
//! reference cycles and pruning is a local detach. The tree is mutated by
//! one logical actor at a time: structural edits are synchronous, and
//! asynchronous analysis completions land through [`GameTree::merge_analysis`]
//! as atomic steps.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing::debug;

use crate::analysis::EngineResult;
use crate::engine::{AnalysisEngine, AnalysisQuery, EngineError};
use crate::moves::Move;
use crate::node::{GameNode, NodeId};
use crate::props::PropertyMap;

/// Game tree with arena-based node storage.
///
/// Board dimensions come from the board collaborator at construction and are
/// fixed for the tree's lifetime; they drive the policy grid reshape.
#[derive(Debug)]
pub struct GameTree {
    /// Arena storing all nodes. Slots are never reclaimed before the session
    /// ends; pruned subtrees become unreachable.
    nodes: Vec<GameNode>,

    /// Root node index (always 0 after initialization).
    root: NodeId,

    width: u8,
    height: u8,

    /// Source of per-node undo thresholds.
    rng: ChaCha20Rng,
}

impl GameTree {
    /// Create a tree for a `width` x `height` board with an empty root
    /// position.
    pub fn new(width: u8, height: u8) -> Self {
        Self::from_rng(width, height, ChaCha20Rng::from_entropy())
    }

    /// Create a tree with a fixed seed, making every node's undo threshold
    /// reproducible.
    pub fn with_seed(width: u8, height: u8, seed: u64) -> Self {
        Self::from_rng(width, height, ChaCha20Rng::seed_from_u64(seed))
    }

    fn from_rng(width: u8, height: u8, mut rng: ChaCha20Rng) -> Self {
        let root = GameNode::new_root(rng.gen());
        Self {
            nodes: vec![root],
            root: NodeId(0),
            width,
            height,
            rng,
        }
    }

    /// Get the root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Board dimensions as (width, height).
    #[inline]
    pub fn board_size(&self) -> (u8, u8) {
        (self.width, self.height)
    }

    /// Get a reference to a node by ID. Indexing a pruned or foreign id is a
    /// precondition violation and panics.
    #[inline]
    pub fn get(&self, id: NodeId) -> &GameNode {
        &self.nodes[id.0 as usize]
    }

    /// Get a mutable reference to a node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut GameNode {
        &mut self.nodes[id.0 as usize]
    }

    /// Total number of nodes ever allocated, including pruned ones.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append a new child playing `mv` and return its id. Never mutates
    /// siblings; nodes are never re-parented.
    pub fn add_child(&mut self, parent: NodeId, mv: Move, properties: PropertyMap) -> NodeId {
        let threshold = self.rng.gen();
        let child = GameNode::new_child(parent, mv, properties, threshold);
        self.attach(parent, child)
    }

    /// Append a new setup child carrying simultaneous stone placements.
    pub fn add_setup_child(
        &mut self,
        parent: NodeId,
        placements: Vec<Move>,
        properties: PropertyMap,
    ) -> NodeId {
        let threshold = self.rng.gen();
        let child = GameNode::new_setup_child(parent, placements, properties, threshold);
        self.attach(parent, child)
    }

    fn attach(&mut self, parent: NodeId, child: GameNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(child);
        self.get_mut(parent).children.push(id);
        id
    }

    /// Ancestor chain, root first, `id` last. Pure, O(depth).
    pub fn nodes_from_root(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = vec![id];
        let mut current = id;
        while self.get(current).parent.is_some() {
            current = self.get(current).parent;
            path.push(current);
        }
        path.reverse();
        path
    }

    /// Ancestor chain length; the root has depth 0. Equals the move number
    /// for mainline play.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = id;
        while self.get(current).parent.is_some() {
            current = self.get(current).parent;
            depth += 1;
        }
        depth
    }

    /// Detach the whole subtree below `id`. Returns the number of nodes
    /// detached; their ids become unreachable (arena slots are retained
    /// until the session ends).
    pub fn prune_children(&mut self, id: NodeId) -> usize {
        let mut stack = std::mem::take(&mut self.get_mut(id).children);
        let mut detached = 0;
        while let Some(child) = stack.pop() {
            detached += 1;
            stack.extend(std::mem::take(&mut self.get_mut(child).children));
        }
        if detached > 0 {
            debug!(node = id.0, detached, "pruned subtree");
        }
        detached
    }

    /// Submit an analysis request for `id`, wiring the completion handler to
    /// merge the result into that node. Returns as soon as the request is
    /// accepted; the merge runs whenever the engine completes, or never if
    /// the request is superseded.
    pub fn analyze(
        &self,
        id: NodeId,
        engine: &dyn AnalysisEngine,
        query: AnalysisQuery,
    ) -> Result<(), EngineError> {
        engine.request_analysis(
            id,
            query,
            Box::new(move |tree, result| tree.merge_analysis(id, result)),
        )
    }

    /// Merge one structured engine result into the node's analysis state.
    ///
    /// Merges for the same node commute under the monotonic-visits rule, so
    /// any completion order across in-flight requests converges to the same
    /// final state.
    pub fn merge_analysis(&mut self, id: NodeId, result: EngineResult) {
        match &result {
            EngineResult::Full { move_infos, .. } => {
                debug!(node = id.0, moves = move_infos.len(), "merging full analysis");
            }
            EngineResult::Refined { target, .. } => {
                debug!(node = id.0, target = %target.gtp(), "merging refinement");
            }
        }
        self.get_mut(id).analysis.apply(result);
    }
}
