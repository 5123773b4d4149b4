//! Monte Carlo Tree Search (MCTS) over [`GameState`]s.
//!
//! This module implements plain UCT with:
//! - UCB1 selection plus a route-length heuristic bonus
//! - Full expansion of a leaf on its first visit
//! - Biased random rollouts from [`crate::playout`]
//! - Strong scores for terminal positions reached inside the tree
//!
//! Nodes live in an arena ([`SearchTree`]) and refer to each other by index.
//! Scores are always kept from the point of view of the player to move at the
//! root (the *target*).

use fastrand::Rng;
use log::{debug, trace};

use crate::action::Action;
use crate::config::SearchConfig;
use crate::constants::REPORT_PERIOD;
use crate::error::{Error, Result};
use crate::game::{GameState, PlayerId};
use crate::playout::rollout;

/// Index of a node in its [`SearchTree`].
pub type NodeId = usize;

/// The root is always the first node allocated.
pub const ROOT: NodeId = 0;

/// A node in the search tree.
pub struct TreeNode {
    /// The game position at this node
    pub state: GameState,
    /// The action that led here from the parent (`None` at the root)
    pub action: Option<Action>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Number of visits
    pub visits: u32,
    /// Accumulated score for the target player
    pub score: f64,
}

impl TreeNode {
    fn new(state: GameState, action: Option<Action>, parent: Option<NodeId>) -> Self {
        Self {
            state,
            action,
            parent,
            children: Vec::new(),
            visits: 0,
            score: 0.0,
        }
    }

    /// Mean score, or `0.0` when unvisited.
    #[inline]
    pub fn average(&self) -> f64 {
        if self.visits > 0 {
            self.score / self.visits as f64
        } else {
            0.0
        }
    }
}

/// Arena holding every node of one search.
pub struct SearchTree {
    nodes: Vec<TreeNode>,
    target: PlayerId,
}

impl SearchTree {
    /// Start a tree rooted at a copy of `root`.
    pub fn new(root: &GameState) -> Self {
        Self {
            nodes: vec![TreeNode::new(root.clone(), None, None)],
            target: root.current_turn(),
        }
    }

    /// The player whose wins count as `1.0`.
    #[inline]
    pub fn target(&self) -> PlayerId {
        self.target
    }

    #[inline]
    pub fn root(&self) -> &TreeNode {
        &self.nodes[ROOT]
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Create one child per valid action of `id`'s state.
    ///
    /// Does nothing if the node already has children.
    pub fn expand(&mut self, id: NodeId) {
        if !self.nodes[id].children.is_empty() {
            return;
        }
        let actions = self.nodes[id].state.valid_actions();
        let mut children = Vec::with_capacity(actions.len());
        for action in actions {
            let mut state = self.nodes[id].state.clone();
            state.do_action(&action);
            let child = self.nodes.len();
            self.nodes.push(TreeNode::new(state, Some(action), Some(id)));
            children.push(child);
        }
        self.nodes[id].children = children;
    }

    /// UCB1 value of `id` plus the weighted heuristic.
    ///
    /// Unvisited nodes are infinitely urgent.
    fn urgency(&self, id: NodeId, parent_visits: u32, config: &SearchConfig) -> f64 {
        let node = &self.nodes[id];
        if node.visits == 0 {
            return f64::INFINITY;
        }
        let visits = node.visits as f64;
        let exploration = (config.exploration * (parent_visits as f64).ln() / visits).sqrt();
        node.score / visits + exploration + config.heuristic_weight * heuristic(&node.state)
    }

    /// The most urgent of `candidates`, ties broken at random.
    fn most_urgent(
        &self,
        candidates: &[NodeId],
        parent_visits: u32,
        config: &SearchConfig,
        rng: &mut Rng,
    ) -> Option<NodeId> {
        let mut best = f64::NEG_INFINITY;
        let mut tied = Vec::new();
        for &id in candidates {
            let value = self.urgency(id, parent_visits, config);
            if value > best {
                best = value;
                tied.clear();
                tied.push(id);
            } else if value == best {
                tied.push(id);
            }
        }
        if tied.is_empty() {
            return None;
        }
        Some(tied[rng.usize(..tied.len())])
    }

    /// Descend from the root to a node without children.
    pub fn tree_descend(&self, config: &SearchConfig, rng: &mut Rng) -> NodeId {
        let mut id = ROOT;
        loop {
            let node = &self.nodes[id];
            match self.most_urgent(&node.children, node.visits, config, rng) {
                Some(child) => id = child,
                None => return id,
            }
        }
    }

    /// Add one visit and `score` to `id` and every ancestor.
    pub fn tree_update(&mut self, id: NodeId, score: f64) {
        let mut current = Some(id);
        while let Some(i) = current {
            let node = &mut self.nodes[i];
            node.visits += 1;
            node.score += score;
            current = node.parent;
        }
    }

    /// Back up a terminal node won by `winner`.
    ///
    /// The terminal node gets `+terminal_score` for a target win and
    /// `-terminal_score` otherwise, its parent always gets `-terminal_score`,
    /// and older ancestors get the ordinary `1.0`/`0.0`. Every node on the
    /// path gains one visit.
    pub fn terminal_update(&mut self, id: NodeId, winner: PlayerId, config: &SearchConfig) {
        let big = config.terminal_score;
        let won = winner == self.target;

        let node = &mut self.nodes[id];
        node.visits += 1;
        node.score += if won { big } else { -big };

        let mut current = node.parent;
        let mut depth = 1;
        while let Some(i) = current {
            let node = &mut self.nodes[i];
            node.visits += 1;
            node.score += match (depth, won) {
                (1, _) => -big,
                (_, true) => 1.0,
                (_, false) => 0.0,
            };
            depth += 1;
            current = node.parent;
        }
    }

    /// The root child ranked highest by the selection formula.
    pub fn best_move(&self, config: &SearchConfig, rng: &mut Rng) -> Option<NodeId> {
        let root = self.root();
        self.most_urgent(&root.children, root.visits, config, rng)
    }

    /// Log statistics for the root's children.
    pub fn dump_children(&self) {
        for &id in &self.root().children {
            let child = &self.nodes[id];
            if let Some(action) = &child.action {
                debug!(
                    "{action} v={} score={:.1} avg={:.3}",
                    child.visits,
                    child.score,
                    child.average()
                );
            }
        }
    }
}

/// Route-length advantage of the player who just acted in `state`.
///
/// Positive when that player is closer to their goal than the player now to
/// move. Zero when either route is missing.
pub fn heuristic(state: &GameState) -> f64 {
    let actor = state.opponent();
    let other = state.current_player();
    match (other.distance_to_goal(), actor.distance_to_goal()) {
        (Some(theirs), Some(mine)) => theirs as f64 - mine as f64,
        _ => 0.0,
    }
}

/// The action picked by a search and the position it leads to.
#[derive(Clone, Debug)]
pub struct SearchResult {
    pub action: Action,
    pub state: GameState,
    /// Visits of the chosen child
    pub visits: u32,
    /// Mean score of the chosen child for the player who searched
    pub average: f64,
}

/// Run `config.iterations` MCTS iterations on `tree`.
///
/// `on_progress` receives the completed percentage after every iteration.
pub fn tree_search<F>(
    tree: &mut SearchTree,
    config: &SearchConfig,
    rng: &mut Rng,
    mut on_progress: F,
) -> Result<NodeId>
where
    F: FnMut(u8),
{
    if let Some(winner) = tree.root().state.check_winner(false) {
        return Err(Error::GameOver { winner });
    }

    // Initialize root if necessary
    tree.expand(ROOT);
    if tree.root().children.is_empty() {
        return Err(Error::NoValidActions);
    }

    let total = config.iterations.max(1);
    for i in 0..config.iterations {
        let leaf = tree.tree_descend(config, rng);

        if let Some(winner) = tree.node(leaf).state.check_winner(false) {
            trace!("iteration {i}: terminal node won by {winner}");
            tree.terminal_update(leaf, winner, config);
        } else {
            tree.expand(leaf);
            let winner = rollout(&tree.node(leaf).state, config, rng);
            let score = if winner == tree.target() { 1.0 } else { 0.0 };
            tree.tree_update(leaf, score);
        }

        let done = i + 1;
        on_progress((done * 100 / total) as u8);
        if done % REPORT_PERIOD == 0 {
            debug!(
                "{done}/{} iterations, {} nodes, root avg {:.3}",
                config.iterations,
                tree.len(),
                tree.root().average()
            );
        }
    }

    tree.dump_children();
    tree.best_move(config, rng).ok_or(Error::NoValidActions)
}

/// Search from `root` with a generator seeded from `config.seed`, or from
/// entropy when no seed is set.
pub fn search<F>(root: &GameState, config: &SearchConfig, on_progress: F) -> Result<SearchResult>
where
    F: FnMut(u8),
{
    let mut rng = match config.seed {
        Some(seed) => Rng::with_seed(seed),
        None => Rng::new(),
    };
    search_with_rng(root, config, &mut rng, on_progress)
}

/// Search from `root` drawing randomness from `rng`.
pub fn search_with_rng<F>(
    root: &GameState,
    config: &SearchConfig,
    rng: &mut Rng,
    on_progress: F,
) -> Result<SearchResult>
where
    F: FnMut(u8),
{
    config.validate()?;
    let mut tree = SearchTree::new(root);
    let best = tree_search(&mut tree, config, rng, on_progress)?;
    let node = tree.node(best);
    let action = node.action.ok_or(Error::NoValidActions)?;
    debug!(
        "{} picks {action} after {} visits (avg {:.3})",
        tree.target(),
        node.visits,
        node.average()
    );
    Ok(SearchResult {
        action,
        state: node.state.clone(),
        visits: node.visits,
        average: node.average(),
    })
}
