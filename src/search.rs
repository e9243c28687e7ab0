//! Depth-limited adversarial search.
//!
//! [`AlphaBeta`] is the searcher used by the custom agent: minimax with
//! alpha-beta pruning over two mutually recursive layers. [`Minimax`] is the
//! same search without pruning; it backs the sample minimax opponent and
//! serves as the reference the pruning search must agree with.
//!
//! All values are expressed in the searching player's frame. Both layers ask
//! terminal states for the utility of that same fixed player rather than the
//! player to move, and both call the heuristic from that player's view.

use fastrand::Rng;
use log::debug;
use thiserror::Error;

use crate::constants::{SCORE_BOUND, Score};
use crate::heuristics::Heuristic;
use crate::isolation::{Action, GameError, Isolation, PlayerId};
use crate::turn::Turn;

/// Why a search did not produce a move.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The turn was stopped. The last reported move is still valid.
    #[error("search interrupted")]
    Interrupted,
    /// The root state has no legal action to choose from.
    #[error("no legal actions to search")]
    NoLegalActions,
    /// A player was asked to move on the opponent's turn.
    #[error("player {expected} asked to move on player {found}'s turn")]
    WrongPlayer { expected: PlayerId, found: PlayerId },
    #[error(transparent)]
    Game(#[from] GameError),
}

/// Outcome of a completed root search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchResult {
    /// Best root action (first seen among equals).
    pub action: Action,
    /// Minimax value of `action` in the searcher's frame.
    pub score: Score,
    /// Nodes visited below the root.
    pub nodes: u64,
}

/// Minimax search with alpha-beta pruning.
pub struct AlphaBeta<H> {
    player: PlayerId,
    heuristic: H,
    nodes: u64,
}

impl<H: Heuristic> AlphaBeta<H> {
    pub fn new(player: PlayerId, heuristic: H) -> Self {
        Self {
            player,
            heuristic,
            nodes: 0,
        }
    }

    /// Nodes visited by the most recent search.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Pick the best action for the player to move, looking `depth` plies ahead.
    pub fn best_move(
        &mut self,
        state: &Isolation,
        depth: u32,
        rng: &mut Rng,
        turn: &Turn,
    ) -> Result<Action, SearchError> {
        Ok(self.search(state, depth, rng, turn)?.action)
    }

    /// Root of the search.
    ///
    /// A random legal action is reported first as a fallback, then every
    /// strict improvement is reported as soon as it is found. The root never
    /// prunes on beta; only the recursive layers cut off.
    ///
    /// # Errors
    /// - [`SearchError::NoLegalActions`] if `state` has no legal action
    /// - [`SearchError::Interrupted`] if `turn` is stopped mid-search
    /// - [`SearchError::Game`] if the engine rejects a generated action
    pub fn search(
        &mut self,
        state: &Isolation,
        depth: u32,
        rng: &mut Rng,
        turn: &Turn,
    ) -> Result<SearchResult, SearchError> {
        self.nodes = 0;
        let actions = state.actions();
        if actions.is_empty() {
            return Err(SearchError::NoLegalActions);
        }

        let mut alpha = -SCORE_BOUND;
        let beta = SCORE_BOUND;
        let mut best_score = -SCORE_BOUND;
        let mut best_move = actions[rng.usize(..actions.len())];
        turn.report(best_move);

        for &action in &actions {
            let child = state.result(action)?;
            let v = self.min_value(&child, alpha, beta, depth.saturating_sub(1), turn)?;
            alpha = alpha.max(v);
            if v > best_score {
                best_score = v;
                best_move = action;
                turn.report(action);
            }
        }

        debug!(
            "alpha-beta depth {depth}: {best_move} scores {best_score} ({} nodes)",
            self.nodes
        );
        Ok(SearchResult {
            action: best_move,
            score: best_score,
            nodes: self.nodes,
        })
    }

    /// Value of a leaf, or `None` if the node must be expanded.
    fn leaf_value(&self, state: &Isolation, depth: u32) -> Option<Score> {
        if state.terminal_test() {
            Some(state.utility(self.player))
        } else if depth == 0 {
            Some(self.heuristic.score(state, self.player))
        } else {
            None
        }
    }

    fn max_value(
        &mut self,
        state: &Isolation,
        mut alpha: Score,
        beta: Score,
        depth: u32,
        turn: &Turn,
    ) -> Result<Score, SearchError> {
        turn.check()?;
        self.nodes += 1;
        if let Some(v) = self.leaf_value(state, depth) {
            return Ok(v);
        }
        let actions = state.actions();
        if actions.is_empty() {
            // Unreachable while terminal detection covers a stuck mover.
            return Ok(self.heuristic.score(state, self.player));
        }

        let mut value = -SCORE_BOUND;
        for action in actions {
            let child = state.result(action)?;
            value = value.max(self.min_value(&child, alpha, beta, depth - 1, turn)?);
            if value >= beta {
                return Ok(value);
            }
            alpha = alpha.max(value);
        }
        Ok(value)
    }

    fn min_value(
        &mut self,
        state: &Isolation,
        alpha: Score,
        mut beta: Score,
        depth: u32,
        turn: &Turn,
    ) -> Result<Score, SearchError> {
        turn.check()?;
        self.nodes += 1;
        if let Some(v) = self.leaf_value(state, depth) {
            return Ok(v);
        }
        let actions = state.actions();
        if actions.is_empty() {
            return Ok(self.heuristic.score(state, self.player));
        }

        let mut value = SCORE_BOUND;
        for action in actions {
            let child = state.result(action)?;
            value = value.min(self.max_value(&child, alpha, beta, depth - 1, turn)?);
            if value <= alpha {
                return Ok(value);
            }
            beta = beta.min(value);
        }
        Ok(value)
    }
}

/// Plain depth-limited minimax, visiting every node.
pub struct Minimax<H> {
    player: PlayerId,
    heuristic: H,
    nodes: u64,
}

impl<H: Heuristic> Minimax<H> {
    pub fn new(player: PlayerId, heuristic: H) -> Self {
        Self {
            player,
            heuristic,
            nodes: 0,
        }
    }

    /// Root of the search. Ties keep the first action in generation order.
    pub fn search(
        &mut self,
        state: &Isolation,
        depth: u32,
        turn: &Turn,
    ) -> Result<SearchResult, SearchError> {
        self.nodes = 0;
        let mut best: Option<(Action, Score)> = None;
        for action in state.actions() {
            let child = state.result(action)?;
            let v = self.value(&child, depth.saturating_sub(1), false, turn)?;
            if best.is_none_or(|(_, score)| v > score) {
                best = Some((action, v));
                turn.report(action);
            }
        }
        let (action, score) = best.ok_or(SearchError::NoLegalActions)?;
        debug!(
            "minimax depth {depth}: {action} scores {score} ({} nodes)",
            self.nodes
        );
        Ok(SearchResult {
            action,
            score,
            nodes: self.nodes,
        })
    }

    fn value(
        &mut self,
        state: &Isolation,
        depth: u32,
        maximizing: bool,
        turn: &Turn,
    ) -> Result<Score, SearchError> {
        turn.check()?;
        self.nodes += 1;
        if state.terminal_test() {
            return Ok(state.utility(self.player));
        }
        if depth == 0 {
            return Ok(self.heuristic.score(state, self.player));
        }
        let actions = state.actions();
        if actions.is_empty() {
            return Ok(self.heuristic.score(state, self.player));
        }

        let mut best = if maximizing { -SCORE_BOUND } else { SCORE_BOUND };
        for action in actions {
            let child = state.result(action)?;
            let v = self.value(&child, depth - 1, !maximizing, turn)?;
            best = if maximizing { best.max(v) } else { best.min(v) };
        }
        Ok(best)
    }
}
