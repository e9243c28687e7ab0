//! Players and the sample opponents the custom agent is measured against.
//!
//! - [`RandomPlayer`] - uniformly random legal moves
//! - [`GreedyPlayer`] - one-ply lookahead on the basic mobility score
//! - [`MinimaxPlayer`] - fixed-depth minimax without pruning
//! - [`CustomPlayer`](crate::agent::CustomPlayer) - the alpha-beta agent

use std::fmt;
use std::str::FromStr;

use fastrand::Rng;

use crate::agent::{AgentConfig, CustomPlayer};
use crate::constants::MINIMAX_DEPTH;
use crate::heuristics::{Heuristic, HeuristicKind};
use crate::isolation::{Action, Isolation, PlayerId};
use crate::search::{Minimax, SearchError};
use crate::turn::Turn;

/// Something that can take a seat in a game.
///
/// `get_action` reports at least one legal action through `turn` and may
/// report more; the game driver uses the latest report it received in time.
pub trait Player: Send {
    fn name(&self) -> &str;

    fn get_action(&mut self, state: &Isolation, turn: &Turn) -> Result<(), SearchError>;
}

/// Plays a uniformly random legal action.
pub struct RandomPlayer {
    rng: Rng,
}

impl RandomPlayer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Rng::with_seed(seed),
        }
    }
}

impl Player for RandomPlayer {
    fn name(&self) -> &str {
        "random"
    }

    fn get_action(&mut self, state: &Isolation, turn: &Turn) -> Result<(), SearchError> {
        let actions = state.actions();
        if actions.is_empty() {
            return Err(SearchError::NoLegalActions);
        }
        turn.report(actions[self.rng.usize(..actions.len())]);
        Ok(())
    }
}

/// Picks the action whose successor has the best basic score.
pub struct GreedyPlayer {
    player_id: PlayerId,
}

impl GreedyPlayer {
    pub fn new(player_id: PlayerId) -> Self {
        Self { player_id }
    }
}

impl Player for GreedyPlayer {
    fn name(&self) -> &str {
        "greedy"
    }

    fn get_action(&mut self, state: &Isolation, turn: &Turn) -> Result<(), SearchError> {
        let mut best: Option<(Action, f64)> = None;
        for action in state.actions() {
            let score = HeuristicKind::Basic.score(&state.result(action)?, self.player_id);
            if best.is_none_or(|(_, s)| score > s) {
                best = Some((action, score));
            }
        }
        let (action, _) = best.ok_or(SearchError::NoLegalActions)?;
        turn.report(action);
        Ok(())
    }
}

/// Full-width minimax to a fixed depth.
pub struct MinimaxPlayer {
    player_id: PlayerId,
    depth: u32,
    heuristic: HeuristicKind,
}

impl MinimaxPlayer {
    pub fn new(player_id: PlayerId) -> Self {
        Self::with_depth(player_id, MINIMAX_DEPTH)
    }

    pub fn with_depth(player_id: PlayerId, depth: u32) -> Self {
        Self {
            player_id,
            depth,
            heuristic: HeuristicKind::Basic,
        }
    }
}

impl Player for MinimaxPlayer {
    fn name(&self) -> &str {
        "minimax"
    }

    fn get_action(&mut self, state: &Isolation, turn: &Turn) -> Result<(), SearchError> {
        let mut search = Minimax::new(self.player_id, self.heuristic);
        let result = search.search(state, self.depth, turn)?;
        turn.report(result.action);
        Ok(())
    }
}

/// Selectable player types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerKind {
    Random,
    Greedy,
    Minimax,
    Custom,
}

impl PlayerKind {
    pub const ALL: [PlayerKind; 4] = [
        PlayerKind::Random,
        PlayerKind::Greedy,
        PlayerKind::Minimax,
        PlayerKind::Custom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PlayerKind::Random => "random",
            PlayerKind::Greedy => "greedy",
            PlayerKind::Minimax => "minimax",
            PlayerKind::Custom => "custom",
        }
    }

    /// Instantiate a player of this kind for the given seat.
    ///
    /// `config` only applies to [`PlayerKind::Custom`]; `seed` feeds the
    /// random player.
    pub fn build(self, player_id: PlayerId, seed: u64, config: &AgentConfig) -> Box<dyn Player> {
        match self {
            PlayerKind::Random => Box::new(RandomPlayer::new(seed)),
            PlayerKind::Greedy => Box::new(GreedyPlayer::new(player_id)),
            PlayerKind::Minimax => Box::new(MinimaxPlayer::new(player_id)),
            PlayerKind::Custom => Box::new(CustomPlayer::with_config(player_id, config.clone())),
        }
    }
}

impl fmt::Display for PlayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlayerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown player '{s}' (expected random, greedy, minimax or custom)"))
    }
}
