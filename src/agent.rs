//! The custom agent: random opening, then fixed-depth alpha-beta.

use fastrand::Rng;
use log::debug;

use crate::constants::{RANDOM_OPENING_PLIES, SEARCH_DEPTH};
use crate::heuristics::HeuristicKind;
use crate::isolation::{Isolation, PlayerId};
use crate::players::Player;
use crate::search::{AlphaBeta, SearchError};
use crate::turn::Turn;

/// Tunables of the custom agent.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    /// Depth bound handed to the searcher.
    pub depth: u32,
    /// Plies played at random before searching.
    pub opening_plies: u32,
    /// Leaf evaluation used by the searcher.
    pub heuristic: HeuristicKind,
    /// Seed for the agent's random source. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            depth: SEARCH_DEPTH,
            opening_plies: RANDOM_OPENING_PLIES,
            heuristic: HeuristicKind::default(),
            seed: None,
        }
    }
}

/// Alpha-beta agent for one seat of the game.
pub struct CustomPlayer {
    player_id: PlayerId,
    config: AgentConfig,
    rng: Rng,
    searches: u32,
}

impl CustomPlayer {
    pub fn new(player_id: PlayerId) -> Self {
        Self::with_config(player_id, AgentConfig::default())
    }

    pub fn with_config(player_id: PlayerId, config: AgentConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => Rng::with_seed(seed),
            None => Rng::new(),
        };
        Self {
            player_id,
            config,
            rng,
            searches: 0,
        }
    }

    pub fn player_id(&self) -> PlayerId {
        self.player_id
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Number of times the searcher has been invoked.
    pub fn searches(&self) -> u32 {
        self.searches
    }

    /// Choose an action for `state` and report it through `turn`.
    ///
    /// While fewer than `opening_plies` plies have been played the agent
    /// reports a uniformly random legal action without searching. Afterwards
    /// it runs alpha-beta to the configured depth; the searcher reports its
    /// fallback and every root improvement, and the final answer is reported
    /// once more on completion.
    ///
    /// # Errors
    /// - [`SearchError::WrongPlayer`] if it is not this agent's turn
    /// - any error raised by the search, including [`SearchError::Interrupted`]
    pub fn get_action(&mut self, state: &Isolation, turn: &Turn) -> Result<(), SearchError> {
        if state.player() != self.player_id {
            return Err(SearchError::WrongPlayer {
                expected: self.player_id,
                found: state.player(),
            });
        }

        if state.ply_count() < self.config.opening_plies {
            let actions = state.actions();
            if actions.is_empty() {
                return Err(SearchError::NoLegalActions);
            }
            let action = actions[self.rng.usize(..actions.len())];
            debug!("player {} opens with {action}", self.player_id);
            turn.report(action);
            return Ok(());
        }

        self.searches += 1;
        let mut search = AlphaBeta::new(self.player_id, self.config.heuristic);
        let action = search.best_move(state, self.config.depth, &mut self.rng, turn)?;
        turn.report(action);
        Ok(())
    }
}

impl Player for CustomPlayer {
    fn name(&self) -> &str {
        "custom"
    }

    fn get_action(&mut self, state: &Isolation, turn: &Turn) -> Result<(), SearchError> {
        CustomPlayer::get_action(self, state, turn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isolation::Action;
    use crate::turn::latest;

    fn seeded(player_id: PlayerId, seed: u64) -> CustomPlayer {
        CustomPlayer::with_config(
            player_id,
            AgentConfig {
                seed: Some(seed),
                ..AgentConfig::default()
            },
        )
    }

    #[test]
    fn test_default_config() {
        let config = AgentConfig::default();
        assert_eq!(config.depth, 4);
        assert_eq!(config.opening_plies, 2);
        assert_eq!(config.heuristic, HeuristicKind::Basic);
    }

    #[test]
    fn test_opening_is_random_and_skips_search() {
        let state = Isolation::new();
        let mut agent = seeded(PlayerId::FIRST, 11);
        let (turn, rx, _stop) = Turn::channel(None);
        agent.get_action(&state, &turn).unwrap();

        let action = latest(&rx).unwrap();
        assert!(state.actions().contains(&action));
        assert_eq!(agent.searches(), 0);
    }

    #[test]
    fn test_same_seed_same_opening() {
        let state = Isolation::new();
        let pick = |seed| {
            let mut agent = seeded(PlayerId::FIRST, seed);
            let (turn, rx, _stop) = Turn::channel(None);
            agent.get_action(&state, &turn).unwrap();
            latest(&rx).unwrap()
        };
        assert_eq!(pick(5), pick(5));
    }

    #[test]
    fn test_searches_after_opening() {
        let state = Isolation::new()
            .result(Action::Place(0))
            .unwrap()
            .result(Action::Place(60))
            .unwrap();
        let mut agent = seeded(PlayerId::FIRST, 1);
        let (turn, rx, _stop) = Turn::channel(None);
        agent.get_action(&state, &turn).unwrap();

        assert_eq!(agent.searches(), 1);
        let action = latest(&rx).unwrap();
        assert!(state.actions().contains(&action));
    }

    #[test]
    fn test_rejects_wrong_player() {
        let state = Isolation::new();
        let mut agent = seeded(PlayerId::SECOND, 0);
        let (turn, _rx, _stop) = Turn::channel(None);
        assert_eq!(
            agent.get_action(&state, &turn),
            Err(SearchError::WrongPlayer {
                expected: PlayerId::SECOND,
                found: PlayerId::FIRST,
            })
        );
    }
}
