//! Knight-Isolation: a fixed-depth alpha-beta agent for knight's Isolation.
//!
//! Two players take turns moving a token like a chess knight on an 11x9
//! board; every visited cell is blocked, and the first player without a legal
//! move loses. The agent searches the game tree with depth-limited minimax
//! and alpha-beta pruning, scoring cut-off positions with one of several
//! mobility heuristics, and reports its best move so far at every
//! improvement so an external time limit can interrupt it at any point.
//!
//! ## Modules
//!
//! - [`constants`] - Board geometry, search parameters, score sentinels
//! - [`isolation`] - Game state, move generation, terminal detection
//! - [`heuristics`] - Interchangeable evaluation functions
//! - [`search`] - Alpha-beta and plain minimax searchers
//! - [`turn`] - Anytime reporting and cooperative cancellation
//! - [`agent`] - The custom player (random opening, then alpha-beta)
//! - [`players`] - Sample opponents
//! - [`play`] - Time-limited game driver and match runner
//! - [`protocol`] - Text command protocol
//!
//! ## Example
//!
//! ```
//! use knight_isolation::agent::CustomPlayer;
//! use knight_isolation::isolation::{Action, Isolation, PlayerId, parse_coord};
//! use knight_isolation::turn::{Turn, latest};
//!
//! // Both players placed: the agent searches instead of moving at random.
//! let state = Isolation::new()
//!     .result(Action::Place(parse_coord("C3").unwrap()))
//!     .unwrap()
//!     .result(Action::Place(parse_coord("H7").unwrap()))
//!     .unwrap();
//!
//! let mut agent = CustomPlayer::new(PlayerId::FIRST);
//! let (turn, reports, _stop) = Turn::channel(None);
//! agent.get_action(&state, &turn).unwrap();
//! let action = latest(&reports).unwrap();
//! println!("Best move: {action}");
//! ```

pub mod agent;
pub mod constants;
pub mod heuristics;
pub mod isolation;
pub mod play;
pub mod players;
pub mod protocol;
pub mod search;
pub mod turn;
