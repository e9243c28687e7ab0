//! Time-limited game driver and match runner.
//!
//! Each turn runs the active player on a scoped worker thread. The driver
//! listens for reported actions until the time limit expires or the worker
//! finishes, then raises the turn's stop flag and joins the worker. The last
//! action received in time is played. A player that reported nothing loses
//! on time; a player that reported an illegal action or failed loses by
//! forfeit.

use std::sync::atomic::Ordering;
use std::sync::mpsc::RecvTimeoutError;
use std::thread;
use std::time::{Duration, Instant};

use fastrand::Rng;
use log::{debug, info, warn};

use crate::agent::AgentConfig;
use crate::constants::{NUM_ROUNDS, TIME_LIMIT_MS};
use crate::isolation::{Action, Isolation, PlayerId};
use crate::players::{Player, PlayerKind};
use crate::search::SearchError;
use crate::turn::Turn;

/// How a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// The loser had no legal move left.
    Isolated,
    /// The loser reported no action within the time limit.
    Timeout,
    /// The loser reported an illegal action or its search failed.
    Forfeit,
}

/// Complete record of one game.
#[derive(Debug, Clone)]
pub struct GameRecord {
    pub winner: PlayerId,
    pub loser: PlayerId,
    pub reason: EndReason,
    /// Actions in the order they were played.
    pub history: Vec<Action>,
    pub final_state: Isolation,
}

/// Run `player` for one move under `time_limit` and return the action it settled on.
pub fn take_turn(
    player: &mut dyn Player,
    state: &Isolation,
    time_limit: Duration,
) -> Result<Action, EndReason> {
    let deadline = Instant::now() + time_limit;
    let (turn, reports, stop) = Turn::channel(Some(deadline));

    let (latest, outcome) = thread::scope(|s| {
        let worker = s.spawn(move || player.get_action(state, &turn));

        let mut latest = None;
        loop {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            match reports.recv_timeout(deadline - now) {
                Ok(action) => latest = Some(action),
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => break,
            }
        }
        stop.store(true, Ordering::Relaxed);
        (latest, worker.join())
    });

    match outcome {
        Ok(Ok(())) | Ok(Err(SearchError::Interrupted)) => latest.ok_or(EndReason::Timeout),
        Ok(Err(e)) => {
            warn!("player failed: {e}");
            Err(EndReason::Forfeit)
        }
        Err(_) => {
            warn!("player panicked");
            Err(EndReason::Forfeit)
        }
    }
}

/// Play a game to the end from `initial`.
///
/// `players[0]` moves on even plies and `players[1]` on odd plies.
pub fn play(
    players: &mut [Box<dyn Player>; 2],
    initial: Isolation,
    time_limit: Duration,
) -> GameRecord {
    let mut state = initial;
    let mut history = Vec::new();

    let finish = |loser: PlayerId, reason, history, final_state| GameRecord {
        winner: loser.opponent(),
        loser,
        reason,
        history,
        final_state,
    };

    loop {
        if state.terminal_test() {
            let loser = if state.utility(PlayerId::FIRST) > 0.0 {
                PlayerId::SECOND
            } else {
                PlayerId::FIRST
            };
            return finish(loser, EndReason::Isolated, history, state);
        }

        let active = state.player();
        let player = players[active.index()].as_mut();
        let action = match take_turn(player, &state, time_limit) {
            Ok(action) => action,
            Err(reason) => {
                warn!("{} ({active}) loses: {reason:?}", player.name());
                return finish(active, reason, history, state);
            }
        };

        match state.result(action) {
            Ok(next) => {
                debug!("ply {}: {} ({active}) plays {action}", state.ply_count(), player.name());
                history.push(action);
                state = next;
            }
            Err(e) => {
                warn!("{} ({active}) forfeits: {e}", player.name());
                return finish(active, EndReason::Forfeit, history, state);
            }
        }
    }
}

/// Settings of a match between the custom agent and one opponent.
#[derive(Debug, Clone)]
pub struct MatchConfig {
    pub opponent: PlayerKind,
    /// Each round is two games, one with each side moving first.
    pub rounds: usize,
    pub time_limit: Duration,
    pub agent: AgentConfig,
    /// Start both games of a round from the same random placements.
    pub fair: bool,
    pub seed: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            opponent: PlayerKind::Minimax,
            rounds: NUM_ROUNDS,
            time_limit: Duration::from_millis(TIME_LIMIT_MS),
            agent: AgentConfig::default(),
            fair: false,
            seed: 0,
        }
    }
}

/// Aggregate results of a match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSummary {
    pub games: usize,
    pub custom_wins: usize,
    pub opponent_wins: usize,
    pub timeouts: usize,
    pub forfeits: usize,
}

impl MatchSummary {
    /// Fraction of games won by the custom agent.
    pub fn win_rate(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.custom_wins as f64 / self.games as f64
        }
    }
}

/// Random first placement for both players.
fn fair_opening(rng: &mut Rng) -> Isolation {
    let mut state = Isolation::new();
    for _ in 0..2 {
        let actions = state.actions();
        let action = actions[rng.usize(..actions.len())];
        if let Ok(next) = state.result(action) {
            state = next;
        }
    }
    state
}

/// Play `config.rounds` rounds of the custom agent against `config.opponent`.
pub fn run_matches(config: &MatchConfig) -> MatchSummary {
    let mut rng = Rng::with_seed(config.seed);
    let mut summary = MatchSummary::default();

    for round in 0..config.rounds {
        let opening = if config.fair {
            fair_opening(&mut rng)
        } else {
            Isolation::new()
        };

        for custom_seat in [PlayerId::FIRST, PlayerId::SECOND] {
            let game = (round * 2 + custom_seat.index()) as u64;
            let game_seed = config.seed.wrapping_add(game);
            let agent = AgentConfig {
                seed: Some(config.agent.seed.unwrap_or(game_seed).wrapping_add(game)),
                ..config.agent.clone()
            };

            let opponent_seat = custom_seat.opponent();
            let custom = PlayerKind::Custom.build(custom_seat, game_seed, &agent);
            let opponent = config.opponent.build(opponent_seat, game_seed, &agent);
            let mut players = if custom_seat == PlayerId::FIRST {
                [custom, opponent]
            } else {
                [opponent, custom]
            };

            let record = play(&mut players, opening, config.time_limit);
            summary.games += 1;
            if record.winner == custom_seat {
                summary.custom_wins += 1;
            } else {
                summary.opponent_wins += 1;
            }
            match record.reason {
                EndReason::Timeout => summary.timeouts += 1,
                EndReason::Forfeit => summary.forfeits += 1,
                EndReason::Isolated => {}
            }
            info!(
                "round {} game {}: custom as player {custom_seat} {} after {} plies ({:?})",
                round + 1,
                custom_seat.index() + 1,
                if record.winner == custom_seat { "won" } else { "lost" },
                record.final_state.ply_count(),
                record.reason
            );
        }
    }

    info!(
        "custom vs {}: {}/{} games won ({:.1}%)",
        config.opponent,
        summary.custom_wins,
        summary.games,
        summary.win_rate() * 100.0
    );
    summary
}
