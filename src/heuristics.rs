//! Static evaluation of non-terminal positions.
//!
//! Every heuristic reads the same three things from a state: both players'
//! locations and the number of open knight destinations (liberties) from
//! each. The variants differ only in how they weigh those counts.
//!
//! | Kind         | Score                                                      |
//! |--------------|------------------------------------------------------------|
//! | `basic`      | `own - opp`                                                |
//! | `aggressive` | `1.5 * own - opp`                                          |
//! | `central`    | `own - opp`, or a centrality tiebreak when the counts tie  |
//! | `build`      | `own - m * opp`, `m` depending on how full the board is    |

use std::fmt;
use std::str::FromStr;

use crate::constants::{
    AGGRESSIVE_WEIGHT, BUILD_ENDGAME_MULTIPLIER, BUILD_PHASES, CENTRALITY_SCALE, HEIGHT,
    OPEN_CELLS, Score, WIDTH,
};
use crate::isolation::{Isolation, Loc, PlayerId, xy};

/// A state-scoring strategy.
///
/// Scores are expressed from `player`'s point of view: higher is better for
/// `player`. Implementations must be pure functions of `(state, player)`.
pub trait Heuristic {
    fn score(&self, state: &Isolation, player: PlayerId) -> Score;

    fn name(&self) -> &str;
}

/// The built-in heuristics, selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeuristicKind {
    #[default]
    Basic,
    Aggressive,
    Central,
    Build,
}

impl HeuristicKind {
    pub const ALL: [HeuristicKind; 4] = [
        HeuristicKind::Basic,
        HeuristicKind::Aggressive,
        HeuristicKind::Central,
        HeuristicKind::Build,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HeuristicKind::Basic => "basic",
            HeuristicKind::Aggressive => "aggressive",
            HeuristicKind::Central => "central",
            HeuristicKind::Build => "build",
        }
    }
}

impl fmt::Display for HeuristicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HeuristicKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|h| h.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|h| h.as_str()).collect();
                format!("unknown heuristic '{s}' (expected one of: {})", names.join(", "))
            })
    }
}

impl Heuristic for HeuristicKind {
    fn score(&self, state: &Isolation, player: PlayerId) -> Score {
        let (own, opp) = liberty_counts(state, player);
        match self {
            HeuristicKind::Basic => own - opp,
            HeuristicKind::Aggressive => AGGRESSIVE_WEIGHT * own - opp,
            HeuristicKind::Central => {
                if own != opp {
                    own - opp
                } else {
                    let own_c = centrality(state.loc(player));
                    let opp_c = centrality(state.loc(player.opponent()));
                    (own_c - opp_c) / CENTRALITY_SCALE
                }
            }
            HeuristicKind::Build => {
                let fraction = state.open_cells() as f64 / OPEN_CELLS as f64;
                own - build_multiplier(fraction) * opp
            }
        }
    }

    fn name(&self) -> &str {
        self.as_str()
    }
}

/// Liberty counts of `player` and its opponent.
fn liberty_counts(state: &Isolation, player: PlayerId) -> (Score, Score) {
    let own = state.liberties(state.loc(player)).len();
    let opp = state.liberties(state.loc(player.opponent())).len();
    (own as Score, opp as Score)
}

/// Closeness of a cell to the board centre, summed per axis.
///
/// Each axis contributes `c^2 - (v - c)^2` with `c` the axis midpoint, so the
/// value peaks at the centre and bottoms out at zero on the far corners.
/// An unplaced token has no position and scores zero.
pub fn centrality(loc: Option<Loc>) -> Score {
    let Some(loc) = loc else {
        return 0.0;
    };
    let (x, y) = xy(loc);
    let cx = WIDTH as Score / 2.0;
    let cy = HEIGHT as Score / 2.0;
    let dx = x as Score - cx;
    let dy = y as Score - cy;
    (cx * cx - dx * dx) + (cy * cy - dy * dy)
}

/// Opponent-mobility multiplier of the build heuristic.
///
/// `fraction` is the share of cells still open. Thresholds use strict `>`, so
/// a fraction of exactly `0.9` takes the `1.75` branch.
pub fn build_multiplier(fraction: f64) -> Score {
    BUILD_PHASES
        .iter()
        .find(|(threshold, _)| fraction > *threshold)
        .map(|&(_, multiplier)| multiplier)
        .unwrap_or(BUILD_ENDGAME_MULTIPLIER)
}
