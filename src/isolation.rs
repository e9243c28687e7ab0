//! Knight's Isolation: board representation and move execution.
//!
//! This module provides the game engine the agents play on:
//! - Board state as a `u128` bitboard (bit set = cell still open)
//! - Knight-move generation with padding-based wrap-around detection
//! - Terminal detection and win/loss utilities
//!
//! Every transition returns a new [`Isolation`] value; a state is never
//! mutated in place. Each player first places its token on any open cell and
//! from then on moves like a chess knight. A cell becomes blocked as soon as
//! a token lands on it, and the player to move with no open destination loses.

use std::fmt;

use thiserror::Error;

use crate::constants::{BOARD_BITS, HEIGHT, LOSS_SCORE, STRIDE, Score, WIDTH, WIN_SCORE};

/// A cell on the board, represented as an index into the padded flat layout.
pub type Loc = usize;

/// One of the two players. The first player to move is `PlayerId(0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(u8);

impl PlayerId {
    pub const FIRST: PlayerId = PlayerId(0);
    pub const SECOND: PlayerId = PlayerId(1);

    /// Build a player id from `0` or `1`.
    pub fn new(id: usize) -> Option<Self> {
        match id {
            0 => Some(Self::FIRST),
            1 => Some(Self::SECOND),
            _ => None,
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The other player (`1 - id`).
    #[inline]
    pub fn opponent(self) -> Self {
        PlayerId(1 - self.0)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The eight L-shaped knight steps. North is towards higher rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    NNE,
    ENE,
    ESE,
    SSE,
    SSW,
    WSW,
    WNW,
    NNW,
}

impl Direction {
    /// All directions in move-generation order.
    pub const ALL: [Direction; 8] = [
        Direction::NNE,
        Direction::ENE,
        Direction::ESE,
        Direction::SSE,
        Direction::SSW,
        Direction::WSW,
        Direction::WNW,
        Direction::NNW,
    ];

    /// Offset of this step in the flat layout.
    pub const fn offset(self) -> isize {
        const S: isize = STRIDE as isize;
        match self {
            Direction::NNE => 2 * S + 1,
            Direction::ENE => S + 2,
            Direction::ESE => -S + 2,
            Direction::SSE => -2 * S + 1,
            Direction::SSW => -2 * S - 1,
            Direction::WSW => -S - 2,
            Direction::WNW => S - 2,
            Direction::NNW => 2 * S - 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::NNE => "NNE",
            Direction::ENE => "ENE",
            Direction::ESE => "ESE",
            Direction::SSE => "SSE",
            Direction::SSW => "SSW",
            Direction::WSW => "WSW",
            Direction::WNW => "WNW",
            Direction::NNW => "NNW",
        }
    }

    /// Parse a direction name, case-insensitively.
    pub fn from_name(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s))
    }
}

/// A legal move token. Only meaningful relative to the state it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    /// Initial placement of the mover's token on an open cell.
    Place(Loc),
    /// Knight jump from the mover's current cell.
    Jump(Direction),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Place(loc) => write!(f, "{}", str_coord(*loc)),
            Action::Jump(dir) => write!(f, "{}", dir.name()),
        }
    }
}

/// Result of attempting an illegal transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("illegal move {0}: target is off the board")]
    OffBoard(Action),
    #[error("illegal move: cell {0} is blocked")]
    Blocked(Loc),
    #[error("illegal move {0}: player is already placed")]
    AlreadyPlaced(Action),
    #[error("illegal move {0}: player has not been placed")]
    NotPlaced(Action),
    #[error("cell {0} is not on the board")]
    InvalidCell(Loc),
    #[error("cell {0} is occupied and cannot be open")]
    Occupied(Loc),
}

/// Bitboard with every playable cell open.
const BLANK_BOARD: u128 = blank_board();

const fn blank_board() -> u128 {
    let mut board = 0u128;
    let mut y = 0;
    while y < HEIGHT {
        let mut x = 0;
        while x < WIDTH {
            board |= 1u128 << (y * STRIDE + x);
            x += 1;
        }
        y += 1;
    }
    board
}

/// Check whether a flat index is a playable cell (not padding, not past the end).
#[inline]
pub fn on_board(loc: Loc) -> bool {
    loc < BOARD_BITS && loc % STRIDE < WIDTH
}

/// Decode a flat index into `(x, y)` board coordinates.
#[inline]
pub fn xy(loc: Loc) -> (usize, usize) {
    (loc % STRIDE, loc / STRIDE)
}

/// An Isolation position.
///
/// A small `Copy` value: the bitboard of open cells, the number of plies
/// played, and each player's location (`None` until placed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Isolation {
    board: u128,
    ply_count: u32,
    locs: [Option<Loc>; 2],
}

impl Default for Isolation {
    fn default() -> Self {
        Self::new()
    }
}

impl Isolation {
    /// Empty board, nobody placed, first player to move.
    pub fn new() -> Self {
        Isolation {
            board: BLANK_BOARD,
            ply_count: 0,
            locs: [None, None],
        }
    }

    /// Build an arbitrary position from its open cells.
    ///
    /// Cells not listed are blocked. A placed player's cell must be blocked.
    pub fn from_cells(
        open: &[Loc],
        ply_count: u32,
        locs: [Option<Loc>; 2],
    ) -> Result<Self, GameError> {
        let mut board = 0u128;
        for &loc in open {
            if !on_board(loc) {
                return Err(GameError::InvalidCell(loc));
            }
            board |= 1u128 << loc;
        }
        for loc in locs.into_iter().flatten() {
            if !on_board(loc) {
                return Err(GameError::InvalidCell(loc));
            }
            if board & (1u128 << loc) != 0 {
                return Err(GameError::Occupied(loc));
            }
        }
        Ok(Isolation {
            board,
            ply_count,
            locs,
        })
    }

    /// Number of plies played so far.
    #[inline]
    pub fn ply_count(&self) -> u32 {
        self.ply_count
    }

    /// The player to move.
    #[inline]
    pub fn player(&self) -> PlayerId {
        if self.ply_count % 2 == 0 {
            PlayerId::FIRST
        } else {
            PlayerId::SECOND
        }
    }

    /// Both players' locations, indexed by player id.
    #[inline]
    pub fn locs(&self) -> [Option<Loc>; 2] {
        self.locs
    }

    #[inline]
    pub fn loc(&self, player: PlayerId) -> Option<Loc> {
        self.locs[player.index()]
    }

    /// Check whether a cell is open.
    #[inline]
    pub fn is_open(&self, loc: Loc) -> bool {
        loc < BOARD_BITS && self.board & (1u128 << loc) != 0
    }

    /// Number of open cells left on the board.
    #[inline]
    pub fn open_cells(&self) -> usize {
        self.board.count_ones() as usize
    }

    /// Destination of a knight jump, if it lands on an open cell.
    fn jump_target(&self, from: Loc, dir: Direction) -> Option<Loc> {
        let to = from as isize + dir.offset();
        if to < 0 || to >= BOARD_BITS as isize {
            return None;
        }
        let to = to as usize;
        self.is_open(to).then_some(to)
    }

    /// Open destinations reachable from `loc`.
    ///
    /// An unplaced token (`None`) can go to any open cell.
    pub fn liberties(&self, loc: Option<Loc>) -> Vec<Loc> {
        match loc {
            None => (0..BOARD_BITS).filter(|&l| self.is_open(l)).collect(),
            Some(from) => Direction::ALL
                .into_iter()
                .filter_map(|d| self.jump_target(from, d))
                .collect(),
        }
    }

    fn has_liberties(&self, player: PlayerId) -> bool {
        match self.loc(player) {
            None => self.board != 0,
            Some(from) => Direction::ALL
                .into_iter()
                .any(|d| self.jump_target(from, d).is_some()),
        }
    }

    /// Legal actions for the player to move. Empty iff the mover is stuck.
    pub fn actions(&self) -> Vec<Action> {
        match self.loc(self.player()) {
            None => self
                .liberties(None)
                .into_iter()
                .map(Action::Place)
                .collect(),
            Some(from) => Direction::ALL
                .into_iter()
                .filter(|&d| self.jump_target(from, d).is_some())
                .map(Action::Jump)
                .collect(),
        }
    }

    /// Cell an action would land on for the player to move.
    pub fn destination(&self, action: Action) -> Option<Loc> {
        match (self.loc(self.player()), action) {
            (None, Action::Place(loc)) => on_board(loc).then_some(loc),
            (Some(from), Action::Jump(dir)) => {
                let to = from as isize + dir.offset();
                (to >= 0 && on_board(to as usize)).then_some(to as usize)
            }
            _ => None,
        }
    }

    /// The legal action that moves the player to move onto `dest`, if any.
    pub fn action_to(&self, dest: Loc) -> Option<Action> {
        self.actions()
            .into_iter()
            .find(|&a| self.destination(a) == Some(dest))
    }

    /// Apply an action for the player to move and return the successor state.
    ///
    /// # Errors
    /// - [`GameError::NotPlaced`] / [`GameError::AlreadyPlaced`] on a wrong action kind
    /// - [`GameError::OffBoard`] if the target is outside the playable area
    /// - [`GameError::Blocked`] if the target cell is already used
    pub fn result(&self, action: Action) -> Result<Isolation, GameError> {
        let player = self.player();
        match (self.loc(player), action) {
            (None, Action::Jump(_)) => return Err(GameError::NotPlaced(action)),
            (Some(_), Action::Place(_)) => return Err(GameError::AlreadyPlaced(action)),
            _ => {}
        }
        let target = self
            .destination(action)
            .ok_or(GameError::OffBoard(action))?;
        if !self.is_open(target) {
            return Err(GameError::Blocked(target));
        }

        let mut locs = self.locs;
        locs[player.index()] = Some(target);
        Ok(Isolation {
            board: self.board & !(1u128 << target),
            ply_count: self.ply_count + 1,
            locs,
        })
    }

    /// The game is over once either player has no open destination.
    pub fn terminal_test(&self) -> bool {
        let active = self.player();
        !self.has_liberties(active) || !self.has_liberties(active.opponent())
    }

    /// Final outcome from `player`'s point of view.
    ///
    /// Returns `0.0` for non-terminal states. Otherwise the player to move
    /// wins iff it still has liberties (its opponent is the one isolated).
    pub fn utility(&self, player: PlayerId) -> Score {
        if !self.terminal_test() {
            return 0.0;
        }
        let active = self.player();
        let active_has_liberties = self.has_liberties(active);
        if (player == active) == active_has_liberties {
            WIN_SCORE
        } else {
            LOSS_SCORE
        }
    }
}

impl fmt::Display for Isolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..HEIGHT).rev() {
            write!(f, "{:>2} ", y + 1)?;
            for x in 0..WIDTH {
                let loc = y * STRIDE + x;
                let ch = if self.locs[0] == Some(loc) {
                    '1'
                } else if self.locs[1] == Some(loc) {
                    '2'
                } else if self.is_open(loc) {
                    '.'
                } else {
                    '#'
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        write!(f, "   ")?;
        for x in 0..WIDTH {
            write!(f, "{} ", (b'A' + x as u8) as char)?;
        }
        writeln!(f)
    }
}

/// Parse a coordinate string (e.g. "C4") into a cell.
///
/// Columns are `A`..`K` and rows `1`..`9`. Returns `None` for anything
/// outside the board.
pub fn parse_coord(s: &str) -> Option<Loc> {
    let s = s.trim();
    let mut chars = s.chars();
    let col = chars.next()?.to_ascii_uppercase();
    if !col.is_ascii_uppercase() {
        return None;
    }
    let x = (col as u8 - b'A') as usize;
    let row: usize = chars.as_str().parse().ok()?;
    if x >= WIDTH || row == 0 || row > HEIGHT {
        return None;
    }
    Some((row - 1) * STRIDE + x)
}

/// Convert a cell to a coordinate string (e.g. "C4").
pub fn str_coord(loc: Loc) -> String {
    let (x, y) = xy(loc);
    format!("{}{}", (b'A' + x as u8) as char, y + 1)
}
