//! Connect-4 rules.
//!
//! 6×7 grid, seat 0 plays red, seat 1 plays yellow. A move names a column;
//! the disc settles on the lowest empty row. Win detection scans the 4 axes
//! through the just-placed cell, each combined with its mirror; the 42nd
//! disc with no line is a draw.

use serde::{Deserialize, Serialize};

use crate::core::{Coord, EngineEvent, Grid, Outcome, PlayerId, AXES_4, SEAT_HUMAN};

/// Board rows.
pub const ROWS: u8 = 6;
/// Board columns.
pub const COLS: u8 = 7;

/// A dropped disc.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Disc {
    Red,
    Yellow,
}

impl Disc {
    /// The disc a seat plays.
    #[must_use]
    pub fn for_seat(seat: PlayerId) -> Self {
        if seat == SEAT_HUMAN {
            Disc::Red
        } else {
            Disc::Yellow
        }
    }
}

/// Connect-4 episode state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectFourState {
    grid: Grid<Option<Disc>>,
    current: PlayerId,
    moves: u16,
    outcome: Option<Outcome>,
}

impl ConnectFourState {
    /// Fresh empty board; red (seat 0) moves first.
    #[must_use]
    pub fn new() -> Self {
        Self {
            grid: Grid::new(ROWS, COLS, None),
            current: SEAT_HUMAN,
            moves: 0,
            outcome: None,
        }
    }

    /// The board.
    #[must_use]
    pub fn grid(&self) -> &Grid<Option<Disc>> {
        &self.grid
    }

    /// Seat to move.
    #[must_use]
    pub fn current(&self) -> PlayerId {
        self.current
    }

    /// Terminal outcome, if the episode has ended.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Is dropping into `col` legal?
    #[must_use]
    pub fn can_drop(&self, col: u8) -> bool {
        self.outcome.is_none() && self.drop_row(col).is_some()
    }

    /// Columns that still accept a disc.
    #[must_use]
    pub fn legal_columns(&self) -> Vec<u8> {
        if self.outcome.is_some() {
            return Vec::new();
        }
        (0..COLS).filter(|&c| self.drop_row(c).is_some()).collect()
    }

    /// The row a disc dropped into `col` would settle on.
    #[must_use]
    pub fn drop_row(&self, col: u8) -> Option<u8> {
        if col >= COLS {
            return None;
        }
        (0..ROWS)
            .rev()
            .find(|&row| matches!(self.grid.get(Coord::new(row, col)), Some(None)))
    }

    /// Drop the current seat's disc. Caller must have validated the move.
    pub fn drop_disc(&mut self, col: u8) -> Vec<EngineEvent> {
        assert!(self.outcome.is_none(), "move resolved against a terminal episode");

        let seat = self.current;
        let row = self
            .drop_row(col)
            .expect("drop resolved against a full column");
        let at = Coord::new(row, col);

        self.grid.set(at, Some(Disc::for_seat(seat)));
        self.moves += 1;

        if self.wins_through(at, Disc::for_seat(seat)) {
            self.outcome = Some(Outcome::Winner(seat));
        } else if self.moves as usize == self.grid.len() {
            self.outcome = Some(Outcome::Draw);
        } else {
            self.current = seat.opponent();
        }

        vec![EngineEvent::Placed { at, seat }]
    }

    /// Count contiguous same-color discs through `at` along each axis and
    /// its mirror.
    fn wins_through(&self, at: Coord, disc: Disc) -> bool {
        for axis in AXES_4 {
            let mut count = 1;
            count += self.run_length(at, axis, disc);
            count += self.run_length(at, (-axis.0, -axis.1), disc);

            if count >= 4 {
                return true;
            }
        }
        false
    }

    fn run_length(&self, from: Coord, delta: (i8, i8), disc: Disc) -> u8 {
        let mut count = 0;
        let mut at = from;

        while let Some(next) = self.grid.step(at, delta) {
            if self.grid.get(next) == Some(&Some(disc)) {
                count += 1;
                at = next;
            } else {
                break;
            }
        }

        count
    }
}

impl Default for ConnectFourState {
    fn default() -> Self {
        Self::new()
    }
}
