//! Tic-Tac-Toe rules.
//!
//! 3×3 grid, seat 0 plays X, seat 1 plays O. Win detection checks the 8
//! canonical triples; a full board with no winner is a draw.

use serde::{Deserialize, Serialize};

use crate::core::{Coord, EngineEvent, Grid, Outcome, PlayerId, SEAT_HUMAN};

/// A player's mark.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// The mark a seat plays.
    #[must_use]
    pub fn for_seat(seat: PlayerId) -> Self {
        if seat == SEAT_HUMAN {
            Mark::X
        } else {
            Mark::O
        }
    }
}

/// The 8 winning triples.
const WIN_LINES: [[(u8, u8); 3]; 8] = [
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

/// Tic-Tac-Toe episode state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicTacToeState {
    grid: Grid<Option<Mark>>,
    current: PlayerId,
    outcome: Option<Outcome>,
}

impl TicTacToeState {
    /// Fresh empty board; X (seat 0) moves first.
    #[must_use]
    pub fn new() -> Self {
        Self {
            grid: Grid::new(3, 3, None),
            current: SEAT_HUMAN,
            outcome: None,
        }
    }

    /// The board.
    #[must_use]
    pub fn grid(&self) -> &Grid<Option<Mark>> {
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

    /// Is placing at `at` legal for the seat to move?
    #[must_use]
    pub fn can_place(&self, at: Coord) -> bool {
        self.outcome.is_none() && matches!(self.grid.get(at), Some(None))
    }

    /// All legal placements.
    #[must_use]
    pub fn legal_cells(&self) -> Vec<Coord> {
        if self.outcome.is_some() {
            return Vec::new();
        }
        self.grid
            .iter()
            .filter(|(_, cell)| cell.is_none())
            .map(|(at, _)| at)
            .collect()
    }

    /// Place the current seat's mark. Caller must have validated the move.
    pub fn place(&mut self, at: Coord) -> Vec<EngineEvent> {
        assert!(self.outcome.is_none(), "move resolved against a terminal episode");

        let seat = self.current;
        self.grid.set(at, Some(Mark::for_seat(seat)));

        self.outcome = self.detect_terminal();
        if self.outcome.is_none() {
            self.current = seat.opponent();
        }

        vec![EngineEvent::Placed { at, seat }]
    }

    fn detect_terminal(&self) -> Option<Outcome> {
        for line in WIN_LINES {
            let marks: Vec<_> = line
                .iter()
                .map(|&(r, c)| *self.grid.get(Coord::new(r, c)).unwrap())
                .collect();

            if let Some(mark) = marks[0] {
                if marks[1] == Some(mark) && marks[2] == Some(mark) {
                    let seat = if mark == Mark::X { SEAT_HUMAN } else { SEAT_HUMAN.opponent() };
                    return Some(Outcome::Winner(seat));
                }
            }
        }

        if self.grid.count(|cell| cell.is_none()) == 0 {
            return Some(Outcome::Draw);
        }

        None
    }
}

impl Default for TicTacToeState {
    fn default() -> Self {
        Self::new()
    }
}
