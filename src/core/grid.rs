//! Rectangular game boards.
//!
//! `Grid` is a fixed-size matrix over an `im::Vector`, so cloning a board
//! (and therefore an episode) is cheap. Cell identity is `Coord { row, col }`.
//! Dimensions are fixed at creation.

use im::Vector;
use serde::{Deserialize, Serialize};

/// Cell coordinate on a grid. `(0, 0)` is the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: u8,
    pub col: u8,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The 8 king-move directions, as (row, col) deltas.
pub const DIRECTIONS_8: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// The 4 win-scan axes for line games: horizontal, vertical, two diagonals.
/// Each axis is scanned together with its mirror.
pub const AXES_4: [(i8, i8); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Fixed-size rectangular board.
///
/// Backed by a persistent vector so `Grid::clone` shares structure with
/// the original; episode snapshots stay O(1)-ish regardless of board size.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid<T: Clone> {
    rows: u8,
    cols: u8,
    cells: Vector<T>,
}

impl<T: Clone> Grid<T> {
    /// Create a grid with every cell set to `fill`.
    #[must_use]
    pub fn new(rows: u8, cols: u8, fill: T) -> Self {
        assert!(rows > 0 && cols > 0, "Grid dimensions must be positive");

        let cells = std::iter::repeat(fill)
            .take(rows as usize * cols as usize)
            .collect();

        Self { rows, cols, cells }
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> u8 {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub fn cols(&self) -> u8 {
        self.cols
    }

    /// Total cell count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True for the degenerate 0-cell grid (unreachable via `new`).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Check whether a coordinate lies on the grid.
    #[must_use]
    pub fn contains(&self, at: Coord) -> bool {
        at.row < self.rows && at.col < self.cols
    }

    /// Get the cell at a coordinate.
    #[must_use]
    pub fn get(&self, at: Coord) -> Option<&T> {
        if self.contains(at) {
            self.cells.get(self.offset(at))
        } else {
            None
        }
    }

    /// Replace the cell at a coordinate.
    ///
    /// Panics if the coordinate is off the grid; writes only happen on
    /// coordinates the rules already validated.
    pub fn set(&mut self, at: Coord, value: T) {
        assert!(self.contains(at), "cell {} is off the {}x{} grid", at, self.rows, self.cols);
        let offset = self.offset(at);
        self.cells.set(offset, value);
    }

    /// Step from a coordinate by a signed delta, staying on the grid.
    #[must_use]
    pub fn step(&self, from: Coord, delta: (i8, i8)) -> Option<Coord> {
        let row = from.row as i16 + delta.0 as i16;
        let col = from.col as i16 + delta.1 as i16;

        if row >= 0 && row < self.rows as i16 && col >= 0 && col < self.cols as i16 {
            Some(Coord::new(row as u8, col as u8))
        } else {
            None
        }
    }

    /// Iterate over all coordinates in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let cols = self.cols;
        let rows = self.rows;
        (0..rows).flat_map(move |r| (0..cols).map(move |c| Coord::new(r, c)))
    }

    /// Iterate over (Coord, &T) pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &T)> {
        self.coords().zip(self.cells.iter())
    }

    /// Count cells matching a predicate.
    #[must_use]
    pub fn count(&self, pred: impl Fn(&T) -> bool) -> usize {
        self.cells.iter().filter(|c| pred(c)).count()
    }

    fn offset(&self, at: Coord) -> usize {
        at.row as usize * self.cols as usize + at.col as usize
    }
}
