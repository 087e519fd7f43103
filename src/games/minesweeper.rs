//! Minesweeper rules.
//!
//! Mines are placed uniformly at random at episode creation and each safe
//! cell's 8-neighborhood mine count is precomputed. Revealing a zero-count
//! cell floods outward through an explicit work queue; each cell is
//! revealed at most once and flagged cells are never flood-revealed.
//!
//! The board plays against seat 0: clearing every safe cell wins, tripping
//! a mine loses (a win for seat 1, the minefield).

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::core::{ConfigError, Coord, EngineEvent, EpisodeRng, Grid, Outcome, SEAT_HOUSE, SEAT_HUMAN};

/// Board and mine-count configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinesweeperConfig {
    pub rows: u8,
    pub cols: u8,
    pub mines: u16,
}

impl Default for MinesweeperConfig {
    /// The classic 10×10 board with 15 mines.
    fn default() -> Self {
        Self {
            rows: 10,
            cols: 10,
            mines: 15,
        }
    }
}

/// One board cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsCell {
    pub mine: bool,
    pub revealed: bool,
    pub flagged: bool,
    /// Mines among the 8 neighbors; zero for mine cells.
    pub adjacent: u8,
}

/// Minesweeper episode state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinesweeperState {
    grid: Grid<MsCell>,
    mines: u16,
    outcome: Option<Outcome>,
}

impl MinesweeperState {
    /// Build a board with mines placed uniformly at random.
    pub fn new(config: MinesweeperConfig, rng: &mut EpisodeRng) -> Result<Self, ConfigError> {
        if config.rows == 0 || config.cols == 0 {
            return Err(ConfigError::BadDimensions {
                rows: config.rows as u16,
                cols: config.cols as u16,
                max: u8::MAX as u16,
            });
        }

        let cells = config.rows as usize * config.cols as usize;
        if config.mines as usize >= cells {
            return Err(ConfigError::BadMineCount {
                mines: config.mines,
                rows: config.rows as u16,
                cols: config.cols as u16,
            });
        }

        let mut grid = Grid::new(config.rows, config.cols, MsCell::default());

        // Uniform placement: shuffle all coordinates, mine the prefix.
        let mut coords: Vec<Coord> = grid.coords().collect();
        rng.shuffle(&mut coords);
        for &at in coords.iter().take(config.mines as usize) {
            let mut cell = *grid.get(at).unwrap();
            cell.mine = true;
            grid.set(at, cell);
        }

        // Precompute adjacency counts for safe cells.
        for at in grid.coords().collect::<Vec<_>>() {
            let mut cell = *grid.get(at).unwrap();
            if cell.mine {
                continue;
            }
            cell.adjacent = crate::core::DIRECTIONS_8
                .iter()
                .filter_map(|&d| grid.step(at, d))
                .filter(|&n| grid.get(n).unwrap().mine)
                .count() as u8;
            grid.set(at, cell);
        }

        Ok(Self {
            grid,
            mines: config.mines,
            outcome: None,
        })
    }

    /// The board.
    #[must_use]
    pub fn grid(&self) -> &Grid<MsCell> {
        &self.grid
    }

    /// Terminal outcome, if the episode has ended.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Total mines on the board.
    #[must_use]
    pub fn mines(&self) -> u16 {
        self.mines
    }

    /// Cells revealed so far.
    #[must_use]
    pub fn revealed_count(&self) -> usize {
        self.grid.count(|c| c.revealed)
    }

    /// Mines minus placed flags. Negative when over-flagged.
    #[must_use]
    pub fn remaining_flags(&self) -> i32 {
        self.mines as i32 - self.grid.count(|c| c.flagged) as i32
    }

    /// Is revealing `at` legal?
    #[must_use]
    pub fn can_reveal(&self, at: Coord) -> bool {
        self.outcome.is_none()
            && matches!(self.grid.get(at), Some(cell) if !cell.revealed && !cell.flagged)
    }

    /// Is toggling a flag at `at` legal?
    #[must_use]
    pub fn can_toggle_flag(&self, at: Coord) -> bool {
        self.outcome.is_none() && matches!(self.grid.get(at), Some(cell) if !cell.revealed)
    }

    /// All legal reveals.
    #[must_use]
    pub fn legal_reveals(&self) -> Vec<Coord> {
        if self.outcome.is_some() {
            return Vec::new();
        }
        self.grid
            .iter()
            .filter(|(_, c)| !c.revealed && !c.flagged)
            .map(|(at, _)| at)
            .collect()
    }

    /// Reveal a cell, flooding zero-count neighborhoods.
    /// Caller must have validated the move.
    pub fn reveal(&mut self, at: Coord) -> Vec<EngineEvent> {
        assert!(self.outcome.is_none(), "move resolved against a terminal episode");

        let cell = *self.grid.get(at).expect("reveal resolved off the board");

        if cell.mine {
            let mut hit = cell;
            hit.revealed = true;
            self.grid.set(at, hit);
            self.outcome = Some(Outcome::Winner(SEAT_HOUSE));
            return vec![EngineEvent::MineTripped { at }];
        }

        // Iterative flood: a cell enters the queue at most once because it
        // is marked revealed before its neighbors are enqueued.
        let mut revealed = Vec::new();
        let mut queue = VecDeque::from([at]);

        while let Some(next) = queue.pop_front() {
            let c = *self.grid.get(next).unwrap();
            if c.revealed || c.flagged {
                continue;
            }

            let mut opened = c;
            opened.revealed = true;
            self.grid.set(next, opened);
            revealed.push(next);

            if opened.adjacent == 0 {
                for d in crate::core::DIRECTIONS_8 {
                    if let Some(n) = self.grid.step(next, d) {
                        let nc = self.grid.get(n).unwrap();
                        if !nc.revealed && !nc.flagged {
                            queue.push_back(n);
                        }
                    }
                }
            }
        }

        if self.revealed_count() == self.grid.len() - self.mines as usize {
            self.outcome = Some(Outcome::Winner(SEAT_HUMAN));
        }

        vec![EngineEvent::Revealed { cells: revealed }]
    }

    /// Toggle a flag. Caller must have validated the move.
    pub fn toggle_flag(&mut self, at: Coord) -> Vec<EngineEvent> {
        assert!(self.outcome.is_none(), "move resolved against a terminal episode");

        let mut cell = *self.grid.get(at).expect("flag toggled off the board");
        cell.flagged = !cell.flagged;
        self.grid.set(at, cell);

        vec![EngineEvent::FlagToggled {
            at,
            flagged: cell.flagged,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(seed: u64) -> MinesweeperState {
        let mut rng = EpisodeRng::new(seed);
        MinesweeperState::new(MinesweeperConfig::default(), &mut rng).unwrap()
    }

    fn mine_coords(state: &MinesweeperState) -> Vec<Coord> {
        state
            .grid()
            .iter()
            .filter(|(_, c)| c.mine)
            .map(|(at, _)| at)
            .collect()
    }

    #[test]
    fn test_board_has_exact_mine_count() {
        let state = state(42);
        assert_eq!(mine_coords(&state).len(), 15);
        assert_eq!(state.remaining_flags(), 15);
        assert_eq!(state.revealed_count(), 0);
    }

    #[test]
    fn test_adjacency_counts() {
        let state = state(42);
        let mines = mine_coords(&state);

        for (at, cell) in state.grid().iter() {
            if cell.mine {
                continue;
            }
            let expected = crate::core::DIRECTIONS_8
                .iter()
                .filter_map(|&d| state.grid().step(at, d))
                .filter(|n| mines.contains(n))
                .count() as u8;
            assert_eq!(cell.adjacent, expected, "bad count at {}", at);
        }
    }

    #[test]
    fn test_bad_config_rejected() {
        let mut rng = EpisodeRng::new(1);

        let zero = MinesweeperConfig { rows: 0, cols: 10, mines: 5 };
        assert!(matches!(
            MinesweeperState::new(zero, &mut rng),
            Err(ConfigError::BadDimensions { .. })
        ));

        let flooded = MinesweeperConfig { rows: 3, cols: 3, mines: 9 };
        assert!(matches!(
            MinesweeperState::new(flooded, &mut rng),
            Err(ConfigError::BadMineCount { .. })
        ));
    }

    #[test]
    fn test_reveal_mine_loses() {
        let mut state = state(42);
        let mine = mine_coords(&state)[0];

        let events = state.reveal(mine);

        assert_eq!(events, vec![EngineEvent::MineTripped { at: mine }]);
        assert_eq!(state.outcome(), Some(Outcome::Winner(SEAT_HOUSE)));
    }

    #[test]
    fn test_flood_reveal_never_repeats() {
        let mut state = state(42);

        // Reveal a zero-adjacency cell to trigger a flood.
        let zero = state
            .grid()
            .iter()
            .find(|(_, c)| !c.mine && c.adjacent == 0)
            .map(|(at, _)| at)
            .expect("a 15-mine 10x10 board has open space");

        let events = state.reveal(zero);
        let cells = match &events[0] {
            EngineEvent::Revealed { cells } => cells.clone(),
            other => panic!("unexpected event {:?}", other),
        };

        assert!(cells.len() > 1, "zero cell must flood its neighborhood");
        let unique: std::collections::HashSet<_> = cells.iter().collect();
        assert_eq!(unique.len(), cells.len(), "flood revealed a cell twice");
        assert_eq!(state.revealed_count(), cells.len());
    }

    #[test]
    fn test_flood_respects_flags() {
        let mut state = state(42);

        let zero = state
            .grid()
            .iter()
            .find(|(_, c)| !c.mine && c.adjacent == 0)
            .map(|(at, _)| at)
            .unwrap();

        // Flag a neighbor of the flood origin.
        let flagged = crate::core::DIRECTIONS_8
            .iter()
            .find_map(|&d| state.grid().step(zero, d))
            .unwrap();
        state.toggle_flag(flagged);

        state.reveal(zero);

        assert!(!state.grid().get(flagged).unwrap().revealed);
    }

    #[test]
    fn test_revealed_and_flagged_cells_not_revealable() {
        let mut state = state(42);
        let safe = state
            .grid()
            .iter()
            .find(|(_, c)| !c.mine)
            .map(|(at, _)| at)
            .unwrap();

        state.reveal(safe);
        assert!(!state.can_reveal(safe));

        let other = state.legal_reveals()[0];
        state.toggle_flag(other);
        assert!(!state.can_reveal(other));
        assert!(state.can_toggle_flag(other));

        state.toggle_flag(other);
        assert!(state.can_reveal(other));
    }

    #[test]
    fn test_win_when_all_safe_cells_revealed() {
        let mut state = state(42);
        let mines: std::collections::HashSet<_> = mine_coords(&state).into_iter().collect();

        let coords: Vec<Coord> = state.grid().coords().collect();
        for at in coords {
            if mines.contains(&at) || !state.can_reveal(at) {
                continue;
            }
            state.reveal(at);
            if state.outcome().is_some() {
                break;
            }
        }

        assert_eq!(state.outcome(), Some(Outcome::Winner(SEAT_HUMAN)));
        assert_eq!(
            state.revealed_count() + state.mines() as usize,
            state.grid().len()
        );
    }

    #[test]
    fn test_remaining_flags_tracks_toggles() {
        let mut state = state(42);
        let at = Coord::new(0, 0);

        state.toggle_flag(at);
        assert_eq!(state.remaining_flags(), 14);

        state.toggle_flag(at);
        assert_eq!(state.remaining_flags(), 15);
    }
}
