//! Terminal outcomes.

use serde::{Deserialize, Serialize};

use super::player::PlayerId;

/// Result of a finished episode.
///
/// Every variant resolves to a winning seat or a draw. Solo boards use the
/// two-seat convention: Minesweeper cleared is a win for seat 0, a tripped
/// mine is a win for seat 1 (the minefield), and the Blackjack dealer owns
/// seat 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Single winning seat.
    Winner(PlayerId),
    /// No winner.
    Draw,
}

impl Outcome {
    /// Check if a seat won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        matches!(self, Outcome::Winner(p) if *p == player)
    }

    /// Check for a draw.
    #[must_use]
    pub fn is_draw(&self) -> bool {
        matches!(self, Outcome::Draw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::player::{SEAT_HOUSE, SEAT_HUMAN};

    #[test]
    fn test_is_winner() {
        let win = Outcome::Winner(SEAT_HUMAN);
        assert!(win.is_winner(SEAT_HUMAN));
        assert!(!win.is_winner(SEAT_HOUSE));
        assert!(!win.is_draw());
    }

    #[test]
    fn test_draw() {
        let draw = Outcome::Draw;
        assert!(draw.is_draw());
        assert!(!draw.is_winner(SEAT_HUMAN));
        assert!(!draw.is_winner(SEAT_HOUSE));
    }
}
