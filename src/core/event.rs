//! Cascade events emitted by move resolution.
//!
//! Every accepted move reports what it did as a sequence of events, so the
//! view layer can animate flips, flood reveals, and card movement without
//! diffing states. Events are facts about a resolution that already
//! happened; replaying them is not required to reconstruct state.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::Card;

use super::grid::Coord;
use super::player::PlayerId;

/// One observable effect of an accepted move.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// A mark or disc landed on a grid cell.
    Placed { at: Coord, seat: PlayerId },

    /// Reversi capture: every listed cell flipped to the mover's color.
    Flipped { seat: PlayerId, cells: SmallVec<[Coord; 8]> },

    /// The mover had to be skipped because they have no legal move.
    TurnPassed { seat: PlayerId },

    /// Minesweeper cells revealed, in flood order. The clicked cell is first.
    Revealed { cells: Vec<Coord> },

    /// A mine was revealed; the episode is lost.
    MineTripped { at: Coord },

    /// A flag was placed (`flagged: true`) or removed.
    FlagToggled { at: Coord, flagged: bool },

    /// Blackjack bet accepted and debited from the wallet.
    BetPlaced { amount: u32 },

    /// A card left the draw pile for a hand.
    CardDrawn { seat: PlayerId, card: Card },

    /// A hand exceeded 21.
    Busted { seat: PlayerId },

    /// The wallet was credited at round end (2x bet on a win, 1x on a push).
    Payout { amount: u32 },

    /// Durak: an attack card was laid on the table.
    AttackLaid { card: Card },

    /// Durak: a defense card covered the first undefended attack.
    DefenseLaid { attack: Card, defend: Card },

    /// Durak: all pairs were beaten; the table was cleared.
    RoundBeaten,

    /// Durak: the defender picked up every card on the table.
    TableTaken { seat: PlayerId, count: usize },

    /// Durak: attacker and defender swapped for the next round.
    RolesSwapped { attacker: PlayerId },
}
