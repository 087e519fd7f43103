//! The six rule variants.
//!
//! Each variant module owns its state type, validators (`can_*`), and
//! resolution methods. Dispatch over the closed variant set lives in
//! `engine::Episode`.

pub mod blackjack;
pub mod connect_four;
pub mod durak;
pub mod minesweeper;
pub mod reversi;
pub mod tictactoe;

use serde::{Deserialize, Serialize};

pub use blackjack::{BlackjackConfig, BlackjackPhase, BlackjackState};
pub use connect_four::{ConnectFourState, Disc};
pub use durak::{DurakState, TablePair};
pub use minesweeper::{MinesweeperConfig, MinesweeperState, MsCell};
pub use reversi::{ReversiState, Stone};
pub use tictactoe::{Mark, TicTacToeState};

/// The closed set of game variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    TicTacToe,
    ConnectFour,
    Reversi,
    Minesweeper,
    Blackjack,
    Durak,
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Variant::TicTacToe => "tic-tac-toe",
            Variant::ConnectFour => "connect-4",
            Variant::Reversi => "reversi",
            Variant::Minesweeper => "minesweeper",
            Variant::Blackjack => "blackjack",
            Variant::Durak => "durak",
        };
        write!(f, "{}", name)
    }
}

/// Per-variant factory configuration.
///
/// Grid games are fully determined by their rules; Minesweeper and
/// Blackjack carry tunable knobs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VariantConfig {
    TicTacToe,
    ConnectFour,
    Reversi,
    Minesweeper(MinesweeperConfig),
    Blackjack(BlackjackConfig),
    Durak,
}

impl VariantConfig {
    /// The variant this config builds.
    #[must_use]
    pub fn variant(&self) -> Variant {
        match self {
            VariantConfig::TicTacToe => Variant::TicTacToe,
            VariantConfig::ConnectFour => Variant::ConnectFour,
            VariantConfig::Reversi => Variant::Reversi,
            VariantConfig::Minesweeper(_) => Variant::Minesweeper,
            VariantConfig::Blackjack(_) => Variant::Blackjack,
            VariantConfig::Durak => Variant::Durak,
        }
    }

    /// Default configuration for a variant.
    #[must_use]
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::TicTacToe => VariantConfig::TicTacToe,
            Variant::ConnectFour => VariantConfig::ConnectFour,
            Variant::Reversi => VariantConfig::Reversi,
            Variant::Minesweeper => VariantConfig::Minesweeper(MinesweeperConfig::default()),
            Variant::Blackjack => VariantConfig::Blackjack(BlackjackConfig::default()),
            Variant::Durak => VariantConfig::Durak,
        }
    }
}
