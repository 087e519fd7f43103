//! # parlor-core
//!
//! A turn-based rules engine for six classic board and card games:
//! Tic-Tac-Toe, Connect-4, Reversi, Minesweeper, Blackjack, and Durak.
//!
//! ## Design Principles
//!
//! 1. **One cycle per input**: every move runs a single synchronous
//!    validate → resolve → detect-terminal pass. Illegal moves are no-ops
//!    (`accepted: false`), never errors.
//!
//! 2. **Episodes are values**: `apply` returns a fresh `Episode` instead
//!    of mutating shared references. Persistent data structures (`im`)
//!    keep the clones cheap.
//!
//! 3. **Deterministic randomness**: every shuffle, mine placement, and
//!    bot choice flows through the seeded `EpisodeRng`, so a seed plus a
//!    move list replays an identical episode.
//!
//! 4. **Closed variant set**: dispatch is a tagged union over `Game`,
//!    not inheritance. Adding a variant means extending the enum.
//!
//! ## Modules
//!
//! - `core`: seats, grids, RNG, events, outcomes, config errors
//! - `cards`: suits, ranks, card instances, the draw pile
//! - `games`: the six rule variants and their validators/resolvers
//! - `engine`: `Episode` dispatch and the `TurnScheduler` bot driver
//!
//! The crate is a pure library: no rendering, timers, persistence, or
//! networking. The view layer owns all of those and talks to the engine
//! through `Episode::apply`, `Episode::legal_moves`, and the read-only
//! projections on each variant state.

pub mod cards;
pub mod core;
pub mod engine;
pub mod games;

// Re-export commonly used types
pub use crate::core::{
    ConfigError, Coord, EngineEvent, EpisodeRng, EpisodeRngState, Grid, Outcome, PlayerId,
    PlayerMap, SEAT_HOUSE, SEAT_HUMAN,
};

pub use crate::cards::{Card, CardId, Deck, Rank, Suit};

pub use crate::games::{
    BlackjackConfig, BlackjackPhase, BlackjackState, ConnectFourState, Disc, DurakState,
    MinesweeperConfig, MinesweeperState, Mark, MsCell, ReversiState, Stone, TablePair,
    TicTacToeState, Variant, VariantConfig,
};

pub use crate::engine::{
    BotTicket, Episode, EpisodeId, Game, Move, MoveOutcome, TurnScheduler, BET_STEPS,
};
