//! Episode lifecycle: factory, move dispatch, terminal detection.
//!
//! An `Episode` bundles one variant's state with the RNG that built it and
//! a ply counter. `apply` never mutates the receiver: the accepted move
//! resolves on a clone (cheap, persistent structures throughout) and comes
//! back as `MoveOutcome::next`. Illegal moves are no-ops reported with
//! `accepted: false`.

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::{ConfigError, Coord, EngineEvent, EpisodeRng, Outcome};
use crate::games::{
    BlackjackState, ConnectFourState, DurakState, MinesweeperState, ReversiState, TicTacToeState,
    Variant, VariantConfig,
};

/// Stable identity of one episode, derived from its seed.
///
/// Tickets issued by the turn scheduler carry this id so stale callbacks
/// from an abandoned episode can be recognized and dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EpisodeId(pub u64);

/// One move, across all variants.
///
/// A move carries no seat: whoever holds the turn is the mover. Moves of
/// the wrong variant are simply illegal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Move {
    /// Tic-Tac-Toe and Reversi: claim a cell.
    Place(Coord),
    /// Connect-4: drop into a column.
    Drop(u8),
    /// Minesweeper: reveal a cell.
    Reveal(Coord),
    /// Minesweeper: toggle a flag.
    ToggleFlag(Coord),
    /// Blackjack: stake the round.
    Bet(u32),
    /// Blackjack: draw a card.
    Hit,
    /// Blackjack: hand over to the dealer.
    Stand,
    /// Durak: lay an attack card.
    Attack(CardId),
    /// Durak: cover the first undefended attack.
    Defend(CardId),
    /// Durak: pick up the table.
    Take,
    /// Durak: declare the round beaten.
    EndRound,
}

/// Variant state, as a closed tagged union.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Game {
    TicTacToe(TicTacToeState),
    ConnectFour(ConnectFourState),
    Reversi(ReversiState),
    Minesweeper(MinesweeperState),
    Blackjack(BlackjackState),
    Durak(DurakState),
}

impl Game {
    /// The variant tag.
    #[must_use]
    pub fn variant(&self) -> Variant {
        match self {
            Game::TicTacToe(_) => Variant::TicTacToe,
            Game::ConnectFour(_) => Variant::ConnectFour,
            Game::Reversi(_) => Variant::Reversi,
            Game::Minesweeper(_) => Variant::Minesweeper,
            Game::Blackjack(_) => Variant::Blackjack,
            Game::Durak(_) => Variant::Durak,
        }
    }

    /// Terminal outcome, if the episode has ended.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            Game::TicTacToe(s) => s.outcome(),
            Game::ConnectFour(s) => s.outcome(),
            Game::Reversi(s) => s.outcome(),
            Game::Minesweeper(s) => s.outcome(),
            Game::Blackjack(s) => s.outcome(),
            Game::Durak(s) => s.outcome(),
        }
    }

    /// Downcast to Tic-Tac-Toe.
    #[must_use]
    pub fn as_tictactoe(&self) -> Option<&TicTacToeState> {
        match self {
            Game::TicTacToe(s) => Some(s),
            _ => None,
        }
    }

    /// Downcast to Connect-4.
    #[must_use]
    pub fn as_connect_four(&self) -> Option<&ConnectFourState> {
        match self {
            Game::ConnectFour(s) => Some(s),
            _ => None,
        }
    }

    /// Downcast to Reversi.
    #[must_use]
    pub fn as_reversi(&self) -> Option<&ReversiState> {
        match self {
            Game::Reversi(s) => Some(s),
            _ => None,
        }
    }

    /// Downcast to Minesweeper.
    #[must_use]
    pub fn as_minesweeper(&self) -> Option<&MinesweeperState> {
        match self {
            Game::Minesweeper(s) => Some(s),
            _ => None,
        }
    }

    /// Downcast to Blackjack.
    #[must_use]
    pub fn as_blackjack(&self) -> Option<&BlackjackState> {
        match self {
            Game::Blackjack(s) => Some(s),
            _ => None,
        }
    }

    /// Downcast to Durak.
    #[must_use]
    pub fn as_durak(&self) -> Option<&DurakState> {
        match self {
            Game::Durak(s) => Some(s),
            _ => None,
        }
    }
}

/// Result of `Episode::apply`.
#[derive(Clone, Debug)]
pub struct MoveOutcome {
    /// The episode after the move. Identical to the input when rejected.
    pub next: Episode,
    /// Whether the validator accepted the move.
    pub accepted: bool,
    /// Cascade effects of an accepted resolution, in order.
    pub events: Vec<EngineEvent>,
    /// Terminal outcome reached by this move, if any.
    pub terminal: Option<Outcome>,
}

/// One playthrough of a variant, from factory to terminal outcome.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Episode {
    id: EpisodeId,
    ply: u32,
    rng: EpisodeRng,
    game: Game,
}

impl Episode {
    /// Build a fresh, independent episode. Fails fast on a malformed
    /// config; shares nothing with previous episodes.
    pub fn new(config: VariantConfig, seed: u64) -> Result<Self, ConfigError> {
        let mut rng = EpisodeRng::new(seed);
        let id = EpisodeId(rng.next_u64());

        let game = match config {
            VariantConfig::TicTacToe => Game::TicTacToe(TicTacToeState::new()),
            VariantConfig::ConnectFour => Game::ConnectFour(ConnectFourState::new()),
            VariantConfig::Reversi => Game::Reversi(ReversiState::new()),
            VariantConfig::Minesweeper(cfg) => {
                Game::Minesweeper(MinesweeperState::new(cfg, &mut rng)?)
            }
            VariantConfig::Blackjack(cfg) => Game::Blackjack(BlackjackState::new(cfg, &mut rng)?),
            VariantConfig::Durak => Game::Durak(DurakState::new(&mut rng)),
        };

        log::debug!("new {} episode {:?} (seed {})", game.variant(), id, seed);

        Ok(Self {
            id,
            ply: 0,
            rng,
            game,
        })
    }

    /// Episode identity.
    #[must_use]
    pub fn id(&self) -> EpisodeId {
        self.id
    }

    /// Accepted moves so far.
    #[must_use]
    pub fn ply(&self) -> u32 {
        self.ply
    }

    /// The variant tag.
    #[must_use]
    pub fn variant(&self) -> Variant {
        self.game.variant()
    }

    /// The wrapped variant state.
    #[must_use]
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Terminal outcome, if the episode has ended.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        self.game.outcome()
    }

    /// Has the episode ended?
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.outcome().is_some()
    }

    /// Pure legality check; never mutates.
    #[must_use]
    pub fn is_legal(&self, mv: &Move) -> bool {
        match (&self.game, mv) {
            (Game::TicTacToe(s), Move::Place(at)) => s.can_place(*at),
            (Game::Reversi(s), Move::Place(at)) => s.can_place(*at),
            (Game::ConnectFour(s), Move::Drop(col)) => s.can_drop(*col),
            (Game::Minesweeper(s), Move::Reveal(at)) => s.can_reveal(*at),
            (Game::Minesweeper(s), Move::ToggleFlag(at)) => s.can_toggle_flag(*at),
            (Game::Blackjack(s), Move::Bet(amount)) => s.can_bet(*amount),
            (Game::Blackjack(s), Move::Hit) => s.can_hit(),
            (Game::Blackjack(s), Move::Stand) => s.can_stand(),
            (Game::Durak(s), Move::Attack(id)) => s.can_attack(*id),
            (Game::Durak(s), Move::Defend(id)) => s.can_defend(*id),
            (Game::Durak(s), Move::Take) => s.can_take(),
            (Game::Durak(s), Move::EndRound) => s.can_end_round(),
            _ => false, // move belongs to a different variant
        }
    }

    /// Every legal move in the current state, for UI affordances.
    ///
    /// Blackjack bets enumerate the casino chip steps that fit the wallet.
    #[must_use]
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.is_terminal() {
            return Vec::new();
        }

        match &self.game {
            Game::TicTacToe(s) => s.legal_cells().into_iter().map(Move::Place).collect(),
            Game::Reversi(s) => s.legal_cells().into_iter().map(Move::Place).collect(),
            Game::ConnectFour(s) => s.legal_columns().into_iter().map(Move::Drop).collect(),
            Game::Minesweeper(s) => {
                let mut moves: Vec<Move> =
                    s.legal_reveals().into_iter().map(Move::Reveal).collect();
                moves.extend(
                    s.grid()
                        .iter()
                        .filter(|(_, c)| !c.revealed)
                        .map(|(at, _)| Move::ToggleFlag(at)),
                );
                moves
            }
            Game::Blackjack(s) => {
                let mut moves = Vec::new();
                for amount in BET_STEPS {
                    if s.can_bet(amount) {
                        moves.push(Move::Bet(amount));
                    }
                }
                if s.can_hit() {
                    moves.push(Move::Hit);
                }
                if s.can_stand() {
                    moves.push(Move::Stand);
                }
                moves
            }
            Game::Durak(s) => {
                let mut moves = Vec::new();
                for card in s.hand(s.actor()) {
                    if s.can_attack(card.id) {
                        moves.push(Move::Attack(card.id));
                    }
                    if s.can_defend(card.id) {
                        moves.push(Move::Defend(card.id));
                    }
                }
                if s.can_take() {
                    moves.push(Move::Take);
                }
                if s.can_end_round() {
                    moves.push(Move::EndRound);
                }
                moves
            }
        }
    }

    /// Validate and resolve one move.
    ///
    /// Rejected moves return an unchanged clone with `accepted: false`;
    /// accepted moves return the successor state, the cascade events, and
    /// the terminal outcome when the move ended the episode.
    #[must_use]
    pub fn apply(&self, mv: &Move) -> MoveOutcome {
        if !self.is_legal(mv) {
            log::debug!(
                "{} episode {:?}: rejected {:?} at ply {}",
                self.variant(),
                self.id,
                mv,
                self.ply
            );
            return MoveOutcome {
                next: self.clone(),
                accepted: false,
                events: Vec::new(),
                terminal: self.outcome(),
            };
        }

        let mut next = self.clone();
        let events = next.resolve(mv);
        next.ply += 1;

        let terminal = next.outcome();
        log::debug!(
            "{} episode {:?}: {:?} resolved at ply {} ({} events{})",
            self.variant(),
            self.id,
            mv,
            next.ply,
            events.len(),
            match terminal {
                Some(outcome) => format!(", terminal {:?}", outcome),
                None => String::new(),
            }
        );

        MoveOutcome {
            next,
            accepted: true,
            events,
            terminal,
        }
    }

    /// Snapshot to a compact binary blob.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Restore a snapshot.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }

    /// RNG stream for the bot's next decision, keyed by ply so repeated
    /// redemption attempts of the same ticket agree.
    #[must_use]
    pub(crate) fn bot_rng(&self) -> EpisodeRng {
        self.rng.for_context(&format!("bot-ply-{}", self.ply))
    }

    /// Resolve an already-validated move in place.
    fn resolve(&mut self, mv: &Move) -> Vec<EngineEvent> {
        match (&mut self.game, mv) {
            (Game::TicTacToe(s), Move::Place(at)) => s.place(*at),
            (Game::Reversi(s), Move::Place(at)) => s.place(*at),
            (Game::ConnectFour(s), Move::Drop(col)) => s.drop_disc(*col),
            (Game::Minesweeper(s), Move::Reveal(at)) => s.reveal(*at),
            (Game::Minesweeper(s), Move::ToggleFlag(at)) => s.toggle_flag(*at),
            (Game::Blackjack(s), Move::Bet(amount)) => s.place_bet(*amount),
            (Game::Blackjack(s), Move::Hit) => s.hit(),
            (Game::Blackjack(s), Move::Stand) => s.stand(),
            (Game::Durak(s), Move::Attack(id)) => s.attack(*id),
            (Game::Durak(s), Move::Defend(id)) => s.defend(*id),
            (Game::Durak(s), Move::Take) => s.take(),
            (Game::Durak(s), Move::EndRound) => s.end_round(),
            _ => unreachable!("validated move did not match the episode variant"),
        }
    }
}

/// The casino chip denominations offered for betting.
pub const BET_STEPS: [u32; 6] = [10, 50, 100, 250, 500, 1000];
