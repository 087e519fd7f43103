//! Card primitives: suits, ranks, card instances, and the draw pile.
//!
//! ## Ownership
//!
//! A `Card` instance lives in exactly one of {draw pile, a hand, the table}
//! at any time. Moves reference cards by `CardId`; the owning game state
//! keeps the id → card registry and moves ids between containers
//! atomically.
//!
//! ## Deck construction
//!
//! A deck is built once per episode as the full suit × rank product, then
//! uniformly shuffled with the episode RNG. Draws consume the pile from the
//! front; the pile is never rebuilt mid-episode.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Card suit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    /// All four suits, in deck-construction order.
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];
}

impl std::fmt::Display for Suit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            Suit::Clubs => "♣",
            Suit::Diamonds => "♦",
            Suit::Hearts => "♥",
            Suit::Spades => "♠",
        };
        write!(f, "{}", symbol)
    }
}

/// Card rank, ordered from Two (lowest) to Ace (highest).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    /// The full 13-rank domain (Blackjack decks).
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// The short 9-rank domain of a 36-card deck (Durak).
    pub const FROM_SIX: [Rank; 9] = [
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// Position in the rank ordering, 0-based from Two.
    #[must_use]
    pub fn index(self) -> u8 {
        self as u8
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        };
        write!(f, "{}", label)
    }
}

/// Unique card instance identifier within one episode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

/// A concrete card instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub suit: Suit,
    pub rank: Rank,
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

/// Card instance registry, id → card.
pub type CardSet = FxHashMap<CardId, Card>;

/// The draw pile: an ordered sequence of card ids, consumed from the front.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: VecDeque<CardId>,
}

impl Deck {
    /// Build the suit × rank product over `ranks`, shuffle it uniformly,
    /// and return the pile together with the instance registry.
    pub fn shuffled(ranks: &[Rank], rng: &mut crate::core::EpisodeRng) -> (Self, CardSet) {
        let mut registry = CardSet::default();
        let mut ids = Vec::with_capacity(Suit::ALL.len() * ranks.len());

        let mut next_id = 0u32;
        for suit in Suit::ALL {
            for &rank in ranks {
                let id = CardId::new(next_id);
                next_id += 1;
                registry.insert(id, Card { id, suit, rank });
                ids.push(id);
            }
        }

        rng.shuffle(&mut ids);

        (Self { cards: ids.into() }, registry)
    }

    /// Remove and return the front card.
    pub fn draw(&mut self) -> Option<CardId> {
        self.cards.pop_front()
    }

    /// Peek the last card of the pile (the one drawn last).
    #[must_use]
    pub fn bottom(&self) -> Option<CardId> {
        self.cards.back().copied()
    }

    /// Cards remaining.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// True once the pile is exhausted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
