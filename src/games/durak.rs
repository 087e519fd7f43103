//! Durak rules.
//!
//! 36-card deck (Six through Ace), 6-card hands, trump taken from the last
//! card of the shuffled pile. Seat 0 opens as attacker against the bot on
//! seat 1.
//!
//! A round is a sequence of {attack, optional defense} pairs on the table.
//! While any pair is undefended the defender acts: cover the first
//! undefended attack with a beating card, or take everything. With all
//! pairs defended the attacker acts: follow up with a card matching a rank
//! already on the table, or declare the round beaten. Beaten rounds clear
//! the table, refill both hands to 6 (attacker first), and swap roles;
//! taking keeps the attacker attacking.
//!
//! The fool is decidable only once the pile is out: at a round boundary,
//! an empty hand wins.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardId, CardSet, Deck, Rank, Suit};
use crate::core::{
    EngineEvent, EpisodeRng, Outcome, PlayerId, PlayerMap, SEAT_HOUSE, SEAT_HUMAN,
};

/// Hand size both players refill to at round boundaries.
pub const HAND_SIZE: usize = 6;

/// One table entry: an attack card and, once covered, its defense.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TablePair {
    pub attack: CardId,
    pub defend: Option<CardId>,
}

/// Does `defend` beat `attack` under `trump`?
///
/// True iff the defense is a trump against a non-trump attack, or shares
/// the attack's suit with a strictly higher rank (trump vs trump included).
#[must_use]
pub fn beats(attack: Card, defend: Card, trump: Suit) -> bool {
    if defend.suit == trump && attack.suit != trump {
        return true;
    }
    if defend.suit != attack.suit {
        return false;
    }
    defend.rank.index() > attack.rank.index()
}

/// Card strength for bot ordering: rank index, trumps above everything.
#[must_use]
pub fn strength(card: Card, trump: Suit) -> u8 {
    let base = card.rank.index();
    if card.suit == trump {
        base + 100
    } else {
        base
    }
}

/// Durak episode state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DurakState {
    cards: CardSet,
    deck: Deck,
    hands: PlayerMap<Vec<CardId>>,
    table: Vector<TablePair>,
    trump: Suit,
    attacker: PlayerId,
    outcome: Option<Outcome>,
}

impl DurakState {
    /// Shuffle the short deck, deal 6+6, and fix the trump from the pile's
    /// bottom card.
    pub fn new(rng: &mut EpisodeRng) -> Self {
        let (mut deck, cards) = Deck::shuffled(&Rank::FROM_SIX, rng);

        let trump_id = deck.bottom().expect("fresh 36-card pile");
        let trump = cards[&trump_id].suit;

        let mut hands: PlayerMap<Vec<CardId>> = PlayerMap::with_default(2);
        for seat in [SEAT_HUMAN, SEAT_HOUSE] {
            for _ in 0..HAND_SIZE {
                hands[seat].push(deck.draw().expect("36 cards cover two opening hands"));
            }
        }

        Self {
            cards,
            deck,
            hands,
            table: Vector::new(),
            trump,
            attacker: SEAT_HUMAN,
            outcome: None,
        }
    }

    /// The trump suit.
    #[must_use]
    pub fn trump(&self) -> Suit {
        self.trump
    }

    /// Terminal outcome, if the episode has ended.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// The attacking seat.
    #[must_use]
    pub fn attacker(&self) -> PlayerId {
        self.attacker
    }

    /// The defending seat.
    #[must_use]
    pub fn defender(&self) -> PlayerId {
        self.attacker.opponent()
    }

    /// The seat to act: the defender while any pair is undefended,
    /// otherwise the attacker.
    #[must_use]
    pub fn actor(&self) -> PlayerId {
        if self.first_undefended().is_some() {
            self.defender()
        } else {
            self.attacker
        }
    }

    /// The table, in play order.
    #[must_use]
    pub fn table(&self) -> &Vector<TablePair> {
        &self.table
    }

    /// A seat's hand.
    #[must_use]
    pub fn hand(&self, seat: PlayerId) -> Vec<Card> {
        self.hands[seat].iter().map(|id| self.cards[id]).collect()
    }

    /// Cards left in the draw pile.
    #[must_use]
    pub fn draw_pile_len(&self) -> usize {
        self.deck.len()
    }

    /// Look up a card instance.
    #[must_use]
    pub fn card(&self, id: CardId) -> Option<Card> {
        self.cards.get(&id).copied()
    }

    /// The first undefended table pair.
    #[must_use]
    pub fn first_undefended(&self) -> Option<TablePair> {
        self.table.iter().find(|p| p.defend.is_none()).copied()
    }

    /// Ranks currently on the table, attack and defense sides both.
    fn table_ranks(&self) -> Vec<Rank> {
        let mut ranks = Vec::with_capacity(self.table.len() * 2);
        for pair in self.table.iter() {
            ranks.push(self.cards[&pair.attack].rank);
            if let Some(d) = pair.defend {
                ranks.push(self.cards[&d].rank);
            }
        }
        ranks
    }

    /// Is attacking with `id` legal? First attack of a round is free;
    /// follow-ups must match a rank already on the table.
    #[must_use]
    pub fn can_attack(&self, id: CardId) -> bool {
        if self.outcome.is_some() || self.actor() != self.attacker {
            return false;
        }
        if !self.hands[self.attacker].contains(&id) {
            return false;
        }
        self.table.is_empty() || self.table_ranks().contains(&self.cards[&id].rank)
    }

    /// Is defending with `id` legal against the first undefended attack?
    #[must_use]
    pub fn can_defend(&self, id: CardId) -> bool {
        if self.outcome.is_some() || self.actor() != self.defender() {
            return false;
        }
        if !self.hands[self.defender()].contains(&id) {
            return false;
        }
        match self.first_undefended() {
            Some(pair) => beats(self.cards[&pair.attack], self.cards[&id], self.trump),
            None => false,
        }
    }

    /// Is taking the table legal?
    #[must_use]
    pub fn can_take(&self) -> bool {
        self.outcome.is_none() && !self.table.is_empty() && self.actor() == self.defender()
    }

    /// Is declaring the round beaten legal?
    #[must_use]
    pub fn can_end_round(&self) -> bool {
        self.outcome.is_none()
            && !self.table.is_empty()
            && self.first_undefended().is_none()
            && self.actor() == self.attacker
    }

    /// Lay an attack card. Caller must have validated the move.
    pub fn attack(&mut self, id: CardId) -> Vec<EngineEvent> {
        assert!(self.outcome.is_none(), "move resolved against a terminal episode");

        let attacker = self.attacker;
        self.remove_from_hand(attacker, id);
        self.table.push_back(TablePair {
            attack: id,
            defend: None,
        });

        vec![EngineEvent::AttackLaid {
            card: self.cards[&id],
        }]
    }

    /// Cover the first undefended attack. Caller must have validated.
    pub fn defend(&mut self, id: CardId) -> Vec<EngineEvent> {
        assert!(self.outcome.is_none(), "move resolved against a terminal episode");

        let pair = self
            .first_undefended()
            .expect("defense resolved with nothing to cover");
        let defender = self.defender();
        self.remove_from_hand(defender, id);

        let idx = self
            .table
            .iter()
            .position(|p| p.attack == pair.attack)
            .expect("undefended pair is on the table");
        self.table.set(
            idx,
            TablePair {
                attack: pair.attack,
                defend: Some(id),
            },
        );

        vec![EngineEvent::DefenseLaid {
            attack: self.cards[&pair.attack],
            defend: self.cards[&id],
        }]
    }

    /// Declare the round beaten: discard the table, refill hands
    /// (attacker first), swap roles. Caller must have validated.
    pub fn end_round(&mut self) -> Vec<EngineEvent> {
        assert!(self.outcome.is_none(), "move resolved against a terminal episode");

        self.table.clear();

        let mut events = vec![EngineEvent::RoundBeaten];
        events.extend(self.refill_hands());

        self.attacker = self.defender();
        events.push(EngineEvent::RolesSwapped {
            attacker: self.attacker,
        });

        self.detect_terminal();
        events
    }

    /// Defender takes every card on the table; the attacker keeps
    /// attacking next round. Caller must have validated.
    pub fn take(&mut self) -> Vec<EngineEvent> {
        assert!(self.outcome.is_none(), "move resolved against a terminal episode");

        let defender = self.defender();
        let mut count = 0;
        for pair in std::mem::take(&mut self.table).iter() {
            self.hands[defender].push(pair.attack);
            count += 1;
            if let Some(d) = pair.defend {
                self.hands[defender].push(d);
                count += 1;
            }
        }

        let mut events = vec![EngineEvent::TableTaken {
            seat: defender,
            count,
        }];
        events.extend(self.refill_hands());

        self.detect_terminal();
        events
    }

    /// Draw both hands back up to 6 while the pile lasts, attacker first.
    fn refill_hands(&mut self) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        for seat in [self.attacker, self.defender()] {
            while self.hands[seat].len() < HAND_SIZE {
                match self.deck.draw() {
                    Some(id) => {
                        self.hands[seat].push(id);
                        events.push(EngineEvent::CardDrawn {
                            seat,
                            card: self.cards[&id],
                        });
                    }
                    None => break,
                }
            }
        }
        events
    }

    /// Round-boundary terminal check: only decidable with the pile empty.
    fn detect_terminal(&mut self) {
        if !self.deck.is_empty() {
            return;
        }

        let human_out = self.hands[SEAT_HUMAN].is_empty();
        let house_out = self.hands[SEAT_HOUSE].is_empty();

        self.outcome = match (human_out, house_out) {
            (true, true) => Some(Outcome::Draw),
            (true, false) => Some(Outcome::Winner(SEAT_HUMAN)),
            (false, true) => Some(Outcome::Winner(SEAT_HOUSE)),
            (false, false) => None,
        };
    }

    fn remove_from_hand(&mut self, seat: PlayerId, id: CardId) {
        let pos = self.hands[seat]
            .iter()
            .position(|&c| c == id)
            .expect("card played from outside the hand");
        self.hands[seat].remove(pos);
    }
}
