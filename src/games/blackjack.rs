//! Blackjack rules.
//!
//! One round per episode: the wallet takes a bet, two cards go to each of
//! player (seat 0) and dealer (seat 1), the player hits or stands, and the
//! dealer resolves by drawing to 17. All draws consume the single shuffled
//! episode deck.
//!
//! Hand totals follow the soft-ace rule: aces count 11 and are demoted to
//! 1 one at a time while the total exceeds 21. The demotion runs after
//! every draw and before every comparison.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardId, CardSet, Deck, Rank};
use crate::core::{
    ConfigError, EngineEvent, EpisodeRng, Outcome, PlayerId, PlayerMap, SEAT_HOUSE, SEAT_HUMAN,
};

/// Wallet configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlackjackConfig {
    /// Wallet contents before the bet. A session layer chaining rounds
    /// passes the previous round's closing balance here.
    pub starting_balance: u32,
}

impl Default for BlackjackConfig {
    fn default() -> Self {
        Self {
            starting_balance: 1000,
        }
    }
}

/// Round phases.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlackjackPhase {
    /// Waiting for a bet; no cards dealt.
    Betting,
    /// Player decides: hit or stand.
    Playing,
    /// Dealer drawing to 17. Transient; resolution leaves the round Ended.
    DealerResolving,
    /// Round over; outcome set, wallet settled.
    Ended,
}

/// The numeric value a rank contributes to a hand total, aces high.
#[must_use]
pub fn rank_value(rank: Rank) -> u8 {
    match rank {
        Rank::Ace => 11,
        Rank::Jack | Rank::Queen | Rank::King | Rank::Ten => 10,
        other => other.index() + 2,
    }
}

/// Total a set of cards, demoting soft aces while the total busts.
#[must_use]
pub fn hand_value<'a>(cards: impl IntoIterator<Item = &'a Card>) -> u8 {
    let mut total = 0u8;
    let mut soft_aces = 0u8;

    for card in cards {
        total += rank_value(card.rank);
        if card.rank == Rank::Ace {
            soft_aces += 1;
        }
    }

    while total > 21 && soft_aces > 0 {
        total -= 10;
        soft_aces -= 1;
    }

    total
}

/// Blackjack episode state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlackjackState {
    cards: CardSet,
    deck: Deck,
    hands: PlayerMap<Vec<CardId>>,
    balance: u32,
    bet: u32,
    phase: BlackjackPhase,
    outcome: Option<Outcome>,
}

impl BlackjackState {
    /// Fresh round: full 52-card deck shuffled, wallet loaded, no cards out.
    pub fn new(config: BlackjackConfig, rng: &mut EpisodeRng) -> Result<Self, ConfigError> {
        if config.starting_balance == 0 {
            return Err(ConfigError::EmptyWallet);
        }

        let (deck, cards) = Deck::shuffled(&Rank::ALL, rng);

        Ok(Self {
            cards,
            deck,
            hands: PlayerMap::with_default(2),
            balance: config.starting_balance,
            bet: 0,
            phase: BlackjackPhase::Betting,
            outcome: None,
        })
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> BlackjackPhase {
        self.phase
    }

    /// Terminal outcome, if the round has ended.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Wallet contents.
    #[must_use]
    pub fn balance(&self) -> u32 {
        self.balance
    }

    /// The active bet (0 before betting).
    #[must_use]
    pub fn bet(&self) -> u32 {
        self.bet
    }

    /// A seat's cards.
    #[must_use]
    pub fn hand(&self, seat: PlayerId) -> Vec<Card> {
        self.hands[seat].iter().map(|id| self.cards[id]).collect()
    }

    /// A seat's current total under the soft-ace rule.
    #[must_use]
    pub fn seat_value(&self, seat: PlayerId) -> u8 {
        let cards: Vec<Card> = self.hand(seat);
        hand_value(cards.iter())
    }

    /// Cards left in the draw pile.
    #[must_use]
    pub fn deck_len(&self) -> usize {
        self.deck.len()
    }

    /// Is betting `amount` legal?
    #[must_use]
    pub fn can_bet(&self, amount: u32) -> bool {
        self.phase == BlackjackPhase::Betting && amount > 0 && amount <= self.balance
    }

    /// Is hitting legal?
    #[must_use]
    pub fn can_hit(&self) -> bool {
        self.phase == BlackjackPhase::Playing
    }

    /// Is standing legal?
    #[must_use]
    pub fn can_stand(&self) -> bool {
        self.phase == BlackjackPhase::Playing
    }

    /// Place the bet and deal 2+2, alternating player/dealer.
    /// Caller must have validated the move.
    pub fn place_bet(&mut self, amount: u32) -> Vec<EngineEvent> {
        assert!(self.outcome.is_none(), "move resolved against a terminal episode");

        self.balance -= amount;
        self.bet = amount;
        self.phase = BlackjackPhase::Playing;

        let mut events = vec![EngineEvent::BetPlaced { amount }];
        for seat in [SEAT_HUMAN, SEAT_HOUSE, SEAT_HUMAN, SEAT_HOUSE] {
            events.push(self.draw_into(seat));
        }

        events
    }

    /// Draw one card into the player's hand; bust ends the round.
    /// Caller must have validated the move.
    pub fn hit(&mut self) -> Vec<EngineEvent> {
        assert!(self.outcome.is_none(), "move resolved against a terminal episode");

        let mut events = vec![self.draw_into(SEAT_HUMAN)];

        if self.seat_value(SEAT_HUMAN) > 21 {
            events.push(EngineEvent::Busted { seat: SEAT_HUMAN });
            self.phase = BlackjackPhase::Ended;
            self.outcome = Some(Outcome::Winner(SEAT_HOUSE));
        }

        events
    }

    /// Stand: the dealer draws to 17, then totals settle the wallet.
    /// Caller must have validated the move.
    pub fn stand(&mut self) -> Vec<EngineEvent> {
        assert!(self.outcome.is_none(), "move resolved against a terminal episode");

        self.phase = BlackjackPhase::DealerResolving;
        let mut events = Vec::new();

        while self.seat_value(SEAT_HOUSE) < 17 && !self.deck.is_empty() {
            events.push(self.draw_into(SEAT_HOUSE));
        }

        let player = self.seat_value(SEAT_HUMAN);
        let dealer = self.seat_value(SEAT_HOUSE);

        let (outcome, payout) = if dealer > 21 {
            events.push(EngineEvent::Busted { seat: SEAT_HOUSE });
            (Outcome::Winner(SEAT_HUMAN), self.bet * 2)
        } else if player > dealer {
            (Outcome::Winner(SEAT_HUMAN), self.bet * 2)
        } else if dealer > player {
            (Outcome::Winner(SEAT_HOUSE), 0)
        } else {
            (Outcome::Draw, self.bet)
        };

        if payout > 0 {
            self.balance += payout;
            events.push(EngineEvent::Payout { amount: payout });
        }

        self.phase = BlackjackPhase::Ended;
        self.outcome = Some(outcome);

        events
    }

    fn draw_into(&mut self, seat: PlayerId) -> EngineEvent {
        let id = self
            .deck
            .draw()
            .expect("a single round cannot exhaust a 52-card deck");
        self.hands[seat].push(id);
        EngineEvent::CardDrawn {
            seat,
            card: self.cards[&id],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Suit;

    fn card(rank: Rank) -> Card {
        Card {
            id: CardId::new(99),
            suit: Suit::Spades,
            rank,
        }
    }

    fn state(seed: u64) -> BlackjackState {
        let mut rng = EpisodeRng::new(seed);
        BlackjackState::new(BlackjackConfig::default(), &mut rng).unwrap()
    }

    #[test]
    fn test_rank_values() {
        assert_eq!(rank_value(Rank::Two), 2);
        assert_eq!(rank_value(Rank::Nine), 9);
        assert_eq!(rank_value(Rank::Ten), 10);
        assert_eq!(rank_value(Rank::Jack), 10);
        assert_eq!(rank_value(Rank::Queen), 10);
        assert_eq!(rank_value(Rank::King), 10);
        assert_eq!(rank_value(Rank::Ace), 11);
    }

    #[test]
    fn test_natural_twenty_one_keeps_soft_ace() {
        let hand = [card(Rank::Ace), card(Rank::King)];
        assert_eq!(hand_value(hand.iter()), 21);
    }

    #[test]
    fn test_ace_demotes_by_exactly_ten() {
        let soft = [card(Rank::Ace), card(Rank::Six)]; // 17
        assert_eq!(hand_value(soft.iter()), 17);

        let demoted = [card(Rank::Ace), card(Rank::Six), card(Rank::Nine)]; // 11+6+9=26 -> 16
        assert_eq!(hand_value(demoted.iter()), 16);
    }

    #[test]
    fn test_multiple_aces_demote_one_at_a_time() {
        let two_aces = [card(Rank::Ace), card(Rank::Ace)]; // 22 -> 12
        assert_eq!(hand_value(two_aces.iter()), 12);

        let three = [card(Rank::Ace), card(Rank::Ace), card(Rank::Nine)]; // 31 -> 21
        assert_eq!(hand_value(three.iter()), 21);
    }

    #[test]
    fn test_empty_wallet_rejected() {
        let mut rng = EpisodeRng::new(1);
        let result = BlackjackState::new(BlackjackConfig { starting_balance: 0 }, &mut rng);
        assert_eq!(result.unwrap_err(), ConfigError::EmptyWallet);
    }

    #[test]
    fn test_bet_deals_two_and_two() {
        let mut state = state(42);

        assert!(state.can_bet(100));
        assert!(!state.can_bet(0));
        assert!(!state.can_bet(1001));

        let events = state.place_bet(100);

        assert_eq!(state.balance(), 900);
        assert_eq!(state.bet(), 100);
        assert_eq!(state.phase(), BlackjackPhase::Playing);
        assert_eq!(state.hand(SEAT_HUMAN).len(), 2);
        assert_eq!(state.hand(SEAT_HOUSE).len(), 2);
        assert_eq!(state.deck_len(), 48);
        assert_eq!(events.len(), 5); // bet + 4 draws
    }

    #[test]
    fn test_no_second_bet() {
        let mut state = state(42);
        state.place_bet(100);

        assert!(!state.can_bet(50));
    }

    #[test]
    fn test_hit_draws_one() {
        let mut state = state(42);
        state.place_bet(100);

        let before = state.hand(SEAT_HUMAN).len();
        state.hit();

        // Either the hand grew, or it grew and busted the round.
        assert_eq!(state.hand(SEAT_HUMAN).len(), before + 1);
        assert_eq!(state.deck_len(), 47);
    }

    #[test]
    fn test_hits_until_bust_lose_the_bet() {
        let mut state = state(42);
        state.place_bet(100);

        while state.can_hit() {
            state.hit();
            if state.seat_value(SEAT_HUMAN) >= 21 && state.outcome().is_none() {
                // 21 exactly: stop hitting, stand instead.
                break;
            }
        }

        if state.outcome() == Some(Outcome::Winner(SEAT_HOUSE)) {
            assert!(state.seat_value(SEAT_HUMAN) > 21);
            assert_eq!(state.balance(), 900); // bet forfeited
            assert_eq!(state.phase(), BlackjackPhase::Ended);
        }
    }

    #[test]
    fn test_stand_resolves_dealer_to_seventeen() {
        let mut state = state(42);
        state.place_bet(100);
        state.stand();

        let dealer = state.seat_value(SEAT_HOUSE);
        assert!(dealer >= 17, "dealer stopped below 17 at {}", dealer);
        assert_eq!(state.phase(), BlackjackPhase::Ended);
        assert!(state.outcome().is_some());
    }

    #[test]
    fn test_settlement_matches_totals() {
        // Across seeds, the wallet always settles consistently with the
        // declared outcome.
        for seed in 0..40 {
            let mut state = state(seed);
            state.place_bet(100);
            state.stand();

            let player = state.seat_value(SEAT_HUMAN);
            let dealer = state.seat_value(SEAT_HOUSE);

            match state.outcome().unwrap() {
                Outcome::Winner(seat) if seat == SEAT_HUMAN => {
                    assert!(dealer > 21 || player > dealer);
                    assert_eq!(state.balance(), 1100);
                }
                Outcome::Winner(_) => {
                    assert!(dealer <= 21 && dealer > player);
                    assert_eq!(state.balance(), 900);
                }
                Outcome::Draw => {
                    assert_eq!(player, dealer);
                    assert_eq!(state.balance(), 1000);
                }
            }
        }
    }

    #[test]
    fn test_draws_consume_one_persistent_deck() {
        let mut state = state(42);
        state.place_bet(100);
        state.hit();
        state.hit();

        // 4 dealt + 2 hits, all from the same pile.
        let out = state.hand(SEAT_HUMAN).len() + state.hand(SEAT_HOUSE).len();
        assert_eq!(state.deck_len() + out, 52);

        // No card appears twice across hands.
        let mut seen = std::collections::HashSet::new();
        for c in state.hand(SEAT_HUMAN).iter().chain(state.hand(SEAT_HOUSE).iter()) {
            assert!(seen.insert(c.id));
        }
    }

    #[test]
    #[should_panic(expected = "terminal episode")]
    fn test_move_after_end_panics() {
        let mut state = state(42);
        state.place_bet(100);
        state.stand();
        state.hit();
    }
}
