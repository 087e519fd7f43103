//! Turn scheduling and the passive-side bot.
//!
//! The engine never sleeps: the cosmetic "bot is thinking" pause belongs
//! to the view layer. When an episode's next actor is engine-driven,
//! `pending` hands out a `BotTicket` naming the episode and its ply. The
//! view waits however long it likes, then redeems the ticket; a ticket
//! that no longer matches (episode reset, move already applied) redeems
//! to `None` and nothing happens.
//!
//! Strategies are deliberately simple: Tic-Tac-Toe picks uniformly among
//! legal cells; Durak attacks with its weakest legal card, defends with
//! the weakest card that beats, takes when it cannot, and ends the round
//! once everything is beaten and no follow-up fits.

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::core::SEAT_HOUSE;
use crate::games::durak::{strength, DurakState};

use super::episode::{Episode, EpisodeId, Game, Move, MoveOutcome};

/// Claim on one future bot move, valid for exactly one (episode, ply).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotTicket {
    pub episode: EpisodeId,
    pub ply: u32,
}

/// Drives the engine-controlled side of an episode.
pub struct TurnScheduler;

impl TurnScheduler {
    /// A ticket for the bot's next move, if the side to act is
    /// engine-driven and the episode continues.
    #[must_use]
    pub fn pending(episode: &Episode) -> Option<BotTicket> {
        if episode.is_terminal() {
            return None;
        }

        let bot_to_act = match episode.game() {
            Game::TicTacToe(s) => s.current() == SEAT_HOUSE,
            Game::Durak(s) => s.actor() == SEAT_HOUSE,
            // Connect-4 and Reversi are hotseat; Minesweeper is solo;
            // the Blackjack dealer resolves inside `stand`.
            _ => false,
        };

        bot_to_act.then_some(BotTicket {
            episode: episode.id(),
            ply: episode.ply(),
        })
    }

    /// Redeem a ticket against the episode it was issued for.
    ///
    /// Stale tickets are a no-op: a reset or abandoned episode, or one
    /// that already advanced past the ticket's ply, returns `None` with
    /// every state untouched.
    #[must_use]
    pub fn redeem(episode: &Episode, ticket: BotTicket) -> Option<MoveOutcome> {
        if ticket.episode != episode.id() || ticket.ply != episode.ply() {
            log::debug!(
                "stale ticket {:?} against episode {:?} at ply {}",
                ticket,
                episode.id(),
                episode.ply()
            );
            return None;
        }
        if episode.is_terminal() {
            return None;
        }

        let mv = Self::bot_move(episode)?;
        Some(episode.apply(&mv))
    }

    /// The bot's chosen move, deterministic per (seed, ply).
    fn bot_move(episode: &Episode) -> Option<Move> {
        match episode.game() {
            Game::TicTacToe(s) if s.current() == SEAT_HOUSE => {
                let cells = s.legal_cells();
                let mut rng = episode.bot_rng();
                rng.choose(&cells).copied().map(Move::Place)
            }
            Game::Durak(s) if s.actor() == SEAT_HOUSE => Some(Self::durak_move(s)),
            _ => None,
        }
    }

    fn durak_move(s: &DurakState) -> Move {
        let trump = s.trump();

        if s.actor() == s.defender() {
            // Weakest card that beats the pending attack, else pick up.
            let mut beating: Vec<Card> = s
                .hand(SEAT_HOUSE)
                .into_iter()
                .filter(|c| s.can_defend(c.id))
                .collect();
            beating.sort_by_key(|c| strength(*c, trump));

            match beating.first() {
                Some(card) => Move::Defend(card.id),
                None => Move::Take,
            }
        } else {
            // Weakest legal attack, else declare the round beaten.
            let mut attacks: Vec<Card> = s
                .hand(SEAT_HOUSE)
                .into_iter()
                .filter(|c| s.can_attack(c.id))
                .collect();
            attacks.sort_by_key(|c| strength(*c, trump));

            match attacks.first() {
                Some(card) => Move::Attack(card.id),
                None => Move::EndRound,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Coord, SEAT_HUMAN};
    use crate::games::VariantConfig;

    #[test]
    fn test_no_ticket_on_human_turn() {
        let episode = Episode::new(VariantConfig::TicTacToe, 1).unwrap();
        assert!(TurnScheduler::pending(&episode).is_none());
    }

    #[test]
    fn test_ticket_after_human_move() {
        let episode = Episode::new(VariantConfig::TicTacToe, 1).unwrap();
        let next = episode.apply(&Move::Place(Coord::new(0, 0))).next;

        let ticket = TurnScheduler::pending(&next).expect("bot turn pending");
        assert_eq!(ticket.episode, next.id());
        assert_eq!(ticket.ply, 1);
    }

    #[test]
    fn test_redeem_plays_exactly_one_bot_move() {
        let episode = Episode::new(VariantConfig::TicTacToe, 1).unwrap();
        let next = episode.apply(&Move::Place(Coord::new(0, 0))).next;

        let ticket = TurnScheduler::pending(&next).unwrap();
        let outcome = TurnScheduler::redeem(&next, ticket).expect("fresh ticket redeems");

        assert!(outcome.accepted);
        assert_eq!(outcome.next.ply(), 2);
        let board = outcome.next.game().as_tictactoe().unwrap();
        assert_eq!(board.current(), SEAT_HUMAN);
        assert_eq!(board.legal_cells().len(), 7);
    }

    #[test]
    fn test_redeem_is_deterministic() {
        let episode = Episode::new(VariantConfig::TicTacToe, 9).unwrap();
        let next = episode.apply(&Move::Place(Coord::new(2, 2))).next;
        let ticket = TurnScheduler::pending(&next).unwrap();

        let a = TurnScheduler::redeem(&next, ticket).unwrap();
        let b = TurnScheduler::redeem(&next, ticket).unwrap();

        assert_eq!(
            a.next.game().as_tictactoe().unwrap().grid(),
            b.next.game().as_tictactoe().unwrap().grid()
        );
    }

    #[test]
    fn test_stale_ticket_is_noop() {
        let episode = Episode::new(VariantConfig::TicTacToe, 1).unwrap();
        let next = episode.apply(&Move::Place(Coord::new(0, 0))).next;
        let ticket = TurnScheduler::pending(&next).unwrap();

        // Episode advanced past the ticket.
        let advanced = TurnScheduler::redeem(&next, ticket).unwrap().next;
        assert!(TurnScheduler::redeem(&advanced, ticket).is_none());

        // Fresh episode with a different identity.
        let reset = Episode::new(VariantConfig::TicTacToe, 2).unwrap();
        assert!(TurnScheduler::redeem(&reset, ticket).is_none());
    }

    #[test]
    fn test_durak_bot_defends_with_weakest_beating_card() {
        // Drive episodes until the bot defends at least once, then check
        // minimality against the validator.
        let mut defended = 0;

        for seed in 0..20u64 {
            let mut episode = Episode::new(VariantConfig::Durak, seed).unwrap();

            // Human opens with their weakest card.
            let s = episode.game().as_durak().unwrap();
            let mut hand = s.hand(SEAT_HUMAN);
            hand.sort_by_key(|c| strength(*c, s.trump()));
            episode = episode.apply(&Move::Attack(hand[0].id)).next;

            let ticket = match TurnScheduler::pending(&episode) {
                Some(t) => t,
                None => continue,
            };
            let before = episode.game().as_durak().unwrap().clone();
            let outcome = TurnScheduler::redeem(&episode, ticket).unwrap();

            match outcome.events.first() {
                Some(crate::core::EngineEvent::DefenseLaid { defend, .. }) => {
                    defended += 1;
                    // No legal defense is strictly weaker.
                    for c in before.hand(SEAT_HOUSE) {
                        if before.can_defend(c.id) {
                            assert!(
                                strength(*defend, before.trump()) <= strength(c, before.trump())
                            );
                        }
                    }
                }
                Some(crate::core::EngineEvent::TableTaken { .. }) => {
                    // Bot had nothing that beats: verify.
                    for c in before.hand(SEAT_HOUSE) {
                        assert!(!before.can_defend(c.id));
                    }
                }
                other => panic!("unexpected bot event {:?}", other),
            }
        }

        assert!(defended > 0, "no seed led to a bot defense");
    }

    #[test]
    fn test_durak_scheduler_playout_terminates() {
        for seed in 0..8u64 {
            let mut episode = Episode::new(VariantConfig::Durak, seed).unwrap();
            let mut plies = 0;

            while !episode.is_terminal() && plies < 2000 {
                if let Some(ticket) = TurnScheduler::pending(&episode) {
                    episode = TurnScheduler::redeem(&episode, ticket).unwrap().next;
                } else {
                    // Human mirrors the bot strategy.
                    let s = episode.game().as_durak().unwrap();
                    let mv = if s.actor() == s.defender() {
                        let mut beating: Vec<Card> = s
                            .hand(SEAT_HUMAN)
                            .into_iter()
                            .filter(|c| s.can_defend(c.id))
                            .collect();
                        beating.sort_by_key(|c| strength(*c, s.trump()));
                        match beating.first() {
                            Some(c) => Move::Defend(c.id),
                            None => Move::Take,
                        }
                    } else {
                        let mut attacks: Vec<Card> = s
                            .hand(SEAT_HUMAN)
                            .into_iter()
                            .filter(|c| s.can_attack(c.id))
                            .collect();
                        attacks.sort_by_key(|c| strength(*c, s.trump()));
                        match attacks.first() {
                            Some(c) => Move::Attack(c.id),
                            None => Move::EndRound,
                        }
                    };
                    episode = episode.apply(&mv).next;
                }
                plies += 1;
            }

            assert!(episode.is_terminal(), "seed {} never terminated", seed);
        }
    }
}
