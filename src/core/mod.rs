//! Core building blocks: seats, boards, RNG, events, outcomes, errors.

pub mod error;
pub mod event;
pub mod grid;
pub mod outcome;
pub mod player;
pub mod rng;

pub use error::ConfigError;
pub use event::EngineEvent;
pub use grid::{Coord, Grid, AXES_4, DIRECTIONS_8};
pub use outcome::Outcome;
pub use player::{PlayerId, PlayerMap, SEAT_HOUSE, SEAT_HUMAN};
pub use rng::{EpisodeRng, EpisodeRngState};
