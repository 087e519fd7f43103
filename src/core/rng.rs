//! Deterministic random number generation.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical episodes
//! - **Context streams**: Independent sequences for different purposes
//!   (mine placement, deck shuffling, bot move selection)
//! - **Serializable**: O(1) state capture, so episode snapshots restore
//!   mid-stream
//!
//! Every piece of randomness in the engine flows through `EpisodeRng`:
//! the factory shuffles decks and places mines with the base stream, and
//! the bot derives a per-ply context stream so redeeming a ticket never
//! disturbs the episode's own sequence.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Deterministic RNG backing one episode.
///
/// Uses ChaCha8 for speed while keeping high-quality randomness.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "EpisodeRngState", into = "EpisodeRngState")]
pub struct EpisodeRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl EpisodeRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an independent stream for a specific context.
    ///
    /// The same context always produces the same stream from the same
    /// seed, without advancing this RNG.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;

        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        let context_seed = hasher.finish();

        Self::new(context_seed)
    }

    /// Generate a random usize in the given range.
    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    /// Generate a random u64 across the full domain.
    pub fn next_u64(&mut self) -> u64 {
        self.inner.gen()
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    /// Choose a random element from a slice.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.inner)
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> EpisodeRngState {
        EpisodeRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &EpisodeRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

/// Serializable RNG state for snapshots.
///
/// Uses the ChaCha8 word position for O(1) serialization regardless of
/// how many random numbers have been generated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeRngState {
    /// Original seed.
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter).
    pub word_pos: u128,
}

impl From<EpisodeRng> for EpisodeRngState {
    fn from(rng: EpisodeRng) -> Self {
        rng.state()
    }
}

impl From<EpisodeRngState> for EpisodeRng {
    fn from(state: EpisodeRngState) -> Self {
        EpisodeRng::from_state(&state)
    }
}
