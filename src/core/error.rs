//! Typed configuration errors.
//!
//! Gameplay legality is not an error: illegal moves are rejected silently
//! with `accepted: false` and the state unchanged. `ConfigError` covers the
//! fail-fast path at episode creation, where a malformed variant config
//! must abort before any state exists.

use thiserror::Error;

/// Episode construction failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("board dimensions {rows}x{cols} are invalid; both must be between 1 and {max}")]
    BadDimensions { rows: u16, cols: u16, max: u16 },

    #[error("mine count {mines} does not fit a {rows}x{cols} board")]
    BadMineCount { mines: u16, rows: u16, cols: u16 },

    #[error("starting balance must be positive")]
    EmptyWallet,
}
