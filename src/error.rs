//! Error types for the engine.

use thiserror::Error;

use crate::game::PlayerId;

/// Main error type for the crate.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid snapshot: {reason}")]
    InvalidSnapshot { reason: String },

    #[error("illegal action: {action}")]
    IllegalAction { action: String },

    #[error("invalid board size {size} (need {min} to {max} platforms per side)")]
    InvalidBoardSize { size: usize, min: usize, max: usize },

    #[error("invalid wall: {reason}")]
    InvalidWall { reason: String },

    #[error("invalid action record: {reason}")]
    InvalidRecord { reason: String },

    #[error("game already over: {winner} has won")]
    GameOver { winner: PlayerId },

    #[error("no valid actions available")]
    NoValidActions,

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience alias for results using the crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
