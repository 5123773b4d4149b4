//! Quoridor-Rust: a wall-and-pawn race engine with an MCTS player.
//!
//! Two pawns race to opposite edges of a square board. On each turn the
//! player to move either steps (jumping over the opponent when adjacent) or
//! places a wall that spans two platforms, as long as both players keep some
//! route to their goal. The crate provides the rules engine and a Monte Carlo
//! Tree Search that picks actions for either side.
//!
//! ## Modules
//!
//! - [`constants`] - Cell encodings and search parameters
//! - [`board`] - The `(2N-1) x (2N-1)` platform/slot matrix
//! - [`moves`] - Pawn move generation including jumps
//! - [`path`] - Breadth-first route queries
//! - [`action`] - Walls and actions
//! - [`game`] - Game state, legality and winner detection
//! - [`snapshot`] - Structural snapshots and JSON round-trips
//! - [`history`] - Action log with undo/redo cursor
//! - [`playout`] - Biased random rollouts
//! - [`mcts`] - Monte Carlo Tree Search
//! - [`config`] - Search tunables
//! - [`protocol`] - Text protocol front-end
//!
//! ## Example
//!
//! ```
//! use quoridor_rust::config::SearchConfig;
//! use quoridor_rust::game::GameState;
//! use quoridor_rust::mcts::search;
//!
//! // A small 3x3 game
//! let mut game = GameState::with_size(3)?;
//!
//! // Search for the player to move and play the result
//! let config = SearchConfig {
//!     seed: Some(7),
//!     ..SearchConfig::with_iterations(200)
//! };
//! let result = search(&game, &config, |_| {})?;
//! assert!(game.valid_actions().contains(&result.action));
//! game.do_action(&result.action);
//! println!("{game}");
//! # Ok::<(), quoridor_rust::Error>(())
//! ```

pub mod action;
pub mod board;
pub mod config;
pub mod constants;
pub mod error;
pub mod game;
pub mod history;
pub mod mcts;
pub mod moves;
pub mod path;
pub mod playout;
pub mod protocol;
pub mod snapshot;

pub use error::{Error, Result};
