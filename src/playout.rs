//! Monte Carlo rollouts (biased random game simulation).
//!
//! A rollout plays from a position until [`GameState::check_winner`] with the
//! future check reports a winner. The policy is random but leans toward
//! finishing:
//! - Move rather than wall with probability `move_probability`, and always move
//!   when out of walls or one step from the goal.
//! - When moving, step along the cached shortest route with probability
//!   `route_probability`, and always when the opponent is out of walls or the
//!   goal is one step away.
//! - Walls are picked uniformly among the legal ones.

use fastrand::Rng;
use log::{trace, warn};

use crate::action::Action;
use crate::config::SearchConfig;
use crate::game::{GameState, PlayerId};

/// Play `state` out to the end and return the winner.
///
/// The input state is not modified. If the game runs past
/// `config.max_rollout_turns`, the player closer to their goal is declared the
/// winner.
pub fn rollout(state: &GameState, config: &SearchConfig, rng: &mut Rng) -> PlayerId {
    let mut game = state.clone();
    let mut turns = 0;

    loop {
        if let Some(winner) = game.check_winner(true) {
            trace!("rollout finished after {turns} turns, winner {winner}");
            return winner;
        }
        if turns >= config.max_rollout_turns {
            warn!("rollout hit the {turns}-turn cap, scoring by distance");
            return leader(&game);
        }
        let Some(action) = choose_action(&game, config, rng) else {
            warn!("rollout found no action for {}", game.current_turn());
            return leader(&game);
        };
        game.do_action(&action);
        turns += 1;
    }
}

/// Pick one action for the player to move, or `None` if there is nothing to do.
pub fn choose_action(game: &GameState, config: &SearchConfig, rng: &mut Rng) -> Option<Action> {
    let player = game.current_player();
    let must_move = player.remaining_walls() == 0 || player.wins_next_move();

    if !must_move && rng.f64() >= config.move_probability {
        if let Some(action) = choose_block(game, rng) {
            return Some(action);
        }
    }
    choose_move(game, config, rng).or_else(|| {
        if player.remaining_walls() > 0 {
            choose_block(game, rng)
        } else {
            None
        }
    })
}

fn choose_move(game: &GameState, config: &SearchConfig, rng: &mut Rng) -> Option<Action> {
    let player = game.current_player();
    let from = player.position();
    let moves = game.valid_moves(true);
    if moves.is_empty() {
        return None;
    }

    if let Some(route) = player.shortest_route() {
        let follow = game.opponent().remaining_walls() == 0
            || player.wins_next_move()
            || rng.f64() < config.route_probability;
        if follow {
            if let Some(&to) = moves.iter().find(|mv| route.contains(mv)) {
                return Some(Action::Move { from, to });
            }
        }
    }

    let to = moves[rng.usize(..moves.len())];
    Some(Action::Move { from, to })
}

fn choose_block(game: &GameState, rng: &mut Rng) -> Option<Action> {
    let blocks = game.valid_blocks();
    if blocks.is_empty() {
        return None;
    }
    Some(Action::Block(blocks[rng.usize(..blocks.len())]))
}

/// The player with the shorter cached route; the player to move wins ties.
fn leader(game: &GameState) -> PlayerId {
    let mover = game.current_player();
    let waiting = game.opponent();
    match (mover.distance_to_goal(), waiting.distance_to_goal()) {
        (Some(a), Some(b)) if b < a => waiting.id(),
        (None, Some(_)) => waiting.id(),
        _ => mover.id(),
    }
}
