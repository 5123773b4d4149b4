//! Pawn move generation, including the jump over an adjacent opponent.
//!
//! From a platform the pawn looks at the four neighbouring border slots. Through
//! each open slot it can step onto the next platform, unless the opponent stands
//! there. In that case it jumps straight over the opponent when the slot beyond
//! is open; otherwise it may land on any cell the opponent itself could step to.

use crate::board::{Board, Coord};
use crate::constants::DIRECTIONS;

/// List the one-ply destinations for a pawn at `player`.
///
/// With `opponent` set, the opponent's cell is never a destination and the
/// jump rules apply. Without it, the opponent is ignored entirely (pure
/// reachability). A non-platform `player` has no moves.
///
/// The lateral escape borrows the opponent's own moves computed without an
/// opponent, so it assumes no second pawn stands in the way.
pub fn find_valid_moves(board: &Board, player: Coord, opponent: Option<Coord>) -> Vec<Coord> {
    if !board.is_platform(player) {
        return Vec::new();
    }

    let mut moves: Vec<Coord> = Vec::with_capacity(4);
    let push = |moves: &mut Vec<Coord>, mv: Coord| {
        if mv != player && !moves.contains(&mv) {
            moves.push(mv);
        }
    };

    for dir in DIRECTIONS {
        let Some(slot) = board.offset(player, dir, 1) else {
            continue;
        };
        if !board.is_open(slot) {
            continue;
        }
        // An open slot inside the matrix always has a platform behind it.
        let Some(next) = board.offset(player, dir, 2) else {
            continue;
        };

        if opponent != Some(next) {
            push(&mut moves, next);
            continue;
        }

        let beyond_open = board
            .offset(player, dir, 3)
            .is_some_and(|s| board.is_open(s));
        if beyond_open {
            if let Some(landing) = board.offset(player, dir, 4) {
                push(&mut moves, landing);
            }
        } else {
            for mv in find_valid_moves(board, next, None) {
                push(&mut moves, mv);
            }
        }
    }

    moves
}
