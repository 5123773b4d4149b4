//! Breadth-first route queries over the platforms of a board.
//!
//! Both queries use [`find_valid_moves`] as the neighbour function, so walls,
//! jumps and (when supplied) the opponent's pawn are all respected.

use std::collections::VecDeque;

use crate::board::{Board, Coord};
use crate::moves::find_valid_moves;

/// Shortest route from `start` to any platform on row `goal_row`.
///
/// The route includes both ends, so a pawn already on its goal row gets a
/// one-element route. Among equally short routes the first one discovered
/// wins. Returns `None` when the goal row cannot be reached.
pub fn shortest_route(
    board: &Board,
    start: Coord,
    goal_row: usize,
    opponent: Option<Coord>,
) -> Option<Vec<Coord>> {
    let dim = board.dim();
    let idx = |(x, y): Coord| y * dim + x;

    let mut parent: Vec<Option<Coord>> = vec![None; dim * dim];
    let mut visited = vec![false; dim * dim];
    let mut queue = VecDeque::new();

    visited[idx(start)] = true;
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        if current.1 == goal_row {
            let mut route = vec![current];
            let mut at = current;
            while let Some(prev) = parent[idx(at)] {
                route.push(prev);
                at = prev;
            }
            route.reverse();
            return Some(route);
        }

        for mv in find_valid_moves(board, current, opponent) {
            if !visited[idx(mv)] {
                visited[idx(mv)] = true;
                parent[idx(mv)] = Some(current);
                queue.push_back(mv);
            }
        }
    }

    None
}

/// Every platform on `goal_row` reachable from `start`, sorted by column.
///
/// The traversal keeps going through goal cells, so a goal platform that can
/// only be entered sideways along the goal row is still reported.
pub fn reachable_goals(
    board: &Board,
    start: Coord,
    goal_row: usize,
    opponent: Option<Coord>,
) -> Vec<Coord> {
    let dim = board.dim();
    let idx = |(x, y): Coord| y * dim + x;

    let mut visited = vec![false; dim * dim];
    let mut queue = VecDeque::new();
    let mut goals = Vec::new();

    visited[idx(start)] = true;
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        if current.1 == goal_row {
            goals.push(current);
        }
        for mv in find_valid_moves(board, current, opponent) {
            if !visited[idx(mv)] {
                visited[idx(mv)] = true;
                queue.push_back(mv);
            }
        }
    }

    goals.sort_by_key(|&(x, _)| x);
    goals
}
