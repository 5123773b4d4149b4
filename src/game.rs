//! Game state: board, both players, turn order, and the rules tying them together.
//!
//! This module provides:
//! - Wall legality (slots open and no player sealed off from their goal)
//! - Valid move, wall, and action enumeration for the player to move
//! - Applying and reverting actions
//! - Winner detection, with an optional early prediction for rollouts
//!
//! The engine trusts its caller: [`GameState::do_action`] applies whatever it is
//! given. Use [`GameState::try_action`] when the action comes from outside.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::action::{Action, Orientation, Wall};
use crate::board::{Board, Coord};
use crate::constants::{WALL_P1, WALL_P2};
use crate::error::{Error, Result};
use crate::moves::find_valid_moves;
use crate::path;

/// Turn token identifying one of the two players.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerId {
    P1,
    P2,
}

impl PlayerId {
    #[inline]
    pub fn other(self) -> Self {
        match self {
            PlayerId::P1 => PlayerId::P2,
            PlayerId::P2 => PlayerId::P1,
        }
    }

    /// Slot value marking a wall placed by this player.
    #[inline]
    pub fn wall_tag(self) -> i8 {
        match self {
            PlayerId::P1 => WALL_P1,
            PlayerId::P2 => WALL_P2,
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerId::P1 => write!(f, "P1"),
            PlayerId::P2 => write!(f, "P2"),
        }
    }
}

/// Whether the game is still being played.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    InProgress,
    Terminal(PlayerId),
}

/// A pawn together with its goal and wall supply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub(crate) id: PlayerId,
    pub(crate) position: Coord,
    pub(crate) goal_line: usize,
    pub(crate) remaining_walls: usize,
    /// Shortest route to the goal line, refreshed after every turn.
    pub(crate) shortest_route: Option<Vec<Coord>>,
}

impl Player {
    /// Place a fresh player on its home edge.
    ///
    /// P1 starts on the bottom row heading for row 0; P2 starts on row 0
    /// heading for the bottom row. Both start in the middle platform column
    /// and hold `size + 1` walls.
    fn new(id: PlayerId, size: usize) -> Self {
        let last = size * 2 - 2;
        let column = (size - 1) / 2 * 2;
        let (position, goal_line) = match id {
            PlayerId::P1 => ((column, last), 0),
            PlayerId::P2 => ((column, 0), last),
        };
        Self {
            id,
            position,
            goal_line,
            remaining_walls: size + 1,
            shortest_route: None,
        }
    }

    #[inline]
    pub fn id(&self) -> PlayerId {
        self.id
    }

    #[inline]
    pub fn position(&self) -> Coord {
        self.position
    }

    #[inline]
    pub fn goal_line(&self) -> usize {
        self.goal_line
    }

    #[inline]
    pub fn remaining_walls(&self) -> usize {
        self.remaining_walls
    }

    pub fn shortest_route(&self) -> Option<&[Coord]> {
        self.shortest_route.as_deref()
    }

    /// Number of steps left along the cached route.
    pub fn distance_to_goal(&self) -> Option<usize> {
        self.shortest_route.as_ref().map(|r| r.len() - 1)
    }

    /// True when the next step along the cached route reaches the goal line.
    pub fn wins_next_move(&self) -> bool {
        self.distance_to_goal() == Some(1)
    }

    #[inline]
    pub fn on_goal(&self) -> bool {
        self.position.1 == self.goal_line
    }
}

/// The complete, independently cloneable state of one game.
///
/// The player to move is `turn_order[turn_count % 2]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub(crate) board: Board,
    pub(crate) p1: Player,
    pub(crate) p2: Player,
    pub(crate) turn_order: [PlayerId; 2],
    pub(crate) turn_count: usize,
}

impl GameState {
    /// Create a new game with `size` platforms per side.
    ///
    /// The turn counter starts at 1, so with `[P2, P1]` P1 moves first.
    pub fn new(size: usize, turn_order: [PlayerId; 2]) -> Result<Self> {
        if turn_order[0] == turn_order[1] {
            return Err(Error::InvalidConfiguration {
                message: format!("turn order {turn_order:?} must name both players"),
            });
        }
        let board = Board::new(size)?;
        let mut game = Self {
            board,
            p1: Player::new(PlayerId::P1, size),
            p2: Player::new(PlayerId::P2, size),
            turn_order,
            turn_count: 1,
        };
        game.refresh_routes();
        Ok(game)
    }

    /// Create a new game where P1 moves first.
    pub fn with_size(size: usize) -> Result<Self> {
        Self::new(size, [PlayerId::P2, PlayerId::P1])
    }

    /// Reset the board and both players, keeping the size and turn order.
    pub fn restart(&mut self) {
        let size = self.board.size();
        self.board.clear();
        self.p1 = Player::new(PlayerId::P1, size);
        self.p2 = Player::new(PlayerId::P2, size);
        self.turn_count = 1;
        self.refresh_routes();
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.board.size()
    }

    #[inline]
    pub fn turn_count(&self) -> usize {
        self.turn_count
    }

    #[inline]
    pub fn turn_order(&self) -> [PlayerId; 2] {
        self.turn_order
    }

    #[inline]
    pub fn current_turn(&self) -> PlayerId {
        self.turn_order[self.turn_count % 2]
    }

    #[inline]
    pub fn next_turn(&self) -> PlayerId {
        self.turn_order[(self.turn_count + 1) % 2]
    }

    pub fn player(&self, id: PlayerId) -> &Player {
        match id {
            PlayerId::P1 => &self.p1,
            PlayerId::P2 => &self.p2,
        }
    }

    fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        match id {
            PlayerId::P1 => &mut self.p1,
            PlayerId::P2 => &mut self.p2,
        }
    }

    /// The player to move.
    #[inline]
    pub fn current_player(&self) -> &Player {
        self.player(self.current_turn())
    }

    /// The player waiting for their turn.
    #[inline]
    pub fn opponent(&self) -> &Player {
        self.player(self.next_turn())
    }

    // =========================================================================
    // Moves and walls
    // =========================================================================

    /// Destinations for the player to move.
    ///
    /// With `consider_opponent` false the opponent's pawn is ignored.
    pub fn valid_moves(&self, consider_opponent: bool) -> Vec<Coord> {
        let opponent = consider_opponent.then(|| self.opponent().position);
        find_valid_moves(&self.board, self.current_player().position, opponent)
    }

    /// True when all three slots of `wall` exist and are open.
    pub fn is_available(&self, wall: &Wall) -> bool {
        wall.slots().iter().all(|&slot| self.board.is_open(slot))
    }

    /// True when placing `wall` leaves either player without any route to goal.
    ///
    /// The probe runs on a copy of the board; opponents are ignored, only raw
    /// reachability counts.
    pub fn is_dead_block(&self, wall: &Wall) -> bool {
        let mut probe = self.board.clone();
        probe.place_wall(wall, self.current_turn().wall_tag());
        [&self.p1, &self.p2]
            .iter()
            .any(|p| path::shortest_route(&probe, p.position, p.goal_line, None).is_none())
    }

    pub fn is_valid_block(&self, wall: &Wall) -> bool {
        self.is_available(wall) && !self.is_dead_block(wall)
    }

    /// Every legal wall, vertical ones first, each group scanned row by row.
    pub fn valid_blocks(&self) -> Vec<Wall> {
        let junctions = self.size() - 1;
        let mut vertical = Vec::new();
        let mut horizontal = Vec::new();
        for row in 0..junctions {
            for column in 0..junctions {
                let center = (1 + column * 2, 1 + row * 2);
                vertical.extend(Wall::new(Orientation::Vertical, center));
                horizontal.extend(Wall::new(Orientation::Horizontal, center));
            }
        }
        vertical
            .into_iter()
            .chain(horizontal)
            .filter(|wall| self.is_valid_block(wall))
            .collect()
    }

    /// All legal actions for the player to move: moves first, then walls.
    ///
    /// Walls are only offered while the player has some left.
    pub fn valid_actions(&self) -> Vec<Action> {
        let from = self.current_player().position;
        let mut actions: Vec<Action> = self
            .valid_moves(true)
            .into_iter()
            .map(|to| Action::Move { from, to })
            .collect();
        if self.current_player().remaining_walls > 0 {
            actions.extend(self.valid_blocks().into_iter().map(Action::Block));
        }
        actions
    }

    // =========================================================================
    // Applying actions
    // =========================================================================

    /// Apply `action` for the player to move and pass the turn.
    ///
    /// The action is not checked; it must come from [`Self::valid_actions`].
    pub fn do_action(&mut self, action: &Action) {
        let mover = self.current_turn();
        match action {
            Action::Move { to, .. } => {
                self.player_mut(mover).position = *to;
            }
            Action::Block(wall) => {
                self.board.place_wall(wall, mover.wall_tag());
                let player = self.player_mut(mover);
                player.remaining_walls = player.remaining_walls.saturating_sub(1);
            }
        }
        self.turn_count += 1;
        self.refresh_routes();
    }

    /// Revert `action`, which must be the last action applied.
    pub fn undo_action(&mut self, action: &Action) {
        // The player who acted is the one now waiting.
        let mover = self.next_turn();
        match action {
            Action::Move { from, .. } => {
                self.player_mut(mover).position = *from;
            }
            Action::Block(wall) => {
                self.board.remove_wall(wall);
                self.player_mut(mover).remaining_walls += 1;
            }
        }
        self.turn_count = self.turn_count.saturating_sub(1);
        self.refresh_routes();
    }

    /// Apply `action` only if it is legal for the player to move.
    pub fn try_action(&mut self, action: &Action) -> Result<()> {
        if let Some(winner) = self.check_winner(false) {
            return Err(Error::GameOver { winner });
        }
        let legal = match action {
            Action::Move { from, to } => {
                *from == self.current_player().position && self.valid_moves(true).contains(to)
            }
            Action::Block(wall) => {
                self.current_player().remaining_walls > 0 && self.is_valid_block(wall)
            }
        };
        if !legal {
            return Err(Error::IllegalAction {
                action: action.to_string(),
            });
        }
        self.do_action(action);
        Ok(())
    }

    pub(crate) fn refresh_routes(&mut self) {
        let p1 = path::shortest_route(
            &self.board,
            self.p1.position,
            self.p1.goal_line,
            Some(self.p2.position),
        );
        let p2 = path::shortest_route(
            &self.board,
            self.p2.position,
            self.p2.goal_line,
            Some(self.p1.position),
        );
        self.p1.shortest_route = p1;
        self.p2.shortest_route = p2;
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Shortest route to goal for the player to move.
    pub fn shortest_route(&self, consider_opponent: bool) -> Option<Vec<Coord>> {
        let player = self.current_player();
        let opponent = consider_opponent.then(|| self.opponent().position);
        path::shortest_route(&self.board, player.position, player.goal_line, opponent)
    }

    /// The player standing on their goal line, if any.
    ///
    /// With `check_future`, also predicts the player to move as the winner when
    /// the opponent has no walls left and the mover's route is strictly shorter.
    /// That prediction ends rollouts early; it is not a rules outcome.
    pub fn check_winner(&self, check_future: bool) -> Option<PlayerId> {
        let player = self.current_player();
        let opponent = self.opponent();
        if player.on_goal() {
            return Some(player.id);
        }
        if opponent.on_goal() {
            return Some(opponent.id);
        }
        if check_future && opponent.remaining_walls == 0 {
            if let (Some(mine), Some(theirs)) = (player.distance_to_goal(), opponent.distance_to_goal()) {
                if mine < theirs {
                    return Some(player.id);
                }
            }
        }
        None
    }

    pub fn outcome(&self) -> Outcome {
        match self.check_winner(false) {
            Some(winner) => Outcome::Terminal(winner),
            None => Outcome::InProgress,
        }
    }

    /// Goal-line platforms `turn` can reach, sorted by column.
    pub fn reachable_goals(&self, turn: PlayerId) -> Vec<Coord> {
        let player = self.player(turn);
        let opponent = self.player(turn.other());
        path::reachable_goals(
            &self.board,
            player.position,
            player.goal_line,
            Some(opponent.position),
        )
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dim = self.board.dim();
        for y in 0..dim {
            for x in 0..dim {
                let ch = if (x, y) == self.p1.position {
                    '1'
                } else if (x, y) == self.p2.position {
                    '2'
                } else {
                    match self.board.get((x, y)) {
                        Some(0) => '.',
                        Some(v) if v < 0 => '#',
                        _ => ' ',
                    }
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        write!(
            f,
            "turn {} ({} to move)  walls P1={} P2={}",
            self.turn_count,
            self.current_turn(),
            self.p1.remaining_walls,
            self.p2.remaining_walls
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game_layout() {
        let game = GameState::with_size(9).unwrap();
        assert_eq!(game.current_turn(), PlayerId::P1);
        assert_eq!(game.player(PlayerId::P1).position(), (8, 16));
        assert_eq!(game.player(PlayerId::P2).position(), (8, 0));
        assert_eq!(game.player(PlayerId::P1).goal_line(), 0);
        assert_eq!(game.player(PlayerId::P2).goal_line(), 16);
        assert_eq!(game.player(PlayerId::P1).remaining_walls(), 10);
        assert_eq!(game.player(PlayerId::P1).distance_to_goal(), Some(8));
        assert_eq!(game.check_winner(false), None);
    }

    #[test]
    fn test_even_size_starts_on_platform() {
        let game = GameState::with_size(4).unwrap();
        let start = game.player(PlayerId::P1).position();
        assert!(game.board().is_platform(start));
    }

    #[test]
    fn test_turn_order_must_differ() {
        assert!(GameState::new(3, [PlayerId::P1, PlayerId::P1]).is_err());
    }

    #[test]
    fn test_turns_alternate() {
        let mut game = GameState::with_size(3).unwrap();
        game.do_action(&Action::Move {
            from: (2, 4),
            to: (0, 4),
        });
        assert_eq!(game.current_turn(), PlayerId::P2);
        assert_eq!(game.turn_count(), 2);
    }

    #[test]
    fn test_block_decrements_and_tags() {
        let mut game = GameState::with_size(3).unwrap();
        let wall = Wall::new(Orientation::Vertical, (1, 1)).unwrap();
        game.do_action(&Action::Block(wall));
        assert_eq!(game.player(PlayerId::P1).remaining_walls(), 3);
        assert_eq!(game.board().get((1, 1)), Some(WALL_P1));
        assert!(!game.is_available(&wall));
    }

    #[test]
    fn test_undo_block_restores_mover_walls() {
        let mut game = GameState::with_size(3).unwrap();
        let before = game.clone();
        let wall = Wall::new(Orientation::Horizontal, (3, 1)).unwrap();
        let action = Action::Block(wall);
        game.do_action(&action);
        game.undo_action(&action);
        assert_eq!(game, before);
    }

    #[test]
    fn test_overlapping_wall_unavailable() {
        let mut game = GameState::with_size(3).unwrap();
        game.do_action(&Action::Block(
            Wall::new(Orientation::Vertical, (1, 1)).unwrap(),
        ));
        // Crossing wall shares the centre slot.
        let crossing = Wall::new(Orientation::Horizontal, (1, 1)).unwrap();
        assert!(!game.is_available(&crossing));
        assert!(!game.valid_blocks().contains(&crossing));
    }

    #[test]
    fn test_dead_block_detected() {
        let mut game = GameState::with_size(3).unwrap();
        // P1 walls off the crossings above (0,4) and (2,4).
        game.do_action(&Action::Block(
            Wall::new(Orientation::Horizontal, (1, 3)).unwrap(),
        ));
        // Cutting (2,4) from (4,4) would trap P1 in the bottom-left corner.
        let seal = Wall::new(Orientation::Vertical, (3, 3)).unwrap();
        assert!(game.is_available(&seal));
        assert!(game.is_dead_block(&seal));
        assert!(!game.is_valid_block(&seal));
        assert!(!game.valid_blocks().contains(&seal));
    }

    #[test]
    fn test_dead_block_probe_leaves_state_untouched() {
        let game = GameState::with_size(3).unwrap();
        let before = game.clone();
        for wall in game.valid_blocks() {
            let _ = game.is_dead_block(&wall);
        }
        assert_eq!(game, before);
    }

    #[test]
    fn test_initial_block_count() {
        // 2 junctions per side -> 4 junctions, 2 orientations each, all legal.
        let game = GameState::with_size(3).unwrap();
        assert_eq!(game.valid_blocks().len(), 8);
    }

    #[test]
    fn test_no_walls_means_only_moves() {
        let mut game = GameState::with_size(3).unwrap();
        game.p1.remaining_walls = 0;
        assert!(game
            .valid_actions()
            .iter()
            .all(|a| matches!(a, Action::Move { .. })));
    }

    #[test]
    fn test_try_action_rejects_illegal() {
        let mut game = GameState::with_size(3).unwrap();
        let jump_two = Action::Move {
            from: (2, 4),
            to: (2, 0),
        };
        assert!(matches!(
            game.try_action(&jump_two),
            Err(Error::IllegalAction { .. })
        ));
        assert_eq!(game.turn_count(), 1);
    }

    #[test]
    fn test_winner_on_goal_line() {
        let mut game = GameState::with_size(3).unwrap();
        game.p1.position = (0, 0);
        game.refresh_routes();
        assert_eq!(game.check_winner(false), Some(PlayerId::P1));
        assert_eq!(game.outcome(), Outcome::Terminal(PlayerId::P1));
    }

    #[test]
    fn test_reachable_goals_skip_opponent_cell() {
        let mut game = GameState::with_size(3).unwrap();
        game.p1.position = (2, 2);
        game.p2.position = (4, 0);
        game.refresh_routes();
        assert_eq!(game.reachable_goals(PlayerId::P1), vec![(0, 0), (2, 0)]);
        // P2's own goal row is free of pawns.
        assert_eq!(
            game.reachable_goals(PlayerId::P2),
            vec![(0, 4), (2, 4), (4, 4)]
        );
    }

    #[test]
    fn test_reachable_goals_around_walls() {
        let mut game = GameState::with_size(3).unwrap();
        // Close the crossings above (0,2) and (2,2).
        game.do_action(&Action::Block(
            Wall::new(Orientation::Horizontal, (1, 1)).unwrap(),
        ));
        game.do_action(&Action::Move {
            from: (2, 0),
            to: (4, 0),
        });
        game.do_action(&Action::Block(
            Wall::new(Orientation::Vertical, (1, 3)).unwrap(),
        ));
        let goals = game.reachable_goals(PlayerId::P1);
        assert!(!goals.is_empty());
        assert!(!goals.contains(&(4, 0)), "occupied by P2");
    }

    #[test]
    fn test_display_shows_pawns() {
        let game = GameState::with_size(3).unwrap();
        let text = game.to_string();
        assert!(text.starts_with(". 2 .\n"));
        assert!(text.contains("\n. 1 .\n"));
    }
}
