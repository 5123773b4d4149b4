//! Plain structural snapshots of a [`GameState`].
//!
//! A snapshot carries the board matrix, both players (position, goal line,
//! remaining walls, cached route), the turn order and the turn counter. Every
//! field is required and unknown fields are rejected, so a snapshot either
//! loads completely or not at all.

use serde::{Deserialize, Serialize};

use crate::board::{Board, Coord};
use crate::error::{Error, Result};
use crate::game::{GameState, Player, PlayerId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct PlayerSnapshot {
    pub position: Coord,
    pub goal_line: usize,
    pub remaining_walls: usize,
    /// Required even though it may be `null`.
    #[serde(deserialize_with = "Option::deserialize")]
    pub shortest_route: Option<Vec<Coord>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct GameSnapshot {
    pub board: Vec<Vec<i8>>,
    pub p1: PlayerSnapshot,
    pub p2: PlayerSnapshot,
    pub turn_order: [PlayerId; 2],
    pub turn_count: usize,
}

impl PlayerSnapshot {
    fn capture(player: &Player) -> Self {
        Self {
            position: player.position,
            goal_line: player.goal_line,
            remaining_walls: player.remaining_walls,
            shortest_route: player.shortest_route.clone(),
        }
    }

    fn restore(&self, id: PlayerId, board: &Board) -> Result<Player> {
        if !board.is_platform(self.position) {
            return Err(invalid(format!(
                "{id} position {:?} is not a platform",
                self.position
            )));
        }
        if self.goal_line >= board.dim() || self.goal_line % 2 != 0 {
            return Err(invalid(format!(
                "{id} goal line {} is not a platform row",
                self.goal_line
            )));
        }
        if let Some(route) = &self.shortest_route {
            if route.is_empty() || route.iter().any(|&c| !board.is_platform(c)) {
                return Err(invalid(format!("{id} cached route leaves the platforms")));
            }
        }
        Ok(Player {
            id,
            position: self.position,
            goal_line: self.goal_line,
            remaining_walls: self.remaining_walls,
            shortest_route: self.shortest_route.clone(),
        })
    }
}

fn invalid(reason: String) -> Error {
    Error::InvalidSnapshot { reason }
}

impl GameState {
    /// Capture the full state as a plain value.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.board.rows(),
            p1: PlayerSnapshot::capture(&self.p1),
            p2: PlayerSnapshot::capture(&self.p2),
            turn_order: self.turn_order,
            turn_count: self.turn_count,
        }
    }

    /// Build a state from a snapshot, validating its shape.
    pub fn from_snapshot(snapshot: &GameSnapshot) -> Result<Self> {
        let board = Board::from_rows(&snapshot.board)?;
        let p1 = snapshot.p1.restore(PlayerId::P1, &board)?;
        let p2 = snapshot.p2.restore(PlayerId::P2, &board)?;
        if p1.position == p2.position {
            return Err(invalid(format!(
                "both pawns stand on {:?}",
                p1.position
            )));
        }
        if snapshot.turn_order[0] == snapshot.turn_order[1] {
            return Err(invalid(format!(
                "turn order {:?} must name both players",
                snapshot.turn_order
            )));
        }
        if snapshot.turn_count == 0 {
            return Err(invalid("turn count must start at 1".to_string()));
        }
        Ok(Self {
            board,
            p1,
            p2,
            turn_order: snapshot.turn_order,
            turn_count: snapshot.turn_count,
        })
    }

    /// Replace this state with the snapshot's.
    ///
    /// On error the current state is left untouched.
    pub fn load_snapshot(&mut self, snapshot: &GameSnapshot) -> Result<()> {
        *self = Self::from_snapshot(snapshot)?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.snapshot())?)
    }

    /// Parse a JSON snapshot. Missing or unknown fields are `InvalidSnapshot`.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: GameSnapshot = serde_json::from_str(json).map_err(|e| Error::InvalidSnapshot {
            reason: e.to_string(),
        })?;
        Self::from_snapshot(&snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{Action, Orientation, Wall};

    fn played_game() -> GameState {
        let mut game = GameState::with_size(5).unwrap();
        game.do_action(&Action::Block(
            Wall::new(Orientation::Horizontal, (3, 5)).unwrap(),
        ));
        game.do_action(&Action::Move {
            from: (4, 0),
            to: (4, 2),
        });
        game
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let game = played_game();
        let restored = GameState::from_snapshot(&game.snapshot()).unwrap();
        assert_eq!(restored, game);
    }

    #[test]
    fn test_json_roundtrip() {
        let game = played_game();
        let json = game.to_json().unwrap();
        assert!(json.contains("\"turnOrder\":[\"P2\",\"P1\"]"));
        let restored = GameState::from_json(&json).unwrap();
        assert_eq!(restored, game);
    }

    #[test]
    fn test_missing_field_rejected() {
        let game = played_game();
        let mut value = serde_json::to_value(game.snapshot()).unwrap();
        value.as_object_mut().unwrap().remove("turnCount");
        let err = GameState::from_json(&value.to_string()).unwrap_err();
        assert!(matches!(err, Error::InvalidSnapshot { .. }));
    }

    #[test]
    fn test_missing_route_rejected() {
        let game = played_game();
        let mut value = serde_json::to_value(game.snapshot()).unwrap();
        value["p1"].as_object_mut().unwrap().remove("shortestRoute");
        let err = GameState::from_json(&value.to_string()).unwrap_err();
        assert!(matches!(err, Error::InvalidSnapshot { .. }));
    }

    #[test]
    fn test_null_route_accepted() {
        let game = played_game();
        let mut value = serde_json::to_value(game.snapshot()).unwrap();
        value["p2"]["shortestRoute"] = serde_json::Value::Null;
        let restored = GameState::from_json(&value.to_string()).unwrap();
        assert_eq!(restored.player(PlayerId::P2).shortest_route(), None);
    }

    #[test]
    fn test_zero_turn_count_rejected() {
        let mut snapshot = played_game().snapshot();
        snapshot.turn_count = 0;
        assert!(matches!(
            GameState::from_snapshot(&snapshot),
            Err(Error::InvalidSnapshot { .. })
        ));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let game = played_game();
        let mut value = serde_json::to_value(game.snapshot()).unwrap();
        value["p1"]["extra"] = serde_json::json!(1);
        assert!(GameState::from_json(&value.to_string()).is_err());
    }

    #[test]
    fn test_failed_load_leaves_state_untouched() {
        let mut game = played_game();
        let before = game.clone();
        let mut snapshot = game.snapshot();
        snapshot.p2.position = (1, 2);
        assert!(game.load_snapshot(&snapshot).is_err());
        assert_eq!(game, before);
    }

    #[test]
    fn test_load_replaces_state() {
        let mut game = GameState::with_size(5).unwrap();
        let other = played_game();
        game.load_snapshot(&other.snapshot()).unwrap();
        assert_eq!(game, other);
    }
}
