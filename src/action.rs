//! Actions a player can take on their turn: move the pawn or place a wall.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::Coord;
use crate::constants::WALL_LEN;
use crate::error::{Error, Result};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// All three slots share a column.
    Vertical,
    /// All three slots share a row.
    Horizontal,
}

/// Three contiguous border slots centred on the junction between four platforms.
///
/// Slots are kept sorted (top to bottom, or left to right), so two walls covering
/// the same slots compare equal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[Coord; 3]", into = "[Coord; 3]")]
pub struct Wall {
    slots: [Coord; WALL_LEN],
}

impl Wall {
    /// Build a wall from its orientation and junction centre.
    ///
    /// The centre must sit on an odd row and an odd column.
    pub fn new(orientation: Orientation, (x, y): Coord) -> Result<Self> {
        if x % 2 == 0 || y % 2 == 0 {
            return Err(Error::InvalidWall {
                reason: format!("centre ({x}, {y}) is not a junction"),
            });
        }
        let slots = match orientation {
            Orientation::Vertical => [(x, y - 1), (x, y), (x, y + 1)],
            Orientation::Horizontal => [(x - 1, y), (x, y), (x + 1, y)],
        };
        Ok(Self { slots })
    }

    /// Build a wall from three slot coordinates in any order.
    ///
    /// The slots must form a straight, contiguous run whose middle cell is a
    /// junction (odd row and odd column).
    pub fn from_slots(mut slots: [Coord; WALL_LEN]) -> Result<Self> {
        let vertical = slots.iter().all(|s| s.0 == slots[0].0);
        let horizontal = slots.iter().all(|s| s.1 == slots[0].1);
        let orientation = match (vertical, horizontal) {
            (true, false) => Orientation::Vertical,
            (false, true) => Orientation::Horizontal,
            _ => {
                return Err(Error::InvalidWall {
                    reason: format!("slots {slots:?} are not a straight line"),
                });
            }
        };
        slots.sort_by_key(|&(x, y)| match orientation {
            Orientation::Vertical => y,
            Orientation::Horizontal => x,
        });
        let wall = Self::new(orientation, slots[1])?;
        if wall.slots != slots {
            return Err(Error::InvalidWall {
                reason: format!("slots {slots:?} are not contiguous"),
            });
        }
        Ok(wall)
    }

    #[inline]
    pub fn slots(&self) -> &[Coord; WALL_LEN] {
        &self.slots
    }

    #[inline]
    pub fn center(&self) -> Coord {
        self.slots[1]
    }

    pub fn orientation(&self) -> Orientation {
        if self.slots[0].0 == self.slots[2].0 {
            Orientation::Vertical
        } else {
            Orientation::Horizontal
        }
    }
}

impl TryFrom<[Coord; WALL_LEN]> for Wall {
    type Error = Error;

    fn try_from(slots: [Coord; WALL_LEN]) -> Result<Self> {
        Self::from_slots(slots)
    }
}

impl From<Wall> for [Coord; WALL_LEN] {
    fn from(wall: Wall) -> Self {
        wall.slots
    }
}

impl fmt::Display for Wall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (x, y) = self.center();
        let o = match self.orientation() {
            Orientation::Vertical => 'v',
            Orientation::Horizontal => 'h',
        };
        write!(f, "{o} {x} {y}")
    }
}

/// One turn's worth of play.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum Action {
    /// Relocate the mover's pawn from `from` to `to`.
    Move { from: Coord, to: Coord },
    /// Place a wall.
    Block(Wall),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Move { from, to } => {
                write!(f, "move {} {} -> {} {}", from.0, from.1, to.0, to.1)
            }
            Action::Block(wall) => write!(f, "wall {wall}"),
        }
    }
}
