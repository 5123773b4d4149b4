//! Grid model: the odd-sized matrix of platforms and border slots.
//!
//! The board knows geometry and cell values only. Legality of pawn moves and
//! wall placements lives in [`crate::moves`] and [`crate::game`].

use std::fmt;

use crate::action::Wall;
use crate::constants::{MAX_SIZE, MIN_SIZE, OPEN_SLOT, PLATFORM};
use crate::error::{Error, Result};

/// A matrix coordinate `(x, y)`: `x` is the column, `y` the row.
pub type Coord = (usize, usize);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    size: usize,
    dim: usize,
    cells: Vec<i8>,
}

impl Board {
    /// Create an empty board with `size` platforms per side.
    ///
    /// Every border slot starts open and every platform is `0`.
    pub fn new(size: usize) -> Result<Self> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            return Err(Error::InvalidBoardSize {
                size,
                min: MIN_SIZE,
                max: MAX_SIZE,
            });
        }
        let dim = size * 2 - 1;
        let mut cells = vec![PLATFORM; dim * dim];
        for y in 0..dim {
            for x in 0..dim {
                if x % 2 != 0 || y % 2 != 0 {
                    cells[y * dim + x] = OPEN_SLOT;
                }
            }
        }
        Ok(Self { size, dim, cells })
    }

    /// Rebuild a board from its row-major matrix.
    ///
    /// The matrix must be square with an odd side between `2 * MIN_SIZE - 1`
    /// and `2 * MAX_SIZE - 1`. Platforms must hold `0` and border slots must
    /// be non-zero.
    pub fn from_rows(rows: &[Vec<i8>]) -> Result<Self> {
        let dim = rows.len();
        if dim < MIN_SIZE * 2 - 1 || dim > MAX_SIZE * 2 - 1 || dim % 2 == 0 {
            return Err(invalid_board(format!("matrix side {dim} is not a valid odd size")));
        }
        let mut cells = Vec::with_capacity(dim * dim);
        for (y, row) in rows.iter().enumerate() {
            if row.len() != dim {
                return Err(invalid_board(format!(
                    "row {y} has {} cells, expected {dim}",
                    row.len()
                )));
            }
            for (x, &value) in row.iter().enumerate() {
                let platform = x % 2 == 0 && y % 2 == 0;
                if platform && value != PLATFORM {
                    return Err(invalid_board(format!("platform ({x}, {y}) holds {value}")));
                }
                if !platform && value == PLATFORM {
                    return Err(invalid_board(format!("border slot ({x}, {y}) holds 0")));
                }
                cells.push(value);
            }
        }
        Ok(Self {
            size: dim.div_ceil(2),
            dim,
            cells,
        })
    }

    /// The matrix as a list of rows.
    pub fn rows(&self) -> Vec<Vec<i8>> {
        self.cells.chunks(self.dim).map(<[i8]>::to_vec).collect()
    }

    /// Platforms per side.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Side length of the matrix (`2 * size - 1`).
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    fn idx(&self, (x, y): Coord) -> usize {
        y * self.dim + x
    }

    #[inline]
    pub fn in_bounds(&self, x: isize, y: isize) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.dim && (y as usize) < self.dim
    }

    /// Walk `steps` cells from `from` in direction `(dx, dy)`.
    ///
    /// Returns `None` when the destination leaves the matrix.
    pub fn offset(&self, from: Coord, (dx, dy): (isize, isize), steps: isize) -> Option<Coord> {
        let x = from.0 as isize + dx * steps;
        let y = from.1 as isize + dy * steps;
        self.in_bounds(x, y).then_some((x as usize, y as usize))
    }

    pub fn get(&self, coord: Coord) -> Option<i8> {
        if coord.0 >= self.dim || coord.1 >= self.dim {
            return None;
        }
        Some(self.cells[self.idx(coord)])
    }

    #[inline]
    pub fn is_platform(&self, (x, y): Coord) -> bool {
        x < self.dim && y < self.dim && x % 2 == 0 && y % 2 == 0
    }

    /// True for an in-bounds border slot that no wall covers.
    #[inline]
    pub fn is_open(&self, coord: Coord) -> bool {
        self.get(coord).is_some_and(|v| v > 0)
    }

    /// Reopen every border slot.
    pub(crate) fn clear(&mut self) {
        for v in self.cells.iter_mut().filter(|v| **v != PLATFORM) {
            *v = OPEN_SLOT;
        }
    }

    pub(crate) fn place_wall(&mut self, wall: &Wall, tag: i8) {
        for &slot in wall.slots() {
            let i = self.idx(slot);
            self.cells[i] = tag;
        }
    }

    pub(crate) fn remove_wall(&mut self, wall: &Wall) {
        for &slot in wall.slots() {
            let i = self.idx(slot);
            self.cells[i] = OPEN_SLOT;
        }
    }

    /// Number of slots currently covered by walls.
    pub fn wall_slots(&self) -> usize {
        self.cells.iter().filter(|&&v| v < 0).count()
    }
}

fn invalid_board(reason: String) -> Error {
    Error::InvalidSnapshot {
        reason: format!("board: {reason}"),
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.dim {
            for x in 0..self.dim {
                let ch = match self.cells[self.idx((x, y))] {
                    PLATFORM => '.',
                    v if v < 0 => '#',
                    _ => ' ',
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{Orientation, Wall};
    use crate::constants::WALL_P1;

    #[test]
    fn test_new_board_layout() {
        let board = Board::new(3).unwrap();
        assert_eq!(board.dim(), 5);
        assert_eq!(board.get((0, 0)), Some(PLATFORM));
        assert_eq!(board.get((1, 0)), Some(OPEN_SLOT));
        assert_eq!(board.get((1, 1)), Some(OPEN_SLOT));
        assert_eq!(board.get((4, 4)), Some(PLATFORM));
        assert_eq!(board.get((5, 0)), None);
    }

    #[test]
    fn test_too_small() {
        assert!(matches!(
            Board::new(1),
            Err(Error::InvalidBoardSize { size: 1, .. })
        ));
    }

    #[test]
    fn test_too_large() {
        assert!(matches!(
            Board::new(MAX_SIZE + 1),
            Err(Error::InvalidBoardSize { .. })
        ));
        assert!(Board::new(usize::MAX).is_err());
        assert!(Board::new(MAX_SIZE).is_ok());
    }

    #[test]
    fn test_in_bounds_and_offset() {
        let board = Board::new(3).unwrap();
        assert!(board.in_bounds(0, 0));
        assert!(board.in_bounds(4, 4));
        assert!(!board.in_bounds(-1, 0));
        assert!(!board.in_bounds(0, 5));
        assert_eq!(board.offset((2, 2), (0, -1), 2), Some((2, 0)));
        assert_eq!(board.offset((2, 0), (0, -1), 1), None);
    }

    #[test]
    fn test_place_and_remove_wall() {
        let mut board = Board::new(3).unwrap();
        let wall = Wall::new(Orientation::Vertical, (1, 1)).unwrap();
        board.place_wall(&wall, WALL_P1);
        assert_eq!(board.wall_slots(), 3);
        assert!(!board.is_open((1, 0)));
        assert!(!board.is_open((1, 2)));
        board.remove_wall(&wall);
        assert_eq!(board.wall_slots(), 0);
        assert_eq!(board, Board::new(3).unwrap());
    }

    #[test]
    fn test_rows_roundtrip() {
        let mut board = Board::new(4).unwrap();
        let wall = Wall::new(Orientation::Horizontal, (3, 1)).unwrap();
        board.place_wall(&wall, WALL_P1);
        let rebuilt = Board::from_rows(&board.rows()).unwrap();
        assert_eq!(rebuilt, board);
        assert_eq!(rebuilt.size(), 4);
    }

    #[test]
    fn test_from_rows_rejects_bad_matrix() {
        let mut rows = Board::new(3).unwrap().rows();
        rows[0][0] = 1;
        assert!(matches!(
            Board::from_rows(&rows),
            Err(Error::InvalidSnapshot { .. })
        ));

        let even = vec![vec![0i8; 4]; 4];
        assert!(Board::from_rows(&even).is_err());
    }
}
