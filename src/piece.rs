//! Active falling piece

use crate::board::BOARD_WIDTH;
use crate::tetromino::{Shape, TetrominoType};

/// A piece on (or just above) the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    /// The type of tetromino
    pub kind: TetrominoType,
    /// Current orientation; starts as the catalog mask
    pub shape: Shape,
    /// Board position of the mask's top-left corner.
    /// Row 0 is the top of the board, row increases downward.
    pub row: i32,
    pub col: i32,
}

impl Piece {
    /// Create a new piece at its spawn position, horizontally centered on row 0
    pub fn new(kind: TetrominoType) -> Self {
        let shape = kind.shape();
        Self {
            kind,
            shape,
            row: 0,
            col: (BOARD_WIDTH / 2) as i32 - (shape.size() / 2) as i32,
        }
    }

    /// Board (row, col) of every occupied cell if the piece were shifted by
    /// (`d_row`, `d_col`). All collision, locking and drawing goes through here.
    pub fn cells_at(&self, d_row: i32, d_col: i32) -> impl Iterator<Item = (i32, i32)> + '_ {
        let row = self.row + d_row;
        let col = self.col + d_col;
        self.shape
            .filled()
            .map(move |(r, c)| (row + r as i32, col + c as i32))
    }

    /// Board (row, col) of every occupied cell at the current position
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.cells_at(0, 0)
    }

    /// Same piece with its mask turned a quarter clockwise, origin unchanged
    pub fn rotated(&self) -> Piece {
        Piece {
            shape: self.shape.rotated_cw(),
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_position() {
        // floor(10 / 2) - floor(side / 2)
        assert_eq!(Piece::new(TetrominoType::I).col, 3);
        assert_eq!(Piece::new(TetrominoType::O).col, 4);
        assert_eq!(Piece::new(TetrominoType::T).col, 4);
        for kind in TetrominoType::all() {
            assert_eq!(Piece::new(kind).row, 0);
        }
    }

    #[test]
    fn test_cells_apply_origin() {
        let piece = Piece::new(TetrominoType::O);
        let cells: Vec<_> = piece.cells().collect();
        assert_eq!(cells, vec![(0, 4), (0, 5), (1, 4), (1, 5)]);
    }

    #[test]
    fn test_cells_at_offset() {
        let mut piece = Piece::new(TetrominoType::I);
        piece.row = 5;
        let cells: Vec<_> = piece.cells_at(1, -2).collect();
        assert_eq!(cells, vec![(7, 1), (7, 2), (7, 3), (7, 4)]);
    }

    #[test]
    fn test_rotated_keeps_origin() {
        let mut piece = Piece::new(TetrominoType::L);
        piece.row = 3;
        let turned = piece.rotated();
        assert_eq!((turned.row, turned.col), (3, piece.col));
        assert_ne!(turned.shape, piece.shape);
        assert_eq!(piece.shape, TetrominoType::L.shape());
    }
}
