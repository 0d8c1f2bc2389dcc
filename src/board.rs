//! Game board representation and collision detection

use crate::piece::Piece;
use crate::tetromino::TetrominoType;

/// Board dimensions
pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 20;

/// A cell on the board - either empty or filled by a locked piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(TetrominoType),
}

impl Cell {
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }
}

/// A full row, captured just before it is removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearedRow {
    /// Board row the line occupied when it was cleared
    pub row: usize,
    /// Kind of the piece that filled each column
    pub cells: [TetrominoType; BOARD_WIDTH],
}

impl ClearedRow {
    /// (column, kind) for every cell of the row
    pub fn columns(&self) -> impl Iterator<Item = (usize, TetrominoType)> + '_ {
        self.cells.iter().copied().enumerate()
    }
}

/// The game board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Grid stored as [row][col], row 0 is the top
    cells: [[Cell; BOARD_WIDTH]; BOARD_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; BOARD_WIDTH]; BOARD_HEIGHT],
        }
    }

    /// Get the cell at a position (row, col)
    /// Returns None if out of bounds
    #[cfg(test)]
    pub fn get(&self, row: i32, col: i32) -> Option<Cell> {
        if row < 0 || col < 0 {
            return None;
        }
        let row = row as usize;
        let col = col as usize;
        if row >= BOARD_HEIGHT || col >= BOARD_WIDTH {
            return None;
        }
        Some(self.cells[row][col])
    }

    /// Set a cell at a position
    /// Returns false if out of bounds
    pub fn set(&mut self, row: i32, col: i32, cell: Cell) -> bool {
        if row < 0 || col < 0 {
            return false;
        }
        let row = row as usize;
        let col = col as usize;
        if row >= BOARD_HEIGHT || col >= BOARD_WIDTH {
            return false;
        }
        self.cells[row][col] = cell;
        true
    }

    /// Whether `piece`, shifted by (`d_row`, `d_col`), would overlap a wall, the
    /// floor or a locked cell.
    ///
    /// Cells above the top edge only get the side-wall check, so a piece can
    /// poke out of the board while it spawns.
    pub fn collides(&self, piece: &Piece, d_row: i32, d_col: i32) -> bool {
        piece.cells_at(d_row, d_col).any(|(row, col)| {
            if col < 0 || col >= BOARD_WIDTH as i32 || row >= BOARD_HEIGHT as i32 {
                return true;
            }
            row >= 0 && self.cells[row as usize][col as usize].is_filled()
        })
    }

    /// Write the piece's cells into the grid.
    ///
    /// Cells above row 0 have nowhere to go and are dropped; the count of
    /// dropped cells is returned.
    pub fn lock(&mut self, piece: &Piece) -> usize {
        let mut dropped = 0;
        for (row, col) in piece.cells() {
            if row < 0 {
                dropped += 1;
                continue;
            }
            self.set(row, col, Cell::Filled(piece.kind));
        }
        dropped
    }

    /// Remove every full row, shifting the rows above it down by one.
    ///
    /// Rows are scanned bottom to top. `on_clear` sees each full row before it
    /// is removed; the same index is checked again afterwards since the row
    /// that fell into it may be full too. Returns the number of rows cleared.
    pub fn clear_full_rows(&mut self, mut on_clear: impl FnMut(ClearedRow)) -> usize {
        let mut cleared = 0;
        let mut row = BOARD_HEIGHT;

        while row > 0 {
            let idx = row - 1;
            let Some(kinds) = self.full_row(idx) else {
                row -= 1;
                continue;
            };

            on_clear(ClearedRow { row: idx, cells: kinds });

            // Drop everything above idx by one; row idx is overwritten
            self.cells.copy_within(0..idx, 1);
            self.cells[0] = [Cell::Empty; BOARD_WIDTH];
            cleared += 1;
        }

        cleared
    }

    /// Kinds of every cell in `row` if the row is completely filled
    fn full_row(&self, row: usize) -> Option<[TetrominoType; BOARD_WIDTH]> {
        let mut kinds = [TetrominoType::I; BOARD_WIDTH];
        for (slot, cell) in kinds.iter_mut().zip(self.cells[row].iter()) {
            match cell {
                Cell::Filled(kind) => *slot = *kind,
                Cell::Empty => return None,
            }
        }
        Some(kinds)
    }

    /// Check if the board is completely empty
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(|cell| cell.is_empty()))
    }

    /// Rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell; BOARD_WIDTH]> {
        self.cells.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_row(board: &mut Board, row: i32, kind: TetrominoType) {
        for col in 0..BOARD_WIDTH as i32 {
            board.set(row, col, Cell::Filled(kind));
        }
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        assert!(board.is_empty());
        assert_eq!(board.rows().count(), BOARD_HEIGHT);
    }

    #[test]
    fn test_set_and_get() {
        let mut board = Board::new();
        assert!(board.set(5, 5, Cell::Filled(TetrominoType::Z)));
        assert_eq!(board.get(5, 5), Some(Cell::Filled(TetrominoType::Z)));
    }

    #[test]
    fn test_out_of_bounds() {
        let mut board = Board::new();
        assert_eq!(board.get(-1, 0), None);
        assert_eq!(board.get(0, -1), None);
        assert_eq!(board.get(BOARD_HEIGHT as i32, 0), None);
        assert_eq!(board.get(0, BOARD_WIDTH as i32), None);
        assert!(!board.set(BOARD_HEIGHT as i32, 0, Cell::Filled(TetrominoType::I)));
    }

    #[test]
    fn test_collides_with_walls_and_floor() {
        let board = Board::new();
        let mut piece = Piece::new(TetrominoType::O);
        assert!(!board.collides(&piece, 0, 0));

        piece.col = 0;
        assert!(board.collides(&piece, 0, -1));
        piece.col = BOARD_WIDTH as i32 - 2;
        assert!(board.collides(&piece, 0, 1));

        piece.row = BOARD_HEIGHT as i32 - 2;
        assert!(!board.collides(&piece, 0, 0));
        assert!(board.collides(&piece, 1, 0));
    }

    #[test]
    fn test_collides_with_locked_cells() {
        let mut board = Board::new();
        let piece = Piece::new(TetrominoType::O);
        board.set(2, 4, Cell::Filled(TetrominoType::T));
        assert!(!board.collides(&piece, 0, 0));
        assert!(board.collides(&piece, 1, 0));
        assert!(!board.collides(&piece, 1, 2));
    }

    #[test]
    fn test_above_top_only_checks_walls() {
        let mut board = Board::new();
        fill_row(&mut board, 0, TetrominoType::J);
        let mut piece = Piece::new(TetrominoType::O);
        piece.row = -2;
        assert!(!board.collides(&piece, 0, 0));

        piece.col = -1;
        assert!(board.collides(&piece, 0, 0));
    }

    #[test]
    fn test_lock_writes_kind() {
        let mut board = Board::new();
        let mut piece = Piece::new(TetrominoType::T);
        piece.row = 10;
        assert_eq!(board.lock(&piece), 0);
        for (row, col) in piece.cells() {
            assert_eq!(board.get(row, col), Some(Cell::Filled(TetrominoType::T)));
        }
    }

    #[test]
    fn test_lock_drops_cells_above_top() {
        let mut board = Board::new();
        let mut piece = Piece::new(TetrominoType::O);
        piece.row = -1;
        assert_eq!(board.lock(&piece), 2);
        assert_eq!(board.get(0, 4), Some(Cell::Filled(TetrominoType::O)));
        assert_eq!(board.get(0, 5), Some(Cell::Filled(TetrominoType::O)));
        assert_eq!(board.rows().flatten().filter(|c| c.is_filled()).count(), 2);
    }

    #[test]
    fn test_clear_without_full_rows_is_noop() {
        let mut board = Board::new();
        for col in 0..BOARD_WIDTH as i32 - 1 {
            board.set(19, col, Cell::Filled(TetrominoType::L));
        }
        board.set(3, 7, Cell::Filled(TetrominoType::S));
        let before = board.clone();

        let mut events = Vec::new();
        assert_eq!(board.clear_full_rows(|row| events.push(row)), 0);
        assert_eq!(board, before);
        assert!(events.is_empty());
    }

    #[test]
    fn test_clear_single_row_shifts_rows_above() {
        let mut board = Board::new();
        fill_row(&mut board, 15, TetrominoType::I);
        board.set(14, 2, Cell::Filled(TetrominoType::Z));
        board.set(0, 9, Cell::Filled(TetrominoType::T));
        board.set(18, 0, Cell::Filled(TetrominoType::S));

        let mut events = Vec::new();
        assert_eq!(board.clear_full_rows(|row| events.push(row)), 1);

        assert!(board.rows().next().is_some_and(|row| row.iter().all(Cell::is_empty)));
        assert_eq!(board.get(15, 2), Some(Cell::Filled(TetrominoType::Z)));
        assert_eq!(board.get(1, 9), Some(Cell::Filled(TetrominoType::T)));
        // Below the cleared row: untouched
        assert_eq!(board.get(18, 0), Some(Cell::Filled(TetrominoType::S)));
        assert_eq!(board.rows().flatten().filter(|c| c.is_filled()).count(), 3);

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].row, 15);
        assert!(events[0].columns().all(|(_, kind)| kind == TetrominoType::I));
    }

    #[test]
    fn test_clear_adjacent_rows_rechecks_index() {
        let mut board = Board::new();
        fill_row(&mut board, 19, TetrominoType::O);
        fill_row(&mut board, 18, TetrominoType::J);
        board.set(17, 4, Cell::Filled(TetrominoType::T));

        let mut events = Vec::new();
        assert_eq!(board.clear_full_rows(|row| events.push(row)), 2);

        // Both lines reported at the bottom index, lower one first
        let reported: Vec<_> = events.iter().map(|e| (e.row, e.cells[0])).collect();
        assert_eq!(
            reported,
            vec![(19, TetrominoType::O), (19, TetrominoType::J)]
        );
        assert_eq!(board.get(19, 4), Some(Cell::Filled(TetrominoType::T)));
        assert_eq!(board.rows().flatten().filter(|c| c.is_filled()).count(), 1);
    }

    #[test]
    fn test_clear_split_rows() {
        let mut board = Board::new();
        fill_row(&mut board, 19, TetrominoType::I);
        board.set(18, 0, Cell::Filled(TetrominoType::L));
        fill_row(&mut board, 17, TetrominoType::I);

        let mut rows = Vec::new();
        assert_eq!(board.clear_full_rows(|row| rows.push(row.row)), 2);
        assert_eq!(rows, vec![19, 18]);
        assert_eq!(board.get(19, 0), Some(Cell::Filled(TetrominoType::L)));
    }
}
