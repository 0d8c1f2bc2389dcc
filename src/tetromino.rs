//! Piece catalog: the 7 tetromino kinds and their spawn-orientation masks
//!
//! Each kind has a square mask (side 2, 3 or 4). Other orientations are derived
//! by rotating the mask, never stored.

use ratatui::style::Color;

/// Largest mask side (the I piece)
pub const MAX_SHAPE_SIZE: usize = 4;

/// The 7 tetromino types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TetrominoType {
    I, // Cyan - long bar
    J, // Blue - J-shape
    L, // Orange - L-shape
    O, // Yellow - square
    S, // Green - S-shape
    T, // Purple - T-shape
    Z, // Red - Z-shape
}

impl TetrominoType {
    /// Get the color for this tetromino
    pub fn color(&self) -> Color {
        match self {
            TetrominoType::I => Color::Cyan,
            TetrominoType::J => Color::Blue,
            TetrominoType::L => Color::Rgb(255, 165, 0), // Orange
            TetrominoType::O => Color::Yellow,
            TetrominoType::S => Color::Green,
            TetrominoType::T => Color::Magenta,
            TetrominoType::Z => Color::Red,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TetrominoType::I => "I",
            TetrominoType::J => "J",
            TetrominoType::L => "L",
            TetrominoType::O => "O",
            TetrominoType::S => "S",
            TetrominoType::T => "T",
            TetrominoType::Z => "Z",
        }
    }

    /// All kinds, in catalog order
    pub fn all() -> [TetrominoType; 7] {
        [
            TetrominoType::I,
            TetrominoType::J,
            TetrominoType::L,
            TetrominoType::O,
            TetrominoType::S,
            TetrominoType::T,
            TetrominoType::Z,
        ]
    }

    /// Spawn-orientation mask for this kind
    pub fn shape(&self) -> Shape {
        match self {
            TetrominoType::I => Shape::from_rows(&["....", "####", "....", "...."]),
            TetrominoType::J => Shape::from_rows(&["#..", "###", "..."]),
            TetrominoType::L => Shape::from_rows(&["..#", "###", "..."]),
            TetrominoType::O => Shape::from_rows(&["##", "##"]),
            TetrominoType::S => Shape::from_rows(&[".##", "##.", "..."]),
            TetrominoType::T => Shape::from_rows(&[".#.", "###", "..."]),
            TetrominoType::Z => Shape::from_rows(&["##.", ".##", "..."]),
        }
    }
}

/// A square occupancy mask.
///
/// Only the top-left `size`×`size` corner of `cells` is meaningful; the rest
/// stays `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    size: usize,
    cells: [[bool; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
}

impl Shape {
    /// Build a mask from rows of `#` (occupied) and `.` (empty)
    fn from_rows(rows: &[&str]) -> Self {
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for (r, row) in rows.iter().enumerate() {
            for (c, ch) in row.chars().enumerate() {
                cells[r][c] = ch == '#';
            }
        }
        Self {
            size: rows.len(),
            cells,
        }
    }

    /// Side length of the mask
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        row < self.size && col < self.size && self.cells[row][col]
    }

    /// Occupied (row, col) offsets within the mask, row-major
    pub fn filled(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.size)
            .flat_map(move |r| (0..self.size).map(move |c| (r, c)))
            .filter(|&(r, c)| self.cells[r][c])
    }

    /// Clockwise quarter turn: transpose, then reverse each row.
    pub fn rotated_cw(&self) -> Shape {
        let n = self.size;
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for (r, row) in cells.iter_mut().enumerate().take(n) {
            for (c, cell) in row.iter_mut().enumerate().take(n) {
                *cell = self.cells[n - 1 - c][r];
            }
        }
        Shape { size: n, cells }
    }
}
