//! Tetromino shapes
//!
//! Seven fixed pieces, each a small occupancy matrix plus a display color.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::Color;
use crate::consts::BOARD_COLS;

/// The seven canonical pieces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TetrominoKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl TetrominoKind {
    pub const ALL: [TetrominoKind; 7] = [
        TetrominoKind::I,
        TetrominoKind::O,
        TetrominoKind::T,
        TetrominoKind::S,
        TetrominoKind::Z,
        TetrominoKind::J,
        TetrominoKind::L,
    ];

    /// Spawn-orientation rows, top to bottom
    fn rows(&self) -> &'static [&'static [u8]] {
        match self {
            TetrominoKind::I => &[&[1, 1, 1, 1]],
            TetrominoKind::O => &[&[1, 1], &[1, 1]],
            TetrominoKind::T => &[&[0, 1, 0], &[1, 1, 1]],
            TetrominoKind::S => &[&[0, 1, 1], &[1, 1, 0]],
            TetrominoKind::Z => &[&[1, 1, 0], &[0, 1, 1]],
            TetrominoKind::J => &[&[1, 0, 0], &[1, 1, 1]],
            TetrominoKind::L => &[&[0, 0, 1], &[1, 1, 1]],
        }
    }

    pub fn shape(&self) -> Shape {
        Shape::from_rows(self.rows())
    }

    pub fn color(&self) -> Color {
        match self {
            TetrominoKind::I => Color::hex(0x00ffff),
            TetrominoKind::O => Color::hex(0xffff00),
            TetrominoKind::T => Color::hex(0x800080),
            TetrominoKind::S => Color::hex(0x00ff00),
            TetrominoKind::Z => Color::hex(0xff0000),
            TetrominoKind::J => Color::hex(0x0000ff),
            TetrominoKind::L => Color::hex(0xffa500),
        }
    }

    /// Uniform pick over all seven kinds
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Row-major occupancy matrix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl Shape {
    fn from_rows(rows: &[&[u8]]) -> Self {
        let cols = rows.first().map_or(0, |r| r.len());
        Self {
            rows: rows.len(),
            cols,
            cells: rows.iter().flat_map(|r| r.iter().map(|&c| c != 0)).collect(),
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> bool {
        self.cells[row * self.cols + col]
    }

    /// Occupied cells as `(col, row)` offsets
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.rows).flat_map(move |r| {
            (0..self.cols).filter_map(move |c| self.get(r, c).then_some((c, r)))
        })
    }

    /// Quarter turn clockwise: `new[j][rows - 1 - i] = old[i][j]`
    pub fn rotated(&self) -> Shape {
        let (rows, cols) = (self.cols, self.rows);
        let mut cells = vec![false; rows * cols];
        for i in 0..self.rows {
            for j in 0..self.cols {
                cells[j * cols + (self.rows - 1 - i)] = self.get(i, j);
            }
        }
        Shape { rows, cols, cells }
    }
}

/// A placed or falling piece
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    pub kind: TetrominoKind,
    pub shape: Shape,
    pub color: Color,
    /// Board column of the matrix's left edge
    pub x: i32,
    /// Board row of the matrix's top edge
    pub y: i32,
}

impl Piece {
    /// New piece centered over the board at row 0
    pub fn spawn(kind: TetrominoKind) -> Self {
        let shape = kind.shape();
        let x = (BOARD_COLS / 2) as i32 - (shape.cols() / 2) as i32;
        Self {
            kind,
            color: kind.color(),
            shape,
            x,
            y: 0,
        }
    }

    /// Board coordinates `(x, y)` this piece would cover at an offset
    pub fn cells_at(&self, dx: i32, dy: i32) -> impl Iterator<Item = (i32, i32)> + '_ {
        let (ox, oy) = (self.x + dx, self.y + dy);
        self.shape
            .occupied()
            .map(move |(c, r)| (ox + c as i32, oy + r as i32))
    }

    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.cells_at(0, 0)
    }
}
