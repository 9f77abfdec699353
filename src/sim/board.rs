//! Puzzle board grid
//!
//! 20 rows of 10 cells. A cell is either empty or holds the color of the
//! piece that landed there.

use serde::{Deserialize, Serialize};

use super::state::Color;
use super::tetromino::Piece;
use crate::consts::{BOARD_COLS, BOARD_ROWS};

pub type Cell = Option<Color>;
pub type Row = [Cell; BOARD_COLS];

const EMPTY_ROW: Row = [None; BOARD_COLS];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    rows: Vec<Row>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            rows: vec![EMPTY_ROW; BOARD_ROWS],
        }
    }

    pub fn clear(&mut self) {
        self.rows.iter_mut().for_each(|row| *row = EMPTY_ROW);
    }

    /// Rows top to bottom
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, y: usize) -> &Row {
        &self.rows[y]
    }

    /// Cell at board coordinates, `None` outside the grid
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        if x < 0 || y < 0 {
            return None;
        }
        self.rows
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
            .copied()
    }

    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        self.rows[y][x] = cell;
    }

    pub fn occupied_count(&self) -> usize {
        self.rows.iter().flatten().filter(|c| c.is_some()).count()
    }

    /// Whether `piece` shifted by `(dx, dy)` sits inside the walls and floor
    /// without covering a filled cell. Cells above the top edge are allowed.
    pub fn fits(&self, piece: &Piece, dx: i32, dy: i32) -> bool {
        piece.cells_at(dx, dy).all(|(x, y)| {
            if x < 0 || x >= BOARD_COLS as i32 || y >= BOARD_ROWS as i32 {
                return false;
            }
            y < 0 || self.rows[y as usize][x as usize].is_none()
        })
    }

    /// Write a landed piece into the grid. Cells above the top edge are dropped.
    pub fn lock(&mut self, piece: &Piece) {
        for (x, y) in piece.cells() {
            if y >= 0 && (y as usize) < BOARD_ROWS && x >= 0 && (x as usize) < BOARD_COLS {
                self.rows[y as usize][x as usize] = Some(piece.color);
            }
        }
    }

    /// Remove every full row, shifting rows above down. Returns the count.
    pub fn clear_lines(&mut self) -> u32 {
        let mut cleared = 0;
        let mut y = BOARD_ROWS;
        while y > 0 {
            let idx = y - 1;
            if self.rows[idx].iter().all(Option::is_some) {
                self.rows.remove(idx);
                self.rows.insert(0, EMPTY_ROW);
                cleared += 1;
                // Same index again: the row above slid into it
                continue;
            }
            y -= 1;
        }
        cleared
    }

    /// True when anything has settled in the top row
    pub fn top_row_occupied(&self) -> bool {
        self.rows[0].iter().any(Option::is_some)
    }
}
