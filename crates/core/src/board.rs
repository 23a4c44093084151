//! Board module - manages the game grid
//!
//! The board is a `width x height` grid where each cell is empty or holds the
//! kind of the locked piece that filled it. Storage is a flat row-major vector
//! sized once at construction; dimensions never change afterwards.
//! Coordinates: (x, y) where x grows left to right and y grows top to bottom.
//! Row indices below zero are "above the board": they are never stored.

use crate::pieces::Shape;
use crate::types::{Cell, PieceKind};

/// The game board using flat row-major storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty board
    ///
    /// Dimensions are validated by [`GameConfig`](crate::GameConfig); the board
    /// itself accepts any size.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.is_out_of_bounds(x, y) {
            return None;
        }
        Some((y as usize) * self.width + (x as usize))
    }

    /// Get width of the board
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get height of the board
    pub fn height(&self) -> usize {
        self.height
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Check if position is out of bounds
    pub fn is_out_of_bounds(&self, x: i32, y: i32) -> bool {
        x < 0 || x >= self.width as i32 || y < 0 || y >= self.height as i32
    }

    /// Whether `shape` anchored at (x, y) would collide
    ///
    /// An occupied shape cell collides when it lies outside the side walls,
    /// at or below the floor, or on a filled board cell. Cells above row 0
    /// only collide with the side walls. An anchor so far out that a cell
    /// coordinate overflows always collides.
    pub fn collides(&self, x: i32, y: i32, shape: &Shape) -> bool {
        shape.minos().iter().any(|&(dx, dy)| {
            let (Some(px), Some(py)) = (x.checked_add(dx), y.checked_add(dy)) else {
                return true;
            };
            px < 0
                || px >= self.width as i32
                || py >= self.height as i32
                || (py >= 0 && self.is_occupied(px, py))
        })
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= self.height {
            return false;
        }
        let start = y * self.width;
        self.cells[start..start + self.width]
            .iter()
            .all(|cell| cell.is_some())
    }

    /// Clear all full rows and return the row indices that were cleared (top to bottom)
    ///
    /// Remaining rows keep their relative order and settle at the bottom; the
    /// same number of empty rows appears at the top.
    pub fn clear_full_rows(&mut self) -> Vec<usize> {
        let full: Vec<usize> = (0..self.height).filter(|&y| self.is_row_full(y)).collect();
        if full.is_empty() {
            return full;
        }

        let width = self.width;
        let mut write_y = self.height;

        // Scan from bottom to top, compacting survivors downwards
        for read_y in (0..self.height).rev() {
            if self.is_row_full(read_y) {
                continue;
            }
            write_y -= 1;
            if write_y != read_y {
                let src_start = read_y * width;
                self.cells
                    .copy_within(src_start..src_start + width, write_y * width);
            }
        }

        for cell in &mut self.cells[..write_y * width] {
            *cell = None;
        }

        full
    }

    /// Write the occupied cells of `shape` anchored at (x, y) as `kind`
    ///
    /// Only cells that land on the board are written; cells above row 0 are
    /// dropped. Returns the number of cells written.
    pub fn lock_shape(&mut self, shape: &Shape, x: i32, y: i32, kind: PieceKind) -> usize {
        let mut written = 0;
        for (dx, dy) in shape.minos() {
            if self.set(x + dx, y + dy, Some(kind)) {
                written += 1;
            }
        }
        written
    }

    /// Iterate over rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width.max(1))
    }

    /// Number of filled cells
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(
            crate::types::BOARD_WIDTH as usize,
            crate::types::BOARD_HEIGHT as usize,
        )
    }
}
