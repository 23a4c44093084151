//! Pieces module - the seven-piece catalog and matrix rotation
//!
//! Every piece is a small rectangular occupancy matrix (at most 4x4). The
//! catalog holds each piece in its spawn orientation; rotation derives a new
//! matrix by reversing the rows and transposing, which turns the matrix 90°
//! clockwise. Rotating never mutates a shape in place.

use arrayvec::ArrayVec;

use crate::types::{PieceKind, PIECE_COUNT};

/// Largest side length of a shape matrix
pub const MAX_SHAPE_SIDE: usize = 4;

/// Largest number of occupied cells a shape can hold
pub const MAX_MINOS: usize = MAX_SHAPE_SIDE * MAX_SHAPE_SIDE;

/// Offset of a single occupied cell relative to the shape's top-left corner, as (dx, dy)
pub type MinoOffset = (i32, i32);

/// Occupied cells of a shape, row-major
pub type Minos = ArrayVec<MinoOffset, MAX_MINOS>;

/// Rectangular occupancy matrix of a piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    width: u8,
    height: u8,
    /// Indexed `[row][column]`; cells outside width x height are always false
    cells: [[bool; MAX_SHAPE_SIDE]; MAX_SHAPE_SIDE],
}

const fn build<const W: usize, const H: usize>(rows: [[u8; W]; H]) -> Shape {
    let mut cells = [[false; MAX_SHAPE_SIDE]; MAX_SHAPE_SIDE];
    let mut y = 0;
    while y < H {
        let mut x = 0;
        while x < W {
            cells[y][x] = rows[y][x] != 0;
            x += 1;
        }
        y += 1;
    }
    Shape {
        width: W as u8,
        height: H as u8,
        cells,
    }
}

/// Spawn orientation of every piece, in catalog order
const CATALOG: [Shape; PIECE_COUNT] = [
    build([[1, 1, 1, 1]]),
    build([[1, 1], [1, 1]]),
    build([[1, 1, 1], [0, 1, 0]]),
    build([[1, 1, 1], [1, 0, 0]]),
    build([[1, 1, 1], [0, 0, 1]]),
    build([[0, 1, 1], [1, 1, 0]]),
    build([[1, 1, 0], [0, 1, 1]]),
];

/// Spawn-orientation shape of a piece kind
pub fn spawn_shape(kind: PieceKind) -> Shape {
    CATALOG[kind.index()]
}

impl Shape {
    /// Build a shape from rows of 0/1 values
    ///
    /// Returns `None` for an empty, ragged or oversized matrix.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Option<Self> {
        let height = rows.len();
        let width = rows.first()?.as_ref().len();
        if height == 0 || width == 0 || height > MAX_SHAPE_SIDE || width > MAX_SHAPE_SIDE {
            return None;
        }

        let mut cells = [[false; MAX_SHAPE_SIDE]; MAX_SHAPE_SIDE];
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return None;
            }
            for (x, &v) in row.iter().enumerate() {
                cells[y][x] = v != 0;
            }
        }

        Some(Self {
            width: width as u8,
            height: height as u8,
            cells,
        })
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.width as usize
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.height as usize
    }

    /// Whether the cell at column `x`, row `y` is occupied
    pub fn is_filled(&self, x: usize, y: usize) -> bool {
        x < self.width() && y < self.height() && self.cells[y][x]
    }

    /// Occupied cells as (dx, dy) offsets, row-major
    pub fn minos(&self) -> Minos {
        let mut out = Minos::new();
        for y in 0..self.height() {
            for x in 0..self.width() {
                if self.cells[y][x] {
                    out.push((x as i32, y as i32));
                }
            }
        }
        out
    }

    /// The shape turned 90° clockwise
    ///
    /// Rows are reversed, then rows and columns are transposed, so
    /// `rotated[r][c] == self[height - 1 - c][r]`.
    pub fn rotate_cw(&self) -> Self {
        let (w, h) = (self.width(), self.height());
        let mut cells = [[false; MAX_SHAPE_SIDE]; MAX_SHAPE_SIDE];
        for (r, row) in cells.iter_mut().enumerate().take(w) {
            for (c, cell) in row.iter_mut().enumerate().take(h) {
                *cell = self.cells[h - 1 - c][r];
            }
        }
        Self {
            width: self.height,
            height: self.width,
            cells,
        }
    }

    /// Matrix as rows of booleans, for display
    pub fn to_rows(&self) -> Vec<Vec<bool>> {
        (0..self.height())
            .map(|y| self.cells[y][..self.width()].to_vec())
            .collect()
    }
}

/// Column of the spawn anchor: the shape is centered on the board
pub fn spawn_x(board_width: usize, shape: &Shape) -> i32 {
    (board_width / 2) as i32 - (shape.width() / 2) as i32
}
