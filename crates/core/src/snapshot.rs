use crate::game_state::{ActivePiece, Phase};
use crate::pieces::Shape;
use crate::types::{Cell, PieceKind, Rgb};

/// Read-only view of the active piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub shape: Shape,
    pub color: Rgb,
    pub x: i32,
    pub y: i32,
}

impl From<ActivePiece> for ActiveSnapshot {
    fn from(value: ActivePiece) -> Self {
        Self {
            kind: value.kind,
            shape: value.shape,
            color: value.kind.color(),
            x: value.x,
            y: value.y,
        }
    }
}

impl ActiveSnapshot {
    /// Board coordinates covered by the piece, including any above row 0
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .minos()
            .into_iter()
            .map(move |(dx, dy)| (self.x + dx, self.y + dy))
    }
}

/// Everything a presentation layer needs to draw a match
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    pub width: usize,
    pub height: usize,
    /// Rows top to bottom
    pub board: Vec<Vec<Cell>>,
    pub active: Option<ActiveSnapshot>,
    pub phase: Phase,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub game_over: bool,
}

impl GameSnapshot {
    pub fn playable(&self) -> bool {
        !self.game_over
    }

    /// Cell contents with the active piece overlaid on the locked cells
    pub fn composed_board(&self) -> Vec<Vec<Cell>> {
        let mut rows = self.board.clone();
        if let Some(active) = self.active {
            for (x, y) in active.cells() {
                if y >= 0 && (y as usize) < self.height && x >= 0 && (x as usize) < self.width {
                    rows[y as usize][x as usize] = Some(active.kind);
                }
            }
        }
        rows
    }
}
