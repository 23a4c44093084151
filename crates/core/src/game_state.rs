//! Game state module - the match state machine
//!
//! This module ties together the board, the piece catalog, the shape source
//! and scoring. A match moves through
//! `Spawning -> Active -> Locking -> Spawning | GameOver`. Spawning and
//! locking complete inside the operation that triggers them, so callers only
//! ever observe [`Phase::Active`] or [`Phase::GameOver`].
//!
//! Every command is synchronous and returns whether it was applied. A rejected
//! command leaves the state untouched, and once the match is over every
//! command is rejected.

use std::fmt;

use log::debug;
use thiserror::Error;

use crate::board::Board;
use crate::pieces::{spawn_shape, spawn_x, Shape};
use crate::rng::{ShapeSource, SimpleRng};
use crate::scoring::{calculate_level, hard_drop_score, line_clear_score};
use crate::snapshot::{ActiveSnapshot, GameSnapshot};
use crate::types::*;

/// Rejected board configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("board width {width} is outside {min}..={max}")]
    Width { width: usize, min: u8, max: u8 },
    #[error("board height {height} is outside {min}..={max}")]
    Height { height: usize, min: u8, max: u8 },
}

/// Board dimensions of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameConfig {
    pub width: u8,
    pub height: u8,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
        }
    }
}

impl GameConfig {
    /// Validated configuration
    pub fn new(width: u8, height: u8) -> Result<Self, ConfigError> {
        let config = Self { width, height };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_dimensions(self.width as usize, self.height as usize)
    }
}

fn check_dimensions(width: usize, height: usize) -> Result<(), ConfigError> {
    let range = MIN_BOARD_DIMENSION as usize..=MAX_BOARD_DIMENSION as usize;
    if !range.contains(&width) {
        return Err(ConfigError::Width {
            width,
            min: MIN_BOARD_DIMENSION,
            max: MAX_BOARD_DIMENSION,
        });
    }
    if !range.contains(&height) {
        return Err(ConfigError::Height {
            height,
            min: MIN_BOARD_DIMENSION,
            max: MAX_BOARD_DIMENSION,
        });
    }
    Ok(())
}

/// Observable state of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// A piece is falling and commands are accepted
    Active,
    /// Terminal; the match no longer changes
    GameOver,
}

/// Active falling piece
///
/// Rotation and locking replace the piece rather than mutating it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivePiece {
    pub kind: PieceKind,
    pub shape: Shape,
    pub x: i32,
    pub y: i32,
}

impl ActivePiece {
    /// Spawn-orientation piece centered on row 0 of a board `board_width` wide
    pub fn spawn(kind: PieceKind, board_width: usize) -> Self {
        let shape = spawn_shape(kind);
        Self {
            kind,
            shape,
            x: spawn_x(board_width, &shape),
            y: 0,
        }
    }

    /// Display color
    pub fn color(&self) -> Rgb {
        self.kind.color()
    }
}

/// Outcome of the most recent lock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LockEvent {
    /// Rows removed by this lock
    pub lines_cleared: u32,
    /// Points awarded for the cleared rows
    pub line_clear_score: u32,
    /// Points awarded for the hard drop that caused the lock
    pub drop_score: u32,
    /// Whether the next piece was blocked at spawn
    pub topped_out: bool,
}

/// Complete game state
pub struct GameState {
    board: Board,
    active: Option<ActivePiece>,
    source: Box<dyn ShapeSource>,
    phase: Phase,
    score: u32,
    level: u32,
    lines: u32,
    /// Pieces spawned since the last reset
    pieces_spawned: u32,
    /// Last lock event (consumed by observers)
    last_event: Option<LockEvent>,
}

impl fmt::Debug for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameState")
            .field("width", &self.board.width())
            .field("height", &self.board.height())
            .field("active", &self.active)
            .field("phase", &self.phase)
            .field("score", &self.score)
            .field("level", &self.level)
            .field("lines", &self.lines)
            .finish_non_exhaustive()
    }
}

impl GameState {
    /// Start a match on an empty board
    ///
    /// The first piece is spawned immediately.
    pub fn new(
        config: GameConfig,
        source: impl ShapeSource + 'static,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let board = Board::new(config.width as usize, config.height as usize);
        Ok(Self::start(board, Box::new(source)))
    }

    /// Default 10x20 match driven by a seeded [`SimpleRng`]
    pub fn with_seed(seed: u32) -> Self {
        Self::start(Board::default(), Box::new(SimpleRng::new(seed)))
    }

    /// Start a match on a pre-filled board (puzzles, replays)
    ///
    /// Score, level and lines start from their initial values. The first
    /// piece is spawned immediately and may top out at once.
    pub fn with_board(
        board: Board,
        source: impl ShapeSource + 'static,
    ) -> Result<Self, ConfigError> {
        check_dimensions(board.width(), board.height())?;
        let mut state = Self::blank(board, Box::new(source));
        state.spawn_next();
        Ok(state)
    }

    fn blank(board: Board, source: Box<dyn ShapeSource>) -> Self {
        Self {
            board,
            active: None,
            source,
            phase: Phase::Active,
            score: 0,
            level: STARTING_LEVEL,
            lines: 0,
            pieces_spawned: 0,
            last_event: None,
        }
    }

    fn start(board: Board, source: Box<dyn ShapeSource>) -> Self {
        let mut state = Self::blank(board, source);
        state.reset();
        state
    }

    /// Clear the board and counters and spawn the first piece
    pub fn reset(&mut self) {
        self.board.clear();
        self.active = None;
        self.phase = Phase::Active;
        self.score = 0;
        self.level = STARTING_LEVEL;
        self.lines = 0;
        self.pieces_spawned = 0;
        self.last_event = None;
        self.spawn_next();
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn pieces_spawned(&self) -> u32 {
        self.pieces_spawned
    }

    pub fn active(&self) -> Option<ActivePiece> {
        self.active
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Outcome of the most recent lock, if any since the last reset
    pub fn last_event(&self) -> Option<LockEvent> {
        self.last_event
    }

    /// Take and clear the last lock event.
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.width = self.board.width();
        out.height = self.board.height();
        out.board.clear();
        out.board.extend(self.board.rows().map(|row| row.to_vec()));
        out.active = self.active.map(ActiveSnapshot::from);
        out.phase = self.phase;
        out.score = self.score;
        out.level = self.level;
        out.lines = self.lines;
        out.game_over = self.game_over();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot {
            width: 0,
            height: 0,
            board: Vec::with_capacity(self.board.height()),
            active: None,
            phase: Phase::Active,
            score: 0,
            level: STARTING_LEVEL,
            lines: 0,
            game_over: false,
        };
        self.snapshot_into(&mut s);
        s
    }

    /// Whether `shape` anchored at (x, y) collides with the walls, the floor
    /// or locked cells
    pub fn collision(&self, x: i32, y: i32, shape: &Shape) -> bool {
        self.board.collides(x, y, shape)
    }

    /// Spawn a new piece from the shape source
    ///
    /// Returns false and ends the match when the spawn position is blocked.
    pub fn spawn_next(&mut self) -> bool {
        if self.game_over() {
            return false;
        }

        let kind = self.source.next_kind();
        let piece = ActivePiece::spawn(kind, self.board.width());

        if self.collision(piece.x, piece.y, &piece.shape) {
            debug!(
                "block out: {:?} cannot spawn at ({}, {}); final score {}",
                kind, piece.x, piece.y, self.score
            );
            self.active = None;
            self.phase = Phase::GameOver;
            return false;
        }

        self.active = Some(piece);
        self.pieces_spawned = self.pieces_spawned.wrapping_add(1);
        true
    }

    /// Try to move the active piece
    pub fn try_move(&mut self, dx: i32, dy: i32) -> bool {
        if self.game_over() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        let (Some(x), Some(y)) = (active.x.checked_add(dx), active.y.checked_add(dy)) else {
            return false;
        };
        if self.collision(x, y, &active.shape) {
            return false;
        }

        self.active = Some(ActivePiece { x, y, ..active });
        true
    }

    /// Try to rotate the active piece clockwise
    ///
    /// The rotated shape is tried in place, then shifted horizontally by each
    /// of [`ROTATION_KICKS`] in order. The first fit wins.
    pub fn try_rotate(&mut self) -> bool {
        if self.game_over() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        let rotated = active.shape.rotate_cw();
        let kicks = std::iter::once(0).chain(ROTATION_KICKS);
        for dx in kicks {
            let Some(x) = active.x.checked_add(dx) else {
                continue;
            };
            if !self.collision(x, active.y, &rotated) {
                self.active = Some(ActivePiece {
                    shape: rotated,
                    x,
                    ..active
                });
                return true;
            }
        }

        false
    }

    /// Hard drop the active piece to the bottom and lock it
    ///
    /// Each row fallen is worth one point.
    pub fn hard_drop(&mut self) -> bool {
        if self.game_over() || self.active.is_none() {
            return false;
        }

        let mut rows: u32 = 0;
        while self.try_move(0, 1) {
            rows += 1;
        }

        let drop_score = hard_drop_score(rows);
        self.score = self.score.saturating_add(drop_score);
        self.lock_piece();
        if let Some(event) = self.last_event.as_mut() {
            event.drop_score = drop_score;
        }
        true
    }

    /// Apply a front-end command; returns whether it changed the match
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::MoveLeft => self.try_move(-1, 0),
            GameAction::MoveRight => self.try_move(1, 0),
            GameAction::SoftDrop => self.try_move(0, 1),
            GameAction::Rotate => self.try_rotate(),
            GameAction::HardDrop => self.hard_drop(),
        }
    }

    /// Lock the active piece onto the board, clear lines and spawn the next piece
    fn lock_piece(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };

        let written = self
            .board
            .lock_shape(&active.shape, active.x, active.y, active.kind);
        debug!(
            "locked {:?} at ({}, {}), {} cells on board",
            active.kind, active.x, active.y, written
        );

        let lines_cleared = self.clear_lines();
        let spawned = self.spawn_next();

        self.last_event = Some(LockEvent {
            lines_cleared,
            line_clear_score: line_clear_score(lines_cleared as usize),
            drop_score: 0,
            topped_out: !spawned,
        });
    }

    /// Remove full rows and award points; returns the number of rows removed
    fn clear_lines(&mut self) -> u32 {
        let cleared = self.board.clear_full_rows();
        if cleared.is_empty() {
            return 0;
        }

        let n = cleared.len() as u32;
        self.lines = self.lines.saturating_add(n);
        self.score = self.score.saturating_add(line_clear_score(cleared.len()));
        self.level = calculate_level(self.lines);
        debug!(
            "cleared rows {:?}; lines {} level {} score {}",
            cleared, self.lines, self.level, self.score
        );
        n
    }
}
