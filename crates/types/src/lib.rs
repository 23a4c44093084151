//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data structures with no external dependencies, so the
//! engine, the records store and any front end can share them.
//!
//! # Board Dimensions
//!
//! Default playfield dimensions:
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19)
//! - **Spawn position**: horizontally centered on row 0
//!
//! Custom dimensions are accepted between [`MIN_BOARD_DIMENSION`] and
//! [`MAX_BOARD_DIMENSION`] on each axis.
//!
//! # Scoring
//!
//! | Lines cleared at once | Points |
//! |-----------------------|--------|
//! | 1 | 100 |
//! | 2 | 300 |
//! | 3 | 500 |
//! | 4 or more | 800 |
//!
//! Hard drops award one point per row fallen. The level is
//! `lines / LINES_PER_LEVEL + 1`.
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{GameAction, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let piece = PieceKind::from_str("t").unwrap();
//! assert_eq!(piece, PieceKind::T);
//! assert_eq!(PieceKind::from_index(piece.index()), Some(piece));
//!
//! // Original command names and camelCase names both parse.
//! assert_eq!(GameAction::from_str("drop"), Some(GameAction::HardDrop));
//! assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Smallest accepted board width or height.
///
/// Every catalog piece must fit at its spawn position on an empty board.
pub const MIN_BOARD_DIMENSION: u8 = 4;

/// Largest accepted board width or height.
pub const MAX_BOARD_DIMENSION: u8 = 64;

/// Number of distinct pieces in the catalog
pub const PIECE_COUNT: usize = 7;

/// Lines needed to advance one level
pub const LINES_PER_LEVEL: u32 = 10;

/// Level at the start of every match
pub const STARTING_LEVEL: u32 = 1;

/// Line clear scoring table, indexed by lines cleared at once.
///
/// Four or more lines use the last entry.
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// Points per row fallen during a hard drop
pub const HARD_DROP_POINTS_PER_ROW: u32 = 1;

/// Horizontal kick offsets tried, in order, when a rotation collides in place
pub const ROTATION_KICKS: [i32; 4] = [-1, 1, -2, 2];

/// The seven piece kinds, in catalog order
///
/// Each piece has a distinct shape and color:
/// - **I**: Cyan, horizontal bar
/// - **O**: Yellow, 2x2 square
/// - **T**: Purple, T-shaped
/// - **L**: Orange, L-shaped
/// - **J**: Blue, J-shaped (mirror of L)
/// - **S**: Green, S-shaped
/// - **Z**: Red, Z-shaped (mirror of S)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    I,
    O,
    T,
    L,
    J,
    S,
    Z,
}

impl PieceKind {
    /// All kinds in catalog order
    pub const ALL: [PieceKind; PIECE_COUNT] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::L,
        PieceKind::J,
        PieceKind::S,
        PieceKind::Z,
    ];

    /// Catalog index of this kind (0..7)
    pub fn index(self) -> usize {
        match self {
            PieceKind::I => 0,
            PieceKind::O => 1,
            PieceKind::T => 2,
            PieceKind::L => 3,
            PieceKind::J => 4,
            PieceKind::S => 5,
            PieceKind::Z => 6,
        }
    }

    /// Kind at a catalog index, `None` when the index is out of range
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "l" => Some(PieceKind::L),
            "j" => Some(PieceKind::J),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::L => "l",
            PieceKind::J => "j",
            PieceKind::S => "s",
            PieceKind::Z => "z",
        }
    }

    /// Display color of the piece
    pub fn color(&self) -> Rgb {
        match self {
            PieceKind::I => Rgb::new(0, 255, 255),
            PieceKind::O => Rgb::new(255, 255, 0),
            PieceKind::T => Rgb::new(128, 0, 128),
            PieceKind::L => Rgb::new(255, 165, 0),
            PieceKind::J => Rgb::new(0, 0, 255),
            PieceKind::S => Rgb::new(0, 255, 0),
            PieceKind::Z => Rgb::new(255, 0, 0),
        }
    }
}

/// 24-bit color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Commands a front end can issue against a running match
///
/// Each action maps to exactly one engine operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Move piece one cell down
    SoftDrop,
    /// Rotate piece 90° clockwise, with horizontal kicks
    Rotate,
    /// Drop piece to the lowest valid position and lock it
    HardDrop,
}

impl GameAction {
    /// Parse action from a command name
    ///
    /// Accepts the short chat command names (`left`, `right`, `down`,
    /// `rotate`, `drop`) and camelCase names, case-insensitively.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("left"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("softDrop"), Some(GameAction::SoftDrop));
    /// assert_eq!(GameAction::from_str("hardDrop"), Some(GameAction::HardDrop));
    /// assert_eq!(GameAction::from_str("hold"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "left" | "moveleft" => Some(GameAction::MoveLeft),
            "right" | "moveright" => Some(GameAction::MoveRight),
            "down" | "softdrop" => Some(GameAction::SoftDrop),
            "rotate" | "rotatecw" => Some(GameAction::Rotate),
            "drop" | "harddrop" => Some(GameAction::HardDrop),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::SoftDrop => "softDrop",
            GameAction::Rotate => "rotate",
            GameAction::HardDrop => "hardDrop",
        }
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(PieceKind)`: Cell filled by a locked piece of that kind
pub type Cell = Option<PieceKind>;
