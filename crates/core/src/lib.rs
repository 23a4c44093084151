//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains all the game rules and match state. It has **no
//! dependencies** on UI, networking, storage or the records store, making it:
//!
//! - **Deterministic**: pieces come from an injected [`ShapeSource`]; a seeded
//!   or scripted source replays the same match every time
//! - **Synchronous**: every command runs to completion and reports whether it
//!   was applied; nothing blocks, suspends or panics on gameplay input
//! - **Portable**: any front end (chat bot, terminal, headless driver) can
//!   drive it and render a [`GameSnapshot`]
//!
//! # Module Structure
//!
//! - [`board`]: fixed-size grid with collision detection and line clearing
//! - [`game_state`]: the match state machine (spawn, move, rotate, drop, lock)
//! - [`pieces`]: the seven shape templates and matrix rotation
//! - [`rng`]: pluggable uniform piece selection
//! - [`scoring`]: line clear points, drop bonus, level formula
//! - [`snapshot`]: read-only view for presentation layers
//!
//! # Game Rules
//!
//! - Pieces spawn horizontally centered on row 0; a blocked spawn ends the match
//! - Rotation is clockwise, with horizontal kicks of -1, +1, -2, +2
//! - Hard drop scores one point per row fallen, then locks immediately
//! - Clearing 1 / 2 / 3 / 4+ rows at once scores 100 / 300 / 500 / 800
//! - Level is `lines / 10 + 1`
//!
//! There is no gravity timer: automatic falling is the caller's job.
//!
//! # Example
//!
//! ```
//! use blockfall_core::{GameConfig, GameState, ScriptedSource};
//! use blockfall_types::{GameAction, PieceKind};
//!
//! let source = ScriptedSource::repeat(PieceKind::I);
//! let mut game = GameState::new(GameConfig::default(), source).unwrap();
//!
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::HardDrop);
//!
//! // The I fell 19 rows
//! assert_eq!(game.score(), 19);
//! assert!(!game.game_over());
//! ```

pub mod board;
pub mod game_state;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use game_state::{ActivePiece, ConfigError, GameConfig, GameState, LockEvent, Phase};
pub use pieces::{spawn_shape, Shape};
pub use rng::{RandSource, ScriptedSource, ShapeSource, SimpleRng};
pub use scoring::{calculate_level, hard_drop_score, line_clear_score};
pub use snapshot::{ActiveSnapshot, GameSnapshot};
