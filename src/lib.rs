//! Blockfall (workspace facade crate).
//!
//! Re-exports the engine, the records store and the shared types under
//! `blockfall::{core,records,types}`, and adds the pieces a front end needs
//! to host many matches at once: environment configuration and a
//! session-keyed match registry wired to the leaderboard.

pub use blockfall_core as core;
pub use blockfall_records as records;
pub use blockfall_types as types;

pub mod config;
pub mod session;

pub use config::AppConfig;
pub use session::{Finish, Player, SessionId, Sessions, Turn};
