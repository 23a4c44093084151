//! Environment-driven configuration for front ends

use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, Result};

use crate::core::GameConfig;
use crate::types::{BOARD_HEIGHT, BOARD_WIDTH};

pub const DEFAULT_RECORDS_FILE: &str = "tetris_records.json";
pub const DEFAULT_TOP_LIMIT: usize = 10;

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// JSON document holding the leaderboard
    pub records_file: PathBuf,
    pub board: GameConfig,
    /// Fixed piece seed; `None` draws from OS entropy
    pub seed: Option<u64>,
    /// Rows shown by the leaderboard command
    pub top_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            records_file: PathBuf::from(DEFAULT_RECORDS_FILE),
            board: GameConfig::default(),
            seed: None,
            top_limit: DEFAULT_TOP_LIMIT,
        }
    }
}

impl AppConfig {
    /// Read `BLOCKFALL_*` variables from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; blank values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let records_file = get("BLOCKFALL_RECORDS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RECORDS_FILE));

        let width = parse(get("BLOCKFALL_BOARD_WIDTH"), "BLOCKFALL_BOARD_WIDTH")?;
        let height = parse(get("BLOCKFALL_BOARD_HEIGHT"), "BLOCKFALL_BOARD_HEIGHT")?;
        let board = GameConfig::new(
            width.unwrap_or(BOARD_WIDTH),
            height.unwrap_or(BOARD_HEIGHT),
        )?;

        let seed = parse(get("BLOCKFALL_SEED"), "BLOCKFALL_SEED")?;
        let top_limit =
            parse(get("BLOCKFALL_TOP_LIMIT"), "BLOCKFALL_TOP_LIMIT")?.unwrap_or(DEFAULT_TOP_LIMIT);

        Ok(Self {
            records_file,
            board,
            seed,
            top_limit,
        })
    }
}

fn parse<T>(value: Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .map(|s| {
            s.parse::<T>()
                .map_err(|e| anyhow!("invalid {}={:?}: {}", key, s, e))
        })
        .transpose()
}
