//! Player records and the views derived from them

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable numeric player identity
pub type PlayerId = i64;

/// Name shown when a player never supplied one
pub const DEFAULT_DISPLAY_NAME: &str = "Player";

/// Advisory display metadata; only used for presentation
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlayerMeta {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl PlayerMeta {
    pub fn new(username: impl Into<String>, first_name: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            first_name: first_name.into(),
            last_name: String::new(),
        }
    }

    /// First name, or [`DEFAULT_DISPLAY_NAME`] when empty
    pub fn display_name(&self) -> &str {
        if self.first_name.is_empty() {
            DEFAULT_DISPLAY_NAME
        } else {
            &self.first_name
        }
    }

    /// Leaderboard label: `First (username)`
    pub fn label(&self) -> String {
        format!("{} ({})", self.display_name(), self.username)
    }
}

/// Best-score history of one player
///
/// `best_score` never decreases.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "StoredRecord")]
pub struct PlayerRecord {
    #[serde(flatten)]
    pub meta: PlayerMeta,
    pub best_score: u64,
    pub best_date: Option<DateTime<Utc>>,
    pub last_score: u64,
    pub last_played: Option<DateTime<Utc>>,
    pub games_played: u64,
}

impl PlayerRecord {
    /// Record for a player's first game
    pub fn first_game(meta: PlayerMeta, score: u64, now: DateTime<Utc>) -> Self {
        Self {
            meta,
            best_score: score,
            best_date: Some(now),
            last_score: score,
            last_played: Some(now),
            games_played: 1,
        }
    }
}

/// On-disk shape of a record, lenient about older files
///
/// Files written before `best_score`/`best_date` existed keep the best score
/// under `score` and its date under `date`, with naive local timestamps.
#[derive(Deserialize)]
struct StoredRecord {
    #[serde(default)]
    username: String,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    best_score: Option<u64>,
    #[serde(default)]
    score: Option<u64>,
    #[serde(default)]
    best_date: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    last_score: Option<u64>,
    #[serde(default)]
    last_played: Option<String>,
    #[serde(default)]
    games_played: Option<u64>,
}

impl From<StoredRecord> for PlayerRecord {
    fn from(raw: StoredRecord) -> Self {
        let best_score = raw.best_score.max(raw.score).unwrap_or(0);
        Self {
            meta: PlayerMeta {
                username: raw.username,
                first_name: raw.first_name,
                last_name: raw.last_name,
            },
            best_score,
            best_date: raw
                .best_date
                .as_deref()
                .or(raw.date.as_deref())
                .and_then(parse_timestamp),
            last_score: raw.last_score.unwrap_or(0),
            last_played: raw.last_played.as_deref().and_then(parse_timestamp),
            // A stored record stands for at least one game
            games_played: raw.games_played.unwrap_or(1),
        }
    }
}

/// RFC 3339, or a naive ISO 8601 timestamp taken as UTC
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    s.parse::<NaiveDateTime>().ok().map(|naive| naive.and_utc())
}

/// One leaderboard row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub player_id: PlayerId,
    /// `First (username)`
    pub name: String,
    pub first_name: String,
    pub score: u64,
    pub date: Option<DateTime<Utc>>,
}

/// A player's record together with their position on the leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerStats {
    pub record: PlayerRecord,
    /// 1-based; `None` for players who never played
    pub rank: Option<usize>,
    pub total_players: usize,
}
