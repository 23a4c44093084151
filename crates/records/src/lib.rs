//! Persistent leaderboard shared by every match
//!
//! A [`RecordsStore`] keeps each player's best score in memory and writes the
//! whole map through to a [`Storage`] backend after every reported game. The
//! default backend is a pretty-printed JSON document keyed by player id:
//!
//! ```json
//! {
//!   "42": {
//!     "username": "deep",
//!     "first_name": "Thought",
//!     "last_name": "",
//!     "best_score": 4200,
//!     "best_date": "2025-06-01T12:00:00Z",
//!     "last_score": 100,
//!     "last_played": "2025-06-02T09:30:00Z",
//!     "games_played": 12
//!   }
//! }
//! ```
//!
//! Loading never fails: a missing or unreadable document starts an empty
//! store, and a failed save is logged while the in-memory state stays
//! authoritative.
//!
//! # Example
//!
//! ```
//! use blockfall_records::{PlayerMeta, RecordsStore};
//!
//! let store = RecordsStore::in_memory();
//! let ann = PlayerMeta::new("ann", "Ann");
//!
//! assert!(store.record_score(1, &ann, 300));
//! assert!(!store.record_score(1, &ann, 200));
//!
//! let stats = store.get_stats(1);
//! assert_eq!(stats.record.best_score, 300);
//! assert_eq!(stats.rank, Some(1));
//! ```

pub mod record;
pub mod storage;
pub mod store;

pub use record::{
    LeaderboardEntry, PlayerId, PlayerMeta, PlayerRecord, PlayerStats, DEFAULT_DISPLAY_NAME,
};
pub use storage::{JsonFileStorage, MemoryStorage, RecordMap, Storage, StoreError};
pub use store::RecordsStore;
