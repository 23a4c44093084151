//! The shared leaderboard
//!
//! One [`RecordsStore`] serves every concurrent match. Writers are serialized
//! by the write lock, which stays held until the change has been handed to
//! storage, so saves land in the order the updates happened. Readers share
//! the read lock and never see a half-applied update.

use std::cmp::Ordering;
use std::path::PathBuf;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use crate::record::{LeaderboardEntry, PlayerId, PlayerMeta, PlayerRecord, PlayerStats};
use crate::storage::{JsonFileStorage, MemoryStorage, RecordMap, Storage, StoreError};

/// Leaderboard order: best score descending, earlier best first, then lower id
fn ranking_order(a: (&PlayerId, &PlayerRecord), b: (&PlayerId, &PlayerRecord)) -> Ordering {
    let (a_id, a) = a;
    let (b_id, b) = b;
    b.best_score
        .cmp(&a.best_score)
        .then_with(|| match (a.best_date, b.best_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a_id.cmp(b_id))
}

/// Persistent per-player best scores with write-through storage
pub struct RecordsStore {
    storage: Box<dyn Storage>,
    records: RwLock<RecordMap>,
}

impl std::fmt::Debug for RecordsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordsStore")
            .field("storage", &self.storage.describe())
            .field("players", &self.total_players())
            .finish()
    }
}

impl RecordsStore {
    /// Load the store from `storage`
    ///
    /// A missing, unreadable or corrupt document yields an empty store; the
    /// failure is logged, never returned.
    pub fn open(storage: impl Storage + 'static) -> Self {
        let records = match storage.load() {
            Ok(Some(records)) => {
                info!(
                    "loaded {} player records from {}",
                    records.len(),
                    storage.describe()
                );
                records
            }
            Ok(None) => {
                info!("no records at {}, starting fresh", storage.describe());
                RecordMap::new()
            }
            Err(e) => {
                warn!("records unavailable, starting empty: {}", e);
                RecordMap::new()
            }
        };

        Self {
            storage: Box::new(storage),
            records: RwLock::new(records),
        }
    }

    /// Store backed by a JSON file
    pub fn open_json(path: impl Into<PathBuf>) -> Self {
        Self::open(JsonFileStorage::new(path))
    }

    /// Store that never touches the filesystem
    pub fn in_memory() -> Self {
        Self::open(MemoryStorage::new())
    }

    fn read(&self) -> RwLockReadGuard<'_, RecordMap> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RecordMap> {
        self.records.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Report a finished game; returns true when it set a new personal best
    ///
    /// The whole store is saved before this returns. A failed save is logged
    /// and the in-memory update stands.
    pub fn record_score(&self, player_id: PlayerId, meta: &PlayerMeta, score: u64) -> bool {
        self.record_score_at(player_id, meta, score, Utc::now())
    }

    /// [`record_score`](Self::record_score) with an explicit clock reading
    pub fn record_score_at(
        &self,
        player_id: PlayerId,
        meta: &PlayerMeta,
        score: u64,
        now: DateTime<Utc>,
    ) -> bool {
        let mut records = self.write();

        let new_best = match records.get_mut(&player_id) {
            None => {
                records.insert(
                    player_id,
                    PlayerRecord::first_game(meta.clone(), score, now),
                );
                true
            }
            Some(record) => {
                record.last_score = score;
                record.last_played = Some(now);
                record.games_played = record.games_played.saturating_add(1);
                if score > record.best_score {
                    record.meta = meta.clone();
                    record.best_score = score;
                    record.best_date = Some(now);
                    true
                } else {
                    false
                }
            }
        };

        debug!(
            "player {} scored {} (new best: {})",
            player_id, score, new_best
        );

        if let Err(e) = self.storage.save(&records) {
            warn!(
                "failed to save records to {}: {}",
                self.storage.describe(),
                e
            );
        }

        new_best
    }

    /// A player's record, or a zero-valued record for unknown players
    pub fn get_record(&self, player_id: PlayerId) -> PlayerRecord {
        self.read().get(&player_id).cloned().unwrap_or_default()
    }

    /// Up to `limit` leaderboard rows, best first
    pub fn top_records(&self, limit: usize) -> Vec<LeaderboardEntry> {
        let records = self.read();
        let mut ranked: Vec<_> = records.iter().collect();
        ranked.sort_by(|a, b| ranking_order(*a, *b));
        ranked
            .into_iter()
            .take(limit)
            .map(|(id, record)| LeaderboardEntry {
                player_id: *id,
                name: record.meta.label(),
                first_name: record.meta.display_name().to_string(),
                score: record.best_score,
                date: record.best_date,
            })
            .collect()
    }

    /// A player's record plus their 1-based position on the full leaderboard
    pub fn get_stats(&self, player_id: PlayerId) -> PlayerStats {
        let records = self.read();
        let record = records.get(&player_id).cloned().unwrap_or_default();
        let rank = records.get(&player_id).map(|mine| {
            let me = (&player_id, mine);
            1 + records
                .iter()
                .filter(|other| ranking_order(*other, me) == Ordering::Less)
                .count()
        });

        PlayerStats {
            record,
            rank,
            total_players: records.len(),
        }
    }

    /// Number of players with a record
    pub fn total_players(&self) -> usize {
        self.read().len()
    }

    /// Copy of every record
    pub fn records(&self) -> RecordMap {
        self.read().clone()
    }

    /// Save the current state explicitly
    pub fn flush(&self) -> Result<(), StoreError> {
        let records = self.write();
        self.storage.save(&records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    fn meta(name: &str) -> PlayerMeta {
        PlayerMeta::new(name.to_lowercase(), name)
    }

    #[test]
    fn first_score_is_a_new_best() {
        let store = RecordsStore::in_memory();
        assert!(store.record_score_at(1, &meta("Ann"), 0, t(0)));

        let record = store.get_record(1);
        assert_eq!(record.best_score, 0);
        assert_eq!(record.best_date, Some(t(0)));
        assert_eq!(record.games_played, 1);
    }

    #[test]
    fn only_strictly_higher_scores_replace_the_best() {
        let store = RecordsStore::in_memory();
        assert!(store.record_score_at(1, &meta("Ann"), 500, t(0)));
        assert!(!store.record_score_at(1, &meta("Ann"), 500, t(1)));
        assert!(!store.record_score_at(1, &meta("Ann"), 200, t(2)));

        let record = store.get_record(1);
        assert_eq!(record.best_score, 500);
        assert_eq!(record.best_date, Some(t(0)));
        assert_eq!(record.last_score, 200);
        assert_eq!(record.last_played, Some(t(2)));
        assert_eq!(record.games_played, 3);

        assert!(store.record_score_at(1, &meta("Annie"), 501, t(3)));
        let record = store.get_record(1);
        assert_eq!(record.best_score, 501);
        assert_eq!(record.best_date, Some(t(3)));
        assert_eq!(record.meta.first_name, "Annie");
    }

    #[test]
    fn unknown_player_gets_zero_record() {
        let store = RecordsStore::in_memory();
        let record = store.get_record(99);
        assert_eq!(record.best_score, 0);
        assert_eq!(record.games_played, 0);
        assert_eq!(record.best_date, None);

        let stats = store.get_stats(99);
        assert_eq!(stats.rank, None);
        assert_eq!(stats.total_players, 0);
    }

    #[test]
    fn every_update_is_written_through() {
        let storage = MemoryStorage::new();
        let store = RecordsStore::open(storage.clone());
        store.record_score_at(5, &meta("Bo"), 100, t(0));
        assert!(storage.document().unwrap().contains("\"5\""));

        store.record_score_at(6, &meta("Cy"), 50, t(1));
        let reloaded = RecordsStore::open(storage);
        assert_eq!(reloaded.records(), store.records());
    }

    #[test]
    fn failed_writes_keep_memory_authoritative() {
        let storage = MemoryStorage::new();
        storage.set_fail_writes(true);
        let store = RecordsStore::open(storage.clone());

        assert!(store.record_score_at(1, &meta("Ann"), 10, t(0)));
        assert_eq!(store.get_record(1).best_score, 10);
        assert!(storage.document().is_none());
        assert!(store.flush().is_err());

        storage.set_fail_writes(false);
        store.flush().unwrap();
        assert!(storage.document().is_some());
    }

    #[test]
    fn corrupt_or_unreadable_storage_starts_empty() {
        let store = RecordsStore::open(MemoryStorage::with_document("[1, 2"));
        assert_eq!(store.total_players(), 0);

        let storage = MemoryStorage::new();
        storage.set_fail_reads(true);
        let store = RecordsStore::open(storage);
        assert_eq!(store.total_players(), 0);
        assert!(store.record_score_at(1, &meta("Ann"), 1, t(0)));
    }

    #[test]
    fn top_records_order_and_limit() {
        let store = RecordsStore::in_memory();
        store.record_score_at(1, &meta("Ann"), 300, t(5));
        store.record_score_at(2, &meta("Bo"), 900, t(1));
        store.record_score_at(3, &meta("Cy"), 300, t(2));
        store.record_score_at(4, &meta("Di"), 100, t(0));

        let top = store.top_records(3);
        let ids: Vec<_> = top.iter().map(|e| e.player_id).collect();
        // Cy reached 300 before Ann did
        assert_eq!(ids, vec![2, 3, 1]);
        assert_eq!(top[0].name, "Bo (bo)");
        assert_eq!(top[0].score, 900);
        assert_eq!(top[0].date, Some(t(1)));

        assert_eq!(store.top_records(10).len(), 4);
        assert!(store.top_records(0).is_empty());
    }

    #[test]
    fn stats_rank_uses_full_ranking_with_tie_break() {
        let store = RecordsStore::in_memory();
        store.record_score_at(1, &meta("Ann"), 300, t(5));
        store.record_score_at(2, &meta("Bo"), 900, t(1));
        store.record_score_at(3, &meta("Cy"), 300, t(2));

        assert_eq!(store.get_stats(2).rank, Some(1));
        assert_eq!(store.get_stats(3).rank, Some(2));
        assert_eq!(store.get_stats(1).rank, Some(3));
        assert_eq!(store.get_stats(1).total_players, 3);

        // Rank agrees with the leaderboard position for every player
        for (pos, entry) in store.top_records(usize::MAX).iter().enumerate() {
            assert_eq!(store.get_stats(entry.player_id).rank, Some(pos + 1));
        }
    }

    #[test]
    fn rank_is_not_capped() {
        let store = RecordsStore::in_memory();
        for id in 0..150 {
            store.record_score_at(id, &meta("P"), 1000 - id as u64, t(0));
        }
        assert_eq!(store.get_stats(149).rank, Some(150));
    }

    proptest::proptest! {
        #[test]
        fn best_score_is_the_running_maximum(
            scores in proptest::collection::vec(0u64..10_000, 1..40),
        ) {
            let store = RecordsStore::in_memory();
            let mut best = 0;
            for (i, &score) in scores.iter().enumerate() {
                let improved = store.record_score_at(1, &meta("Ann"), score, t(i as i64));
                proptest::prop_assert_eq!(improved, i == 0 || score > best);
                best = best.max(score);
                proptest::prop_assert_eq!(store.get_record(1).best_score, best);
            }
            proptest::prop_assert_eq!(store.get_record(1).games_played, scores.len() as u64);
        }
    }
}
