//! Records store tests - file persistence, legacy documents, concurrent writers

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use chrono::{TimeZone, Utc};

use blockfall::records::{JsonFileStorage, PlayerMeta, RecordsStore, Storage};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("blockfall-records-{}-{}", name, std::process::id()))
        .join("records.json")
}

fn cleanup(path: &PathBuf) {
    if let Some(dir) = path.parent() {
        let _ = fs::remove_dir_all(dir);
    }
}

#[test]
fn test_scores_survive_reopen() {
    let path = temp_path("reopen");
    cleanup(&path);

    let store = RecordsStore::open_json(&path);
    let ann = PlayerMeta::new("ann", "Ann");
    let t0 = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
    assert!(store.record_score_at(1, &ann, 700, t0));
    assert!(!store.record_score_at(1, &ann, 300, t0));
    assert!(store.record_score_at(2, &PlayerMeta::new("bo", "Bo"), 900, t0));
    assert!(path.exists(), "missing parent directory is created");

    let reopened = RecordsStore::open_json(&path);
    assert_eq!(reopened.records(), store.records());

    let ann_record = reopened.get_record(1);
    assert_eq!(ann_record.best_score, 700);
    assert_eq!(ann_record.last_score, 300);
    assert_eq!(ann_record.games_played, 2);
    assert_eq!(ann_record.best_date, Some(t0));
    assert_eq!(reopened.get_stats(1).rank, Some(2));

    cleanup(&path);
}

#[test]
fn test_missing_file_starts_empty() {
    let path = temp_path("missing");
    cleanup(&path);

    let store = RecordsStore::open_json(&path);
    assert_eq!(store.total_players(), 0);
    assert!(store.top_records(10).is_empty());
    assert!(!path.exists(), "opening never writes");
}

#[test]
fn test_corrupt_file_starts_empty_and_is_replaced() {
    let path = temp_path("corrupt");
    cleanup(&path);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "{\"1\": {\"best_score\": ").unwrap();

    let store = RecordsStore::open_json(&path);
    assert_eq!(store.total_players(), 0);

    store.record_score(3, &PlayerMeta::new("cy", "Cy"), 5);
    let reloaded = JsonFileStorage::new(&path).load().unwrap().unwrap();
    assert_eq!(reloaded.len(), 1);

    cleanup(&path);
}

#[test]
fn test_legacy_document_loads() {
    let path = temp_path("legacy");
    cleanup(&path);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(
        &path,
        r#"{
            "100": {"username": "neo", "first_name": "Thomas", "last_name": "A",
                    "score": 2400, "date": "2023-11-05T18:22:01.532113"},
            "200": {"username": "", "first_name": "", "score": 2400,
                    "date": "2023-11-04T10:00:00"}
        }"#,
    )
    .unwrap();

    let store = RecordsStore::open_json(&path);
    assert_eq!(store.total_players(), 2);

    // Same score: the earlier achiever ranks first
    let top = store.top_records(10);
    assert_eq!(top[0].player_id, 200);
    assert_eq!(top[0].name, "Player ()");
    assert_eq!(top[1].name, "Thomas (neo)");

    // A legacy best still has to be beaten strictly
    assert!(!store.record_score(100, &PlayerMeta::new("neo", "Thomas"), 2400));
    assert!(store.record_score(100, &PlayerMeta::new("neo", "Thomas"), 2401));
    assert_eq!(store.get_stats(100).rank, Some(1));

    cleanup(&path);
}

#[test]
fn test_concurrent_reports_are_all_kept() {
    let path = temp_path("concurrent");
    cleanup(&path);
    let store = Arc::new(RecordsStore::open_json(&path));

    let handles: Vec<_> = (0..8)
        .map(|player| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let meta = PlayerMeta::new(format!("p{}", player), "P");
                for score in 1..=25u64 {
                    store.record_score(player, &meta, score * 10);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.total_players(), 8);
    for player in 0..8 {
        let record = store.get_record(player);
        assert_eq!(record.best_score, 250);
        assert_eq!(record.games_played, 25);
    }

    // The last save holds every update
    let reopened = RecordsStore::open_json(&path);
    assert_eq!(reopened.records(), store.records());

    cleanup(&path);
}
