use rustdict::cache::{CacheStore, PutOutcome, Record};
use serde_json::json;
use tempfile::tempdir;

#[test]
fn test_cache_survives_reopen() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("nested").join("rustdict.db");

    {
        let cache = CacheStore::open(&db_path).unwrap();
        let record = Record::new("hello", "urban", json!({"definitions": ["a greeting"]}));
        assert_eq!(cache.put(&record).unwrap(), PutOutcome::Inserted);
    }

    let cache = CacheStore::open(&db_path).unwrap();
    let record = cache.get("hello", "urban").unwrap().unwrap();
    assert_eq!(record.content, json!({"definitions": ["a greeting"]}));
    assert_eq!(cache.len().unwrap(), 1);
}

#[test]
fn test_identical_put_leaves_one_row() {
    let cache = CacheStore::open_in_memory().unwrap();
    let record = Record::new("hello", "urban", json!({"x": 1, "y": [1, 2]}));

    assert_eq!(cache.put(&record).unwrap(), PutOutcome::Inserted);
    assert_eq!(cache.put(&record).unwrap(), PutOutcome::Unchanged);
    assert_eq!(cache.len().unwrap(), 1);
}

#[test]
fn test_changed_content_replaces_row() {
    let cache = CacheStore::open_in_memory().unwrap();
    cache
        .put(&Record::new("hello", "urban", json!({"v": 1})))
        .unwrap();

    let outcome = cache
        .put(&Record::new("hello", "urban", json!({"v": 2})))
        .unwrap();

    assert_eq!(outcome, PutOutcome::Updated);
    assert_eq!(cache.len().unwrap(), 1);
    assert_eq!(
        cache.get("hello", "urban").unwrap().unwrap().content,
        json!({"v": 2})
    );
}

#[test]
fn test_same_word_different_sources_are_separate() {
    let cache = CacheStore::open_in_memory().unwrap();
    cache
        .put(&Record::new("hello", "urban", json!({"from": "urban"})))
        .unwrap();
    cache
        .put(&Record::new("hello", "freedict", json!({"from": "freedict"})))
        .unwrap();

    assert_eq!(cache.len().unwrap(), 2);
    assert_eq!(
        cache.get("hello", "urban").unwrap().unwrap().content["from"],
        "urban"
    );
    assert_eq!(
        cache.get("hello", "freedict").unwrap().unwrap().content["from"],
        "freedict"
    );
    assert!(cache.get("hello", "moe").unwrap().is_none());
}

#[test]
fn test_two_handles_share_one_database() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("rustdict.db");

    let writer = CacheStore::open(&db_path).unwrap();
    let reader = CacheStore::open(&db_path).unwrap();

    writer
        .put(&Record::new("apple", "freedict", json!({})))
        .unwrap();

    assert!(reader.get("apple", "freedict").unwrap().is_some());
    assert_eq!(reader.words_with_prefix("ap", 10).unwrap(), vec!["apple"]);
}
