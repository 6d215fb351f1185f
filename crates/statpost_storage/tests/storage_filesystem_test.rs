//! Tests for the filesystem document store.

use serde_json::json;
use statpost_core::{PostHistory, PostRecord, PostStatus, StatisticsDocument};
use statpost_storage::{
    DocumentStore, FileSystemStore, StorageErrorKind, load_document, save_document,
};
use statpost_error::StatpostErrorKind;
use tempfile::TempDir;

#[tokio::test]
async fn test_missing_key_loads_empty_document() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileSystemStore::new(temp_dir.path()).unwrap();

    let loaded = store.load("statistics.json").await.unwrap();
    assert_eq!(loaded, json!({}));

    let stats: StatisticsDocument = load_document(&store, "statistics.json").await.unwrap();
    assert!(stats.is_empty());
}

#[tokio::test]
async fn test_statistics_round_trip_preserves_order() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileSystemStore::new(temp_dir.path()).unwrap();

    let doc = StatisticsDocument::with_used(
        vec!["C".into(), "A".into(), "B".into()],
        vec!["A".into()],
    );
    save_document(&store, "statistics.json", &doc).await.unwrap();

    let loaded: StatisticsDocument = load_document(&store, "statistics.json").await.unwrap();
    assert_eq!(loaded, doc);
}

#[tokio::test]
async fn test_history_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileSystemStore::new(temp_dir.path()).unwrap();

    let mut history = PostHistory::new();
    history.push(PostRecord::new("2024-01-01T00:00:00Z", "first", PostStatus::Published));
    history.push(PostRecord::new("2024-01-02T00:00:00Z", "second", PostStatus::Pending));
    save_document(&store, "previous_posts.json", &history)
        .await
        .unwrap();

    let raw = store.load("previous_posts.json").await.unwrap();
    assert!(raw.is_array());
    assert_eq!(PostHistory::from_value(raw), history);
}

#[tokio::test]
async fn test_save_overwrites_and_uses_four_space_indent() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileSystemStore::new(temp_dir.path()).unwrap();

    store.save("doc.json", &json!({"a": 1})).await.unwrap();
    store.save("doc.json", &json!({"b": 2})).await.unwrap();

    let on_disk = std::fs::read_to_string(temp_dir.path().join("doc.json")).unwrap();
    assert_eq!(on_disk, "{\n    \"b\": 2\n}");
    assert_eq!(store.load("doc.json").await.unwrap(), json!({"b": 2}));
}

#[tokio::test]
async fn test_nested_keys_create_directories() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileSystemStore::new(temp_dir.path()).unwrap();

    store.save("bot/a/doc.json", &json!([1, 2])).await.unwrap();
    assert_eq!(store.load("bot/a/doc.json").await.unwrap(), json!([1, 2]));
}

#[tokio::test]
async fn test_empty_file_loads_empty_document() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("statistics.json"), "").unwrap();
    let store = FileSystemStore::new(temp_dir.path()).unwrap();

    assert_eq!(store.load("statistics.json").await.unwrap(), json!({}));
}

#[tokio::test]
async fn test_corrupt_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("statistics.json"), "{oops").unwrap();
    let store = FileSystemStore::new(temp_dir.path()).unwrap();

    let err = store.load("statistics.json").await.unwrap_err();
    match err.kind() {
        StatpostErrorKind::Storage(e) => {
            assert!(matches!(e.kind, StorageErrorKind::InvalidDocument { .. }))
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn test_escaping_keys_are_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileSystemStore::new(temp_dir.path()).unwrap();

    for key in ["../outside.json", "/etc/passwd", "a/../../b.json", ""] {
        let err = store.load(key).await.unwrap_err();
        match err.kind() {
            StatpostErrorKind::Storage(e) => {
                assert!(matches!(e.kind, StorageErrorKind::InvalidKey(_)), "{key}")
            }
            other => panic!("unexpected error for {key}: {}", other),
        }
    }
}
