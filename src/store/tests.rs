//! Tests for the document stores and token generators.

use super::*;
use crate::config::DirectorConfig;
use crate::error::LockError;
use std::collections::HashSet;
use tempfile::TempDir;

fn key(director: &str, name: &str) -> LockKey {
    LockKey::new(director, name).unwrap()
}

fn doc(yaml: &str) -> CloudConfig {
    CloudConfig::from_yaml(yaml).unwrap()
}

#[tokio::test]
async fn test_memory_store_fetch_missing_is_none() {
    let store = MemoryStore::new();
    let k = key("dirA", "cfgX");

    assert_eq!(store.fetch(&k).await.unwrap(), None);
    assert_eq!(store.ops(), vec![StoreOp::Fetch(k)]);
}

#[tokio::test]
async fn test_memory_store_keeps_versions() {
    let store = MemoryStore::new();
    let k = key("dirA", "cfgX");
    store.insert(&k, doc("a: 1"));

    let ack = store.write(&k, &doc("a: 2")).await.unwrap();

    assert_eq!(ack.key, k);
    assert_eq!(ack.version, 2);
    assert_eq!(store.version_count(&k), 2);
    assert_eq!(store.latest(&k), Some(doc("a: 2")));
    assert_eq!(store.fetch(&k).await.unwrap(), Some(doc("a: 2")));
}

#[tokio::test]
async fn test_memory_store_injected_failures_fire_once() {
    let store = MemoryStore::new();
    let k = key("dirA", "cfgX");
    store.fail_next_fetch(LockError::Unauthorized("bad credentials".to_string()));
    store.fail_next_write(LockError::Transport("connection reset".to_string()));

    assert!(matches!(
        store.fetch(&k).await,
        Err(LockError::Unauthorized(_))
    ));
    assert!(store.fetch(&k).await.is_ok());

    assert!(matches!(
        store.write(&k, &doc("a: 1")).await,
        Err(LockError::Transport(_))
    ));
    assert_eq!(store.version_count(&k), 0);
    assert!(store.write(&k, &doc("a: 1")).await.is_ok());
    assert_eq!(store.version_count(&k), 1);
}

#[tokio::test]
async fn test_file_store_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileStore::new(temp_dir.path(), vec![DirectorConfig::new("dirA")]);
    let k = key("dirA", "cfgX");

    assert_eq!(store.fetch(&k).await.unwrap(), None);

    let ack = store.write(&k, &doc("a: 1\nb: [x, y]\n")).await.unwrap();
    assert_eq!(ack.version, 1);
    assert!(store.document_path(&k).unwrap().ends_with("dirA/cfgX.yml"));
    assert_eq!(store.fetch(&k).await.unwrap(), Some(doc("a: 1\nb: [x, y]\n")));

    let ack = store.write(&k, &doc("a: 2\n")).await.unwrap();
    assert_eq!(ack.version, 2);
    assert_eq!(store.fetch(&k).await.unwrap(), Some(doc("a: 2\n")));
}

#[tokio::test]
async fn test_file_store_unknown_director_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileStore::new(temp_dir.path(), vec![DirectorConfig::new("dirA")]);
    let k = key("dirB", "cfgX");

    assert!(matches!(store.fetch(&k).await, Err(LockError::NotFound(_))));
    assert!(matches!(
        store.write(&k, &doc("a: 1")).await,
        Err(LockError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_file_store_read_only_director_rejects_writes() {
    let temp_dir = TempDir::new().unwrap();
    let mut director = DirectorConfig::new("dirA");
    director.read_only = true;
    let store = FileStore::new(temp_dir.path(), vec![director]);
    let k = key("dirA", "cfgX");

    let err = store.write(&k, &doc("a: 1")).await.unwrap_err();

    assert!(matches!(err, LockError::Unauthorized(_)));
    assert!(!store.document_path(&k).unwrap().exists());
    assert_eq!(store.fetch(&k).await.unwrap(), None);
}

#[tokio::test]
async fn test_file_store_corrupt_document_is_transport_error() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileStore::new(temp_dir.path(), vec![DirectorConfig::new("dirA")]);
    let k = key("dirA", "cfgX");
    let path = store.document_path(&k).unwrap();
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "a: [1, 2").unwrap();

    let err = store.fetch(&k).await.unwrap_err();

    assert!(matches!(err, LockError::Transport(_)));
    assert!(err.to_string().contains("dirA_cfgX"));
}

#[tokio::test]
async fn test_file_store_rejects_names_that_leave_the_director() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("store");
    let store = FileStore::new(&root, vec![DirectorConfig::new("dirA")]);

    for name in ["../../escaped", "../cfgX", "sub/cfgX", "sub/.", "/abs", ".", ".."] {
        let k = key("dirA", name);
        assert!(
            matches!(store.write(&k, &doc("a: 1")).await, Err(LockError::InvalidArgument(_))),
            "write accepted '{}'",
            name
        );
        assert!(
            matches!(store.fetch(&k).await, Err(LockError::InvalidArgument(_))),
            "fetch accepted '{}'",
            name
        );
    }

    assert!(!temp_dir.path().join("escaped.yml").exists());
    assert!(!root.join("cfgX.yml").exists());
    assert!(!root.exists());
}

#[test]
fn test_sequential_tokens_count_up() {
    let tokens = SequentialTokenGenerator::new();

    assert_eq!(tokens.next_token(), LockToken::new("token-1"));
    assert_eq!(tokens.next_token(), LockToken::new("token-2"));
    assert_eq!(tokens.next_token().to_string(), "token-3");
}

#[test]
fn test_uuid_tokens_are_unique() {
    let tokens = UuidTokenGenerator;
    let seen: HashSet<_> = (0..100).map(|_| tokens.next_token()).collect();

    assert_eq!(seen.len(), 100);
}
