//! Tests for config functionality.

use crate::config::{Config, DirectorConfig, TokenStrategy};
use crate::error::LockError;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.store_dir, "cloud-configs");
    assert!(config.directors.is_empty());
    assert_eq!(config.lock_stale_minutes, 30);
    assert_eq!(config.cycle_timeout_secs, None);
    assert_eq!(config.token_strategy, TokenStrategy::Uuid);
    assert_eq!(config.logging.level, "info");
    assert!(!config.logging.json_format);
}

#[test]
fn test_parse_empty_yaml() {
    let config = Config::from_yaml("").unwrap();

    assert_eq!(config.store_dir, "cloud-configs");
    assert_eq!(config.lock_stale_minutes, 30);
}

#[test]
fn test_parse_full_yaml() {
    let yaml = r#"
store_dir: /var/lib/ccl
lock_stale_minutes: 10
cycle_timeout_secs: 45
token_strategy: sequential
directors:
  - name: bosh-a
  - name: bosh-b
    read_only: true
logging:
  level: debug
  json_format: true
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(config.store_dir, "/var/lib/ccl");
    assert_eq!(config.lock_stale_minutes, 10);
    assert_eq!(config.cycle_timeout(), Some(Duration::from_secs(45)));
    assert_eq!(config.token_strategy, TokenStrategy::Sequential);
    assert_eq!(config.directors.len(), 2);
    assert!(!config.director("bosh-a").unwrap().read_only);
    assert!(config.director("bosh-b").unwrap().read_only);
    assert!(config.director("bosh-c").is_none());
    assert_eq!(config.logging.level, "debug");
    assert!(config.logging.json_format);
}

#[test]
fn test_unknown_fields_are_ignored() {
    let yaml = r#"
future_option: 42
directors:
  - name: bosh-a
    url: https://10.0.0.6:25555
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(config.directors.len(), 1);
    assert!(config.directors[0].extra.contains_key("url"));
}

#[test]
fn test_invalid_token_strategy_is_rejected() {
    let err = Config::from_yaml("token_strategy: random\n").unwrap_err();
    assert!(matches!(err, LockError::Config(_)));
}

#[test]
fn test_zero_stale_minutes_is_rejected() {
    let err = Config::from_yaml("lock_stale_minutes: 0\n").unwrap_err();
    assert!(err.to_string().contains("lock_stale_minutes"));
}

#[test]
fn test_zero_cycle_timeout_is_rejected() {
    let err = Config::from_yaml("cycle_timeout_secs: 0\n").unwrap_err();
    assert!(err.to_string().contains("cycle_timeout_secs"));
}

#[test]
fn test_duplicate_directors_are_rejected() {
    let mut config = Config::default();
    config.directors = vec![DirectorConfig::new("bosh-a"), DirectorConfig::new("bosh-a")];

    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("more than once"));
}

#[test]
fn test_blank_director_name_is_rejected() {
    let err = Config::from_yaml("directors:\n  - name: ''\n").unwrap_err();
    assert!(err.to_string().contains("non-empty"));
}

#[test]
fn test_padded_director_name_is_rejected() {
    let err = Config::from_yaml("directors:\n  - name: 'dirA '\n").unwrap_err();
    assert!(matches!(err, LockError::Config(_)));
    assert!(err.to_string().contains("whitespace"));
}

#[test]
fn test_yaml_roundtrip_keeps_directors() {
    let mut config = Config::default();
    config.directors = vec![DirectorConfig::new("bosh-a")];
    config.cycle_timeout_secs = Some(5);

    let parsed = Config::from_yaml(&config.to_yaml().unwrap()).unwrap();

    assert_eq!(parsed.directors, config.directors);
    assert_eq!(parsed.cycle_timeout_secs, Some(5));
}

#[test]
fn test_load_or_default_without_file() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::load_or_default(temp_dir.path().join("ccl.yml")).unwrap();

    assert_eq!(config.lock_stale_minutes, 30);
}

#[test]
fn test_load_reads_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ccl.yml");
    std::fs::write(&path, "store_dir: docs\n").unwrap();

    let config = Config::load(&path).unwrap();

    assert_eq!(config.store_dir, "docs");
}

#[test]
fn test_token_generator_follows_strategy() {
    let mut config = Config::default();
    config.token_strategy = TokenStrategy::Sequential;

    let tokens = config.token_generator();
    assert_eq!(tokens.next_token().as_str(), "token-1");
    assert_eq!(tokens.next_token().as_str(), "token-2");
}

#[test]
fn test_token_strategy_from_str() {
    assert_eq!(TokenStrategy::from_str("uuid"), Some(TokenStrategy::Uuid));
    assert_eq!(
        TokenStrategy::from_str("sequential"),
        Some(TokenStrategy::Sequential)
    );
    assert_eq!(TokenStrategy::from_str("random"), None);
}
