use std::fs;

use sysvitals::core::config::Config;
use tempfile::TempDir;

#[test]
fn test_missing_file_returns_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");

    let config = Config::load_from(&path);
    assert_eq!(config, Config::default());
}

#[test]
fn test_corrupt_file_falls_back_to_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    fs::write(&path, "{not json").unwrap();

    let config = Config::load_from(&path);
    assert_eq!(config, Config::default());
}

#[test]
fn test_empty_file_falls_back_to_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    fs::write(&path, "   \n").unwrap();

    let config = Config::load_from(&path);
    assert_eq!(config, Config::default());
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    fs::write(
        &path,
        r#"{"poll_intervals": {"cpu": 1, "disk": 30}, "cache_ttl": 5}"#,
    )
    .unwrap();

    let config = Config::load_from(&path);
    assert_eq!(config.poll_intervals.cpu, 1);
    assert_eq!(config.poll_intervals.ram, 5);
    assert_eq!(config.poll_intervals.disk, 30);
    assert_eq!(config.cache_ttl, 5);
    assert_eq!(config.memory_limit_mb, 25);
}

#[test]
fn test_invalid_values_are_replaced_not_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    fs::write(
        &path,
        r#"{"poll_intervals": {"ram": 0}, "backoff_factor": 0.1, "memory_limit_mb": 0}"#,
    )
    .unwrap();

    let config = Config::load_from(&path);
    assert_eq!(config.poll_intervals.ram, 5);
    assert_eq!(config.backoff_factor, 3.0);
    assert_eq!(config.memory_limit_mb, 25);
}

#[test]
fn test_window_settings_parse() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    fs::write(
        &path,
        r#"{"window": {"width": 800, "height": 600, "resizable": true}}"#,
    )
    .unwrap();

    let config = Config::load_from(&path);
    assert_eq!(config.window.width, 800);
    assert_eq!(config.window.height, 600);
    assert!(config.window.resizable);
}
