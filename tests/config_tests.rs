// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for configuration module

use camerart::Config;
use camerart::device::DeviceCapability;
use camerart::errors::AppError;
use camerart::filters::{ExecutionStrategy, FilterId};
use std::path::PathBuf;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.filter, FilterId::None, "No filter by default");
    assert!(
        config.high_powered.is_none(),
        "Probe should not have run yet"
    );
}

#[test]
fn test_missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load_from(&dir.path().join("absent.json")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");

    let config = Config {
        filter: FilterId::Emboss,
        high_powered: Some(true),
        execution: ExecutionStrategy::Serial,
        output_dir: Some(PathBuf::from("/tmp/camerart")),
    };
    config.save_to(&path).unwrap();
    assert!(path.exists(), "Parent directories should be created");

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_filter_stored_by_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let config = Config {
        filter: FilterId::SharpenHard,
        ..Config::default()
    };
    config.save_to(&path).unwrap();

    let json = std::fs::read_to_string(&path).unwrap();
    assert!(json.contains("\"sharpen_hard\""), "unexpected json: {}", json);
    assert!(json.contains("\"serial\"") || json.contains("\"parallel_rows\""));
}

#[test]
fn test_malformed_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();

    let res = Config::load_from(&path);
    assert!(matches!(res, Err(AppError::Config(_))));
}

#[test]
fn test_cached_capability_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");

    let mut config = Config::default();
    let probed = config.capability_or_probe(|| DeviceCapability::Constrained);
    config.save_to(&path).unwrap();

    let mut reloaded = Config::load_from(&path).unwrap();
    let cached = reloaded.capability_or_probe(|| panic!("probe must not run twice"));
    assert_eq!(cached, probed);
}

#[test]
fn test_output_dir_override() {
    let config = Config {
        output_dir: Some(PathBuf::from("/srv/photos")),
        ..Config::default()
    };
    assert_eq!(config.output_dir_or_default(), PathBuf::from("/srv/photos"));
}
