use hwmon_charts::core::config::{MonitorConfig, DEFAULT_SERVER_URL};
use hwmon_charts::core::telemetry::VisibilityKey;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_config_default() {
    let config = MonitorConfig::default();
    assert_eq!(config.server_url, DEFAULT_SERVER_URL);
    assert!(config.enabled);
    assert!(config.pixel_ratio.is_none());
    for key in VisibilityKey::ALL {
        assert!(config.visibility.is_visible(key));
    }
}

#[test]
fn test_config_roundtrip_uses_camel_case_visibility() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("hwmon-charts").join("config.json");

    let mut config = MonitorConfig::default();
    config.visibility.set(VisibilityKey::SharedGpuSpeed, false);
    config.save_to(&path).unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"sharedGpuSpeed\": false"));

    let loaded = MonitorConfig::load_from(&path).unwrap();
    assert!(!loaded.visibility.is_visible(VisibilityKey::SharedGpuSpeed));
    assert_eq!(loaded, config);
}

#[test]
fn test_config_empty_file_returns_default() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    fs::write(&path, "").unwrap();

    assert_eq!(MonitorConfig::load_from(&path).unwrap(), MonitorConfig::default());
}
