use std::fs;

use fungi_config::{Config, ConfigError, ConfigManager};
use tempfile::tempdir;

#[test]
fn default_config_targets_french_euro_display() {
    let cfg = Config::default();

    assert_eq!(cfg.locale, "fr-FR");
    assert_eq!(cfg.currency, "EUR");
    assert_eq!(cfg.backup_retention, 5);
    assert_eq!(cfg.page_size, 10);
    assert!(cfg.ui_color_enabled);
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().join("home")).expect("manager");

    let mut cfg = Config::default();
    cfg.set_value("currency", "usd").expect("set currency");
    cfg.set_value("page_size", "25").expect("set page size");
    cfg.set_value("ui_color_enabled", "off").expect("set color");

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded, cfg);
    assert_eq!(loaded.currency, "USD");
    assert!(!manager.config_path().with_extension("json.tmp").exists());
}

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"));
    assert_eq!(manager.load().expect("defaults"), Config::default());
}

#[test]
fn partial_file_fills_in_defaults() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"locale": "en-US"}"#).expect("write partial");

    let loaded = ConfigManager::new(path).load().expect("load partial");
    assert_eq!(loaded.locale, "en-US");
    assert_eq!(loaded.currency, "EUR");
    assert_eq!(loaded.low_stock_preview, 10);
}

#[test]
fn set_value_rejects_bad_input() {
    let mut cfg = Config::default();
    assert!(matches!(
        cfg.set_value("page_size", "0"),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert!(matches!(
        cfg.set_value("theme", "dark"),
        Err(ConfigError::UnknownKey(_))
    ));
    assert_eq!(cfg, Config::default());

    cfg.set_value("data_dir", "/tmp/stock").expect("set dir");
    assert_eq!(cfg.get_value("data_dir").unwrap(), "/tmp/stock");
    cfg.set_value("data_dir", "default").expect("reset dir");
    assert!(cfg.data_dir.is_none());
}
