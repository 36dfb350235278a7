//! Layered config store tests: levels, ACL filtering, save and reset

use std::fs;
use std::path::Path;

use fwconf::config::SysConfig;
use fwconf::store::{level_path, USER_LEVEL};
use fwconf::ConfigError;

fn write_level(dir: &Path, level: usize, json: &str) {
    fs::write(level_path(dir, level), json).unwrap();
}

#[test]
fn test_load_defaults_from_empty_dir() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = SysConfig::load(dir.path()).unwrap();
    assert_eq!(cfg.get("http.port").as_deref(), Some("80"));
    assert_eq!(cfg.dump(false, true).unwrap(), "{}");
}

#[test]
fn test_higher_levels_override_lower() {
    let dir = tempfile::tempdir().unwrap();
    write_level(dir.path(), 0, r#"{"http": {"port": 81}, "debug": {"level": 3}}"#);
    write_level(dir.path(), 5, r#"{"http": {"port": 82}}"#);
    let cfg = SysConfig::load(dir.path()).unwrap();
    assert_eq!(cfg.get("http.port").as_deref(), Some("82"));
    assert_eq!(cfg.get("debug.level").as_deref(), Some("3"));
}

#[test]
fn test_levels_above_zero_are_acl_filtered() {
    let dir = tempfile::tempdir().unwrap();
    write_level(dir.path(), 0, r#"{"conf_acl": "wifi.*,-*"}"#);
    write_level(dir.path(), 1, r#"{"wifi": {"ap": {"channel": 1}}, "http": {"port": 1}}"#);
    let cfg = SysConfig::load(dir.path()).unwrap();
    assert_eq!(cfg.get("wifi.ap.channel").as_deref(), Some("1"));
    assert_eq!(cfg.get("http.port").as_deref(), Some("80"));
}

#[test]
fn test_level_can_narrow_acl_for_later_levels() {
    let dir = tempfile::tempdir().unwrap();
    write_level(dir.path(), 1, r#"{"conf_acl": "debug.*"}"#);
    write_level(dir.path(), 2, r#"{"http": {"port": 2}, "debug": {"level": 0}}"#);
    let cfg = SysConfig::load(dir.path()).unwrap();
    assert_eq!(cfg.get("http.port").as_deref(), Some("80"));
    assert_eq!(cfg.get("debug.level").as_deref(), Some("0"));
}

#[test]
fn test_broken_level_fails_load() {
    let dir = tempfile::tempdir().unwrap();
    write_level(dir.path(), 3, r#"{"http": {"port": "x"}}"#);
    assert!(SysConfig::load(dir.path()).is_err());
    write_level(dir.path(), 3, "{");
    assert!(matches!(SysConfig::load(dir.path()), Err(ConfigError::Json(_))));
}

#[test]
fn test_save_writes_diff_against_lower_levels() {
    let dir = tempfile::tempdir().unwrap();
    write_level(dir.path(), 0, r#"{"http": {"port": 81}}"#);
    let cfg = SysConfig::load(dir.path()).unwrap();
    cfg.set("wifi.sta.ssid", "home").unwrap();
    cfg.save().unwrap();

    let saved = fs::read_to_string(level_path(dir.path(), USER_LEVEL)).unwrap();
    assert_eq!(saved, "{\n  \"wifi\": {\n    \"sta\": {\n      \"ssid\": \"home\"\n    }\n  }\n}");

    let reloaded = SysConfig::load(dir.path()).unwrap();
    assert_eq!(reloaded.get("wifi.sta.ssid").as_deref(), Some("home"));
    assert_eq!(reloaded.get("http.port").as_deref(), Some("81"));
}

#[test]
fn test_reset_drops_user_level() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = SysConfig::load(dir.path()).unwrap();
    cfg.set("http.port", "9000").unwrap();
    cfg.save().unwrap();
    assert!(level_path(dir.path(), USER_LEVEL).exists());

    cfg.reset().unwrap();
    assert!(!level_path(dir.path(), USER_LEVEL).exists());
    assert_eq!(cfg.get("http.port").as_deref(), Some("80"));

    // Nothing to remove the second time.
    cfg.reset().unwrap();
}

#[test]
fn test_apply_json_with_acl() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = SysConfig::load(dir.path()).unwrap();
    cfg.apply_json(r#"{"http": {"port": 1}, "debug": {"level": 4}}"#, "http.*")
        .unwrap();
    assert_eq!(cfg.lock().http.port, 1);
    assert_eq!(cfg.lock().debug.level, 2);
}

#[test]
fn test_dump_full_and_diff() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = SysConfig::load(dir.path()).unwrap();
    cfg.set("http.enable", "false").unwrap();
    assert_eq!(cfg.dump(false, true).unwrap(), r#"{"http":{"enable":false}}"#);
    let full = cfg.dump(true, false).unwrap();
    assert!(full.contains("\"conf_acl\": \"*\""));
    assert!(full.contains("\"enable\": false"));
}
