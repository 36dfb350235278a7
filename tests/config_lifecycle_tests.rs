//! Record lifecycle tests: instantiate, copy, duplicate, free

use fwconf::config::{Config, ConfigWifiSta, CONFIG_DEFAULTS};
use fwconf::{copy, duplicate, free, instantiate, ConfStr, ConfigError, SchemaRecord};

#[test]
fn test_instantiate_matches_defaults() {
    let cfg: Config = instantiate().unwrap();
    assert_eq!(cfg, CONFIG_DEFAULTS);
    assert_eq!(cfg.wifi.ap.pass.as_str(), Some("ключ доступа"));
    assert!(matches!(cfg.device.password, ConfStr::Absent));
}

#[test]
fn test_duplicate_is_independent() {
    let mut a: Config = instantiate().unwrap();
    a.wifi.sta.ssid.set("first").unwrap();
    let mut b = duplicate(&a).unwrap();
    assert_eq!(a, b);

    b.wifi.sta.ssid.set("second").unwrap();
    a.wifi.sta.ssid.free();
    assert_eq!(b.wifi.sta.ssid.as_str(), Some("second"));
    assert!(a.wifi.sta.ssid.as_str().is_none());
}

#[test]
fn test_modifying_copy_leaves_defaults_alone() {
    let mut cfg: Config = instantiate().unwrap();
    cfg.device.id.set("changed").unwrap();
    free(Config::schema(), &mut cfg);
    assert_eq!(CONFIG_DEFAULTS.device.id.as_str(), Some("fwdev_??????"));
    assert_eq!(Config::defaults().device.id.as_str(), Some("fwdev_??????"));

    let again: Config = instantiate().unwrap();
    assert_eq!(again.device.id.as_str(), Some("fwdev_??????"));
    assert_eq!(again.wifi.sta.pass.as_str(), Some("line one\nline two\n"));
}

#[test]
fn test_copy_overwrites_every_field() {
    let src: Config = instantiate().unwrap();
    let mut dst = Config::default();
    dst.http.port = 1;
    dst.debug.dest.set("elsewhere").unwrap();
    copy(Config::schema(), &src, &mut dst).unwrap();
    assert_eq!(dst, src);
}

#[test]
fn test_copy_sub_record() {
    let mut src: ConfigWifiSta = instantiate().unwrap();
    src.enable = true;
    let mut dst = ConfigWifiSta::default();
    copy(ConfigWifiSta::schema(), &src, &mut dst).unwrap();
    assert_eq!(dst, src);
}

#[test]
fn test_copy_requires_object_head() {
    let schema = Config::schema().find("http.port").unwrap();
    let src: Config = instantiate().unwrap();
    let mut dst = Config::default();
    assert!(matches!(copy(schema, &src, &mut dst), Err(ConfigError::NotAnObject)));
}

#[test]
fn test_free_is_repeatable() {
    let mut cfg: Config = instantiate().unwrap();
    free(Config::schema(), &mut cfg);
    free(Config::schema(), &mut cfg);
    assert!(cfg.wifi.ap.ssid.as_str().is_none());
    assert!(cfg.wifi.ap.enable);
}
