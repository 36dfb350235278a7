//! Schema table navigation tests

use fwconf::config::{schema, Config, ConfigWifi, ConfigWifiAp, CONFIG_SCHEMA_ENTRIES};
use fwconf::schema::{ConfEntry, ConfType, Schema, SchemaError};
use fwconf::SchemaRecord;

#[test]
fn test_root_is_object_covering_table() {
    let root = schema().root();
    assert_eq!(root.conf_type, ConfType::Object);
    assert_eq!(root.offset, 0);
    assert_eq!(root.span(), CONFIG_SCHEMA_ENTRIES.len());
}

#[test]
fn test_children_skip_nested_subtrees() {
    let keys: Vec<&str> = schema().children().map(|c| c.root().key).collect();
    assert_eq!(keys, ["device", "debug", "wifi", "http", "conf_acl"]);
}

#[test]
fn test_find_nested_path() {
    let e = schema().find("wifi.ap.channel").unwrap().root();
    assert_eq!(e.conf_type, ConfType::Int);
    assert_eq!(e.offset, 15);
}

#[test]
fn test_find_unknown_and_through_primitive() {
    assert!(schema().find("wifi.nope").is_none());
    assert!(schema().find("http.port.deeper").is_none());
    assert!(schema().find("").is_none());
}

#[test]
fn test_find_relative_to_sub_schema() {
    let wifi = ConfigWifi::schema();
    let e = wifi.find("ap.ssid").unwrap().root();
    // Offsets stay those of the root table.
    assert_eq!(e.offset, 13);
    assert!(wifi.find("http").is_none());
}

#[test]
fn test_key_paths_in_table_order() {
    let paths = ConfigWifiAp::schema().key_paths();
    assert_eq!(paths, ["enable", "ssid", "pass", "channel", "dhcp_end"]);
    let all = Config::schema().key_paths();
    assert_eq!(all.first().map(String::as_str), Some("device.id"));
    assert_eq!(all.last().map(String::as_str), Some("conf_acl"));
    assert_eq!(all.len(), 18);
}

#[test]
fn test_validate_rejects_primitive_with_descendants() {
    static BAD: [ConfEntry; 3] = [
        ConfEntry { key: "", conf_type: ConfType::Object, offset: 0, num_desc: 2 },
        ConfEntry { key: "a", conf_type: ConfType::Int, offset: 1, num_desc: 1 },
        ConfEntry { key: "b", conf_type: ConfType::Int, offset: 2, num_desc: 0 },
    ];
    assert_eq!(
        Schema::new(&BAD).validate(),
        Err(SchemaError::PrimitiveWithDescendants { index: 1 })
    );
}

#[test]
fn test_validate_rejects_primitive_root() {
    static BAD: [ConfEntry; 1] = [ConfEntry { key: "", conf_type: ConfType::Int, offset: 0, num_desc: 0 }];
    assert_eq!(Schema::new(&BAD).validate(), Err(SchemaError::RootNotObject));
}
