#![forbid(unsafe_code)]

//! Loading tunables from TOML and JSON files.
//!
//! Run:
//!   cargo test -p tactile-core --features config-file --test config_file_loading

use std::io::Write as _;

use tactile_core::{
    ConfigError, GestureConfig, GestureHandlers, GestureSession, PullRefreshConfig,
    TactileConfig,
};
use tempfile::NamedTempFile;
use web_time::Duration;

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn toml_file_overrides_every_field() {
    let file = write_temp(
        r#"
[gesture]
min_swipe_distance = 64.0
max_gesture_duration_ms = 800
tap_move_threshold = 6.5

[pull_refresh]
pull_threshold = 96.0
"#,
    );
    let config = TactileConfig::from_toml_file(file.path()).unwrap();
    assert_eq!(
        config,
        TactileConfig {
            gesture: GestureConfig {
                min_swipe_distance: 64.0,
                max_gesture_duration: Duration::from_millis(800),
                tap_move_threshold: 6.5,
            },
            pull_refresh: PullRefreshConfig {
                pull_threshold: 96.0
            },
        }
    );
}

#[test]
fn empty_toml_yields_defaults() {
    let file = write_temp("");
    let config = TactileConfig::from_toml_file(file.path()).unwrap();
    assert_eq!(config, TactileConfig::default());
}

#[test]
fn json_file_with_one_section() {
    let file = write_temp(r#"{ "pull_refresh": { "pull_threshold": 40.0 } }"#);
    let config = TactileConfig::from_json_file(file.path()).unwrap();
    assert_eq!(config.pull_refresh.pull_threshold, 40.0);
    assert_eq!(config.gesture, GestureConfig::default());
}

#[test]
fn loaded_config_drives_a_session() {
    let file = write_temp("[gesture]\nmin_swipe_distance = 200.0\n");
    let config = TactileConfig::from_toml_file(file.path()).unwrap();
    let mut gs = GestureSession::try_new(config.gesture, GestureHandlers::new()).unwrap();

    gs.on_contacts_start(&[tactile_core::ContactPoint::new(0.0, 0.0, 0)]);
    let out = gs.on_contacts_end(tactile_core::ContactPoint::new(120.0, 0.0, 100));
    assert!(out.is_empty(), "120px is below the loaded swipe distance");
}

#[test]
fn invalid_values_are_rejected_after_parsing() {
    let file = write_temp("[pull_refresh]\npull_threshold = -5.0\n");
    let err = TactileConfig::from_toml_file(file.path()).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidValue {
            field: "pull_threshold",
            ..
        }
    ));

    let err = TactileConfig::from_json_str(r#"{ "gesture": { "max_gesture_duration_ms": 0 } }"#)
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidValue {
            field: "max_gesture_duration",
            ..
        }
    ));
}

#[test]
fn malformed_files_surface_parser_errors() {
    let file = write_temp("[gesture\nmin_swipe_distance = 1");
    assert!(matches!(
        TactileConfig::from_toml_file(file.path()),
        Err(ConfigError::Toml(_))
    ));

    let file = write_temp("{ \"gesture\": ");
    assert!(matches!(
        TactileConfig::from_json_file(file.path()),
        Err(ConfigError::Json(_))
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = TactileConfig::from_toml_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
    assert!(err.to_string().starts_with("I/O error"));
}
