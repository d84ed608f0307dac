mod support;

use haiti_dash::config::{ConfigError, DashboardConfig};
use haiti_dash::io::DataSource;
use std::io::Write;
use std::path::PathBuf;
use support::with_scoped_env;

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("Failed to create temp config");
    file.write_all(content.as_bytes()).unwrap();
    file
}

const CONFIG: &str = r#"
[server]
host = "127.0.0.1"
port = 9100

[data]
path = "/srv/presence.json"
"#;

#[test]
fn test_load_from_explicit_config_path() {
    let file = write_config(CONFIG);
    let path = file.path().to_str().unwrap().to_string();

    let config = with_scoped_env(
        &[
            ("DASHBOARD_CONFIG", Some(path.as_str())),
            ("DASHBOARD_DATA_PATH", None),
            ("DASHBOARD_DATA_FORMAT", None),
            ("HOST", None),
            ("PORT", None),
        ],
        DashboardConfig::load,
    )
    .unwrap();

    assert_eq!(config.bind_address(), "127.0.0.1:9100");
    assert_eq!(config.data.path, PathBuf::from("/srv/presence.json"));
}

#[test]
fn test_env_overrides_win_over_file() {
    let file = write_config(CONFIG);
    let path = file.path().to_str().unwrap().to_string();

    let config = with_scoped_env(
        &[
            ("DASHBOARD_CONFIG", Some(path.as_str())),
            ("DASHBOARD_DATA_PATH", Some("/tmp/extract.txt")),
            ("DASHBOARD_DATA_FORMAT", Some("csv")),
            ("HOST", Some("0.0.0.0")),
            ("PORT", Some("8181")),
        ],
        DashboardConfig::load,
    )
    .unwrap();

    assert_eq!(config.bind_address(), "0.0.0.0:8181");
    assert_eq!(config.data.format.as_deref(), Some("csv"));
    assert_eq!(config.data_source().unwrap().source_id(), "/tmp/extract.txt");
}

#[test]
fn test_invalid_port_is_reported() {
    let mut config = DashboardConfig::default();
    let result = with_scoped_env(&[("PORT", Some("eighty"))], || config.apply_env_overrides());

    match result {
        Err(ConfigError::InvalidValue { key, value, .. }) => {
            assert_eq!(key, "PORT");
            assert_eq!(value, "eighty");
        }
        other => panic!("expected InvalidValue, got {:?}", other),
    }
}

#[test]
fn test_malformed_config_file() {
    let file = write_config("[server\nport = ");
    let err = DashboardConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}
