mod support;

use std::fs;
use std::time::Duration;

use mediguard::error::{ConfigError, Error};
use mediguard::infrastructure::config::Config;
use mediguard::infrastructure::orchestration::load_directory;

use support::{write_temp_config, write_temp_reference};

#[test]
fn config_file_sections_are_applied() {
    let reference = write_temp_reference();
    let toml = format!(
        r#"
[service]
base_url = "https://guard.example.org"
push_path = "/alerts/ws"

[reconnection]
initial_delay_ms = 500
max_delay_ms = 8000
backoff_multiplier = 2.0

[stream]
enabled = false
seconds = 60
interval_secs = 0.5

[reference]
path = "{}"
"#,
        reference.display()
    );

    let path = write_temp_config(&toml);
    let result = Config::load(&path);
    let _ = fs::remove_file(&path);
    let config = result.expect("valid config");

    let endpoints = config.endpoints();
    assert_eq!(endpoints.push_url().as_str(), "wss://guard.example.org/alerts/ws");
    let mut backoff = config.reconnection.backoff();
    assert_eq!(backoff.next_delay(), Duration::from_millis(500));
    assert_eq!(backoff.next_delay(), Duration::from_millis(1_000));
    assert!(!config.stream.enabled);

    let directory = load_directory(&config);
    let _ = fs::remove_file(&reference);
    assert_eq!(directory.len(), 4);
    assert_eq!(directory.high_risk().count(), 2);
}

#[test]
fn config_rejects_shrinking_backoff() {
    let path = write_temp_config("[reconnection]\nbackoff_multiplier = 0.5\n");
    let result = Config::load(&path);
    let _ = fs::remove_file(&path);

    match result {
        Err(Error::Config(ConfigError::InvalidValue {
            field: "backoff_multiplier",
            ..
        })) => {}
        Err(err) => panic!("Expected invalid multiplier error, got {err}"),
        Ok(_) => panic!("Expected invalid multiplier error, got Ok"),
    }
}

#[test]
fn config_rejects_out_of_range_stream() {
    let path = write_temp_config("[stream]\nseconds = 2\n");
    let result = Config::load(&path);
    let _ = fs::remove_file(&path);

    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidValue {
            field: "stream.seconds",
            ..
        }))
    ));
}

#[test]
fn config_reports_malformed_toml() {
    let path = write_temp_config("[service\nbase_url = ");
    let result = Config::load(&path);
    let _ = fs::remove_file(&path);

    assert!(matches!(result, Err(Error::Config(ConfigError::Parse(_)))));
}

#[test]
fn unparseable_base_address_falls_back_to_default() {
    let path = write_temp_config("[service]\nbase_url = \"ftp://files.example.org\"\n");
    let result = Config::load(&path);
    let _ = fs::remove_file(&path);
    let config = result.expect("invalid base addresses are not fatal");

    assert_eq!(config.endpoints().http_base().as_str(), "http://127.0.0.1:8000/");
}
