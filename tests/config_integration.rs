//! Integration tests for configuration management
//!
//! These tests load configuration from TOML files and the environment and
//! check that the result drives the TCP transport.

use rdcmd::config::{Config, LogFormat, CONFIG_PATH_ENV};
use rdcmd::{RdCmdError, TcpTransport};
use std::collections::HashMap;
use std::env;
use std::sync::Mutex;
use tempfile::TempDir;

// Global mutex to ensure all config-related tests run serially
// This prevents environment variable pollution between tests
static GLOBAL_CONFIG_TEST_LOCK: Mutex<()> = Mutex::new(());

/// Remove all RDCMD_ environment variables and return them for restoration
fn clean_rdcmd_env() -> HashMap<String, String> {
    let original: HashMap<String, String> = env::vars()
        .filter(|(key, _)| key.starts_with("RDCMD_"))
        .collect();
    for key in original.keys() {
        env::remove_var(key);
    }
    original
}

fn restore_env(original_values: HashMap<String, String>) {
    for (key, _) in env::vars() {
        if key.starts_with("RDCMD_") {
            env::remove_var(&key);
        }
    }
    for (key, value) in original_values {
        env::set_var(key, value);
    }
}

const SAMPLE: &str = r#"
[client]
address = "10.1.2.3:6390"
connect_timeout = 2
read_timeout = 4

[logging]
level = "debug"
format = "Compact"
"#;

#[test]
fn test_load_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("rdcmd.toml");
    std::fs::write(&path, SAMPLE).unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.client.address, "10.1.2.3:6390");
    assert_eq!(config.client.connect_timeout, 2);
    assert_eq!(config.client.read_timeout, 4);
    assert_eq!(config.client.write_timeout, 30);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, LogFormat::Compact);
    assert!(config.validate().is_ok());

    let transport = TcpTransport::from_config(config.client);
    assert_eq!(transport.address(), "10.1.2.3:6390");
}

#[test]
fn test_missing_and_malformed_files() {
    let temp_dir = TempDir::new().unwrap();

    let missing = Config::from_file(temp_dir.path().join("absent.toml"));
    assert!(matches!(missing, Err(RdCmdError::ConfigError { .. })));

    let path = temp_dir.path().join("broken.toml");
    std::fs::write(&path, "[client\naddress = ").unwrap();
    assert!(matches!(
        Config::from_file(&path),
        Err(RdCmdError::ConfigError { .. })
    ));
}

#[test]
fn test_load_uses_config_env_and_overrides() {
    let _guard = GLOBAL_CONFIG_TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let original_env = clean_rdcmd_env();

    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("rdcmd.toml");
    std::fs::write(&path, SAMPLE).unwrap();

    env::set_var(CONFIG_PATH_ENV, &path);
    env::set_var("RDCMD_WRITE_TIMEOUT", "9");
    env::set_var("RDCMD_LOG_LEVEL", "warn");
    let config = Config::load();

    restore_env(original_env);

    let config = config.unwrap();
    assert_eq!(config.client.address, "10.1.2.3:6390");
    assert_eq!(config.client.write_timeout, 9);
    assert_eq!(config.logging.level, "warn");
}

#[test]
fn test_load_rejects_invalid_result() {
    let _guard = GLOBAL_CONFIG_TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let original_env = clean_rdcmd_env();

    env::set_var("RDCMD_LOG_LEVEL", "verbose");
    let result = Config::load();

    restore_env(original_env);

    assert!(matches!(
        result,
        Err(RdCmdError::ConfigError { field: Some(ref f), .. }) if f == "logging.level"
    ));
}
