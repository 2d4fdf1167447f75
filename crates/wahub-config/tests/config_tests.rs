// SPDX-FileCopyrightText: 2026 Wahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Wahub configuration system.

use wahub_config::error::ConfigError;
use wahub_config::{load_and_validate_str, load_config_from_path, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_wahub_config() {
    let toml = r#"
[hub]
name = "test-hub"
log_level = "debug"

[storage]
data_dir = "/tmp/wahub-test"

[session]
max_tenants = 5
shutdown_timeout_secs = 3
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.hub.name, "test-hub");
    assert_eq!(config.hub.log_level, "debug");
    assert_eq!(config.storage.data_dir, "/tmp/wahub-test");
    assert_eq!(config.session.max_tenants, 5);
    assert_eq!(config.session.shutdown_timeout_secs, 3);
}

/// Omitted sections fall back to compiled defaults.
#[test]
fn partial_toml_keeps_defaults_elsewhere() {
    let config = load_config_from_str("[hub]\nlog_level = \"warn\"\n").unwrap();
    assert_eq!(config.hub.log_level, "warn");
    assert_eq!(config.hub.name, "wahub");
    assert_eq!(config.session.max_tenants, 50);
}

/// Unknown keys are rejected rather than silently ignored.
#[test]
fn unknown_field_produces_parse_error() {
    let result = load_config_from_str("[session]\nmax_tenant = 5\n");
    assert!(result.is_err());
}

/// Validation failures surface as typed errors through the high-level
/// entry point.
#[test]
fn semantic_violations_surface_as_validation_errors() {
    let errors = load_and_validate_str("[session]\nmax_tenants = 0\n").unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], ConfigError::Validation { .. }));
    assert!(errors[0].to_string().contains("max_tenants"));
}

#[test]
fn invalid_log_level_is_rejected() {
    let errors = load_and_validate_str("[hub]\nlog_level = \"loud\"\n").unwrap_err();
    assert!(errors[0].to_string().contains("log_level"));
}

/// Loading from an explicit path picks up the file's values.
#[test]
fn explicit_path_loads_that_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wahub.toml");
    std::fs::write(&path, "[hub]\nname = \"from-file\"\n").unwrap();

    let config = load_config_from_path(&path).unwrap();
    assert_eq!(config.hub.name, "from-file");
}
