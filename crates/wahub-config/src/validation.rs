// SPDX-FileCopyrightText: 2026 Wahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as non-empty paths and sane limits.

use crate::error::ConfigError;
use crate::model::WahubConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)`
/// with all collected validation errors (does not fail fast).
pub fn validate_config(config: &WahubConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.hub.name.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "hub.name must not be empty".to_string(),
        });
    }

    if !LOG_LEVELS.contains(&config.hub.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "hub.log_level `{}` is not one of trace, debug, info, warn, error",
                config.hub.log_level
            ),
        });
    }

    if config.storage.data_dir.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.data_dir must not be empty".to_string(),
        });
    }

    if config.session.max_tenants == 0 {
        errors.push(ConfigError::Validation {
            message: "session.max_tenants must be at least 1".to_string(),
        });
    }

    if config.session.shutdown_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "session.shutdown_timeout_secs must be at least 1".to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&WahubConfig::default()).is_ok());
    }

    #[test]
    fn all_violations_are_collected() {
        let mut config = WahubConfig::default();
        config.hub.name = "  ".into();
        config.hub.log_level = "loud".into();
        config.session.max_tenants = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
