// SPDX-FileCopyrightText: 2026 Wahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Wahub control plane.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Wahub configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WahubConfig {
    /// Hub identity and logging settings.
    #[serde(default)]
    pub hub: HubConfig,

    /// Data directory layout for per-tenant documents.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Session lifecycle settings.
    #[serde(default)]
    pub session: SessionConfig,
}

/// Hub identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HubConfig {
    /// Display name of this hub instance.
    #[serde(default = "default_hub_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            name: default_hub_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_hub_name() -> String {
    "wahub".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage layout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Root directory holding one subdirectory per tenant (settings,
    /// stats, and auth credential documents).
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> String {
    dirs::data_dir()
        .map(|p| p.join("wahub").display().to_string())
        .unwrap_or_else(|| "./wahub-data".to_string())
}

/// Session lifecycle configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Maximum number of tenants allowed to hold sessions at once.
    #[serde(default = "default_max_tenants")]
    pub max_tenants: usize,

    /// Bound on graceful shutdown, in seconds.
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_tenants: default_max_tenants(),
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
        }
    }
}

fn default_max_tenants() -> usize {
    50
}

fn default_shutdown_timeout_secs() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = WahubConfig::default();
        assert_eq!(config.hub.name, "wahub");
        assert_eq!(config.hub.log_level, "info");
        assert_eq!(config.session.max_tenants, 50);
        assert!(!config.storage.data_dir.is_empty());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: Result<WahubConfig, _> =
            toml::from_str("[hub]\nname = \"x\"\nbogus_key = true\n");
        assert!(result.is_err());
    }
}
