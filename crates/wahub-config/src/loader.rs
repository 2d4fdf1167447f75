// SPDX-FileCopyrightText: 2026 Wahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./wahub.toml` > `~/.config/wahub/wahub.toml` >
//! `/etc/wahub/wahub.toml` with environment variable overrides via the
//! `WAHUB_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::WahubConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/wahub/wahub.toml` (system-wide)
/// 3. `~/.config/wahub/wahub.toml` (user XDG config)
/// 4. `./wahub.toml` (local directory)
/// 5. `WAHUB_*` environment variables
pub fn load_config() -> Result<WahubConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(WahubConfig::default()))
        .merge(Toml::file("/etc/wahub/wahub.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("wahub/wahub.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("wahub.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config input.
pub fn load_config_from_str(toml_content: &str) -> Result<WahubConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(WahubConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<WahubConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(WahubConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `WAHUB_SESSION_MAX_TENANTS` must map to
/// `session.max_tenants`, not `session.max.tenants`.
fn env_provider() -> Env {
    Env::prefixed("WAHUB_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("hub_", "hub.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("session_", "session.", 1);
        mapped.into()
    })
}
