// SPDX-FileCopyrightText: 2026 Wahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `wahub doctor` command implementation.
//!
//! Runs diagnostic checks against the Wahub environment to identify
//! data-directory problems and corrupt tenant documents.

use std::path::Path;
use std::time::{Duration, Instant};

use wahub_config::model::WahubConfig;
use wahub_core::error::WahubError;
use wahub_core::types::{TenantSettings, TenantStats};

use crate::status::list_tenants;

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    /// Check passed successfully.
    Pass,
    /// Check passed with a warning.
    Warn,
    /// Check failed.
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

/// Run the `wahub doctor` command.
pub async fn run_doctor(config: &WahubConfig) -> Result<(), WahubError> {
    let data_dir = Path::new(&config.storage.data_dir);
    let results = vec![
        check_data_dir(data_dir),
        check_tenant_documents(data_dir),
        check_process_memory(),
    ];

    println!();
    println!("  wahub doctor");
    println!("  {}", "-".repeat(50));

    let mut issues = 0;
    for result in &results {
        let duration_ms = result.duration.as_millis();
        let tag = match result.status {
            CheckStatus::Pass => "[OK]  ",
            CheckStatus::Warn => {
                issues += 1;
                "[WARN]"
            }
            CheckStatus::Fail => {
                issues += 1;
                "[FAIL]"
            }
        };
        println!(
            "    {tag} {:<20} {} ({duration_ms}ms)",
            result.name, result.message
        );
    }

    println!();
    if issues > 0 {
        let issue_word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {issue_word} found.");
    } else {
        println!("  All checks passed.");
    }
    println!();
    Ok(())
}

/// The data directory exists (or can be created) and is writable.
fn check_data_dir(data_dir: &Path) -> CheckResult {
    let start = Instant::now();
    let name = "data directory".to_string();

    if let Err(e) = std::fs::create_dir_all(data_dir) {
        return CheckResult {
            name,
            status: CheckStatus::Fail,
            message: format!("cannot create {}: {e}", data_dir.display()),
            duration: start.elapsed(),
        };
    }

    let probe = data_dir.join(".wahub-doctor-probe");
    let (status, message) = match std::fs::write(&probe, b"probe") {
        Ok(()) => {
            let _ = std::fs::remove_file(&probe);
            (CheckStatus::Pass, format!("{} writable", data_dir.display()))
        }
        Err(e) => (
            CheckStatus::Fail,
            format!("{} not writable: {e}", data_dir.display()),
        ),
    };
    CheckResult {
        name,
        status,
        message,
        duration: start.elapsed(),
    }
}

/// Every tenant's settings and stats documents parse.
fn check_tenant_documents(data_dir: &Path) -> CheckResult {
    let start = Instant::now();
    let name = "tenant documents".to_string();
    let tenants = list_tenants(data_dir);
    let mut corrupt = Vec::new();

    for tenant in &tenants {
        let dir = data_dir.join(tenant);
        for (file, ok) in [
            ("settings.json", parses_as::<TenantSettings>(&dir.join("settings.json"))),
            ("stats.json", parses_as::<TenantStats>(&dir.join("stats.json"))),
        ] {
            if !ok {
                corrupt.push(format!("{tenant}/{file}"));
            }
        }
    }

    let (status, message) = if corrupt.is_empty() {
        (
            CheckStatus::Pass,
            format!("{} tenant(s), all documents parse", tenants.len()),
        )
    } else {
        (
            CheckStatus::Warn,
            format!("corrupt documents: {}", corrupt.join(", ")),
        )
    };
    CheckResult {
        name,
        status,
        message,
        duration: start.elapsed(),
    }
}

/// A missing document is fine (defaults apply); present but unparseable
/// is what doctor flags.
fn parses_as<T: serde::de::DeserializeOwned>(path: &Path) -> bool {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str::<T>(&content).is_ok(),
        Err(_) => true,
    }
}

/// The platform reports this process's resident memory.
fn check_process_memory() -> CheckResult {
    let start = Instant::now();
    let name = "process memory".to_string();
    let (status, message) = match wahub_session::status::process_memory_bytes() {
        Some(bytes) => (
            CheckStatus::Pass,
            format!("rss {} MiB", bytes / (1024 * 1024)),
        ),
        None => (
            CheckStatus::Warn,
            "platform does not report process memory".to_string(),
        ),
    };
    CheckResult {
        name,
        status,
        message,
        duration: start.elapsed(),
    }
}
