// SPDX-FileCopyrightText: 2026 Wahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `wahub status` command implementation.
//!
//! Reads per-tenant counters and settings straight from the data
//! directory, so it works whether or not a hub process is running.

use std::path::Path;

use serde::Serialize;

use wahub_config::model::WahubConfig;
use wahub_core::error::WahubError;
use wahub_core::traits::RecordStore;
use wahub_core::types::TenantId;
use wahub_store::JsonRecordStore;

/// One tenant's row in the status output.
#[derive(Debug, Serialize)]
pub struct TenantStatusRow {
    pub tenant: String,
    pub connected: bool,
    pub messages: u64,
    pub commands: u64,
    pub last_connected_at: Option<String>,
    pub prefix: String,
}

/// Run the `wahub status` command.
///
/// With `--tenant`, shows that tenant only; otherwise every tenant found
/// in the data directory. `--json` emits structured output for scripting.
pub async fn run_status(
    config: &WahubConfig,
    tenant: Option<&str>,
    json: bool,
) -> Result<(), WahubError> {
    let data_dir = Path::new(&config.storage.data_dir);
    let store = JsonRecordStore::new(data_dir);

    let tenants = match tenant {
        Some(t) => vec![t.to_string()],
        None => list_tenants(data_dir),
    };

    let mut rows = Vec::with_capacity(tenants.len());
    for name in tenants {
        let id = TenantId::from(name.as_str());
        let stats = store.get_stats(&id).await?;
        let settings = store.get_settings(&id).await?;
        rows.push(TenantStatusRow {
            tenant: name,
            connected: stats.bot_connected,
            messages: stats.messages,
            commands: stats.commands,
            last_connected_at: stats.last_connected_at,
            prefix: settings.prefix,
        });
    }

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&rows).unwrap_or_else(|_| "[]".to_string())
        );
        return Ok(());
    }

    println!();
    println!("  wahub status");
    println!("  {}", "-".repeat(50));
    if rows.is_empty() {
        println!("    no tenants found in {}", data_dir.display());
    }
    for row in &rows {
        let state = if row.connected { "connected" } else { "offline" };
        println!(
            "    {:<16} {:<10} messages={} commands={} last={}",
            row.tenant,
            state,
            row.messages,
            row.commands,
            row.last_connected_at.as_deref().unwrap_or("never"),
        );
    }
    println!();
    Ok(())
}

/// Tenant directories under the data root, sorted by name.
pub fn list_tenants(data_dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(data_dir) else {
        return Vec::new();
    };
    let mut tenants: Vec<String> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .filter_map(|e| e.file_name().into_string().ok())
        .collect();
    tenants.sort();
    tenants
}
