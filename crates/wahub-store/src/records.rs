// SPDX-FileCopyrightText: 2026 Wahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Flat-file implementation of the [`RecordStore`] trait.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use wahub_core::error::WahubError;
use wahub_core::traits::RecordStore;
use wahub_core::types::{TenantId, TenantSettings, TenantStats};

use crate::{read_json, tenant_dir, write_json};

/// JSON-on-disk record store, one document set per tenant.
///
/// A single async mutex serializes read-modify-write cycles (counter
/// increments, connected-flag updates) against concurrent status queries.
/// Throughput is not a concern here; these are low-rate control-plane
/// writes.
pub struct JsonRecordStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonRecordStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn settings_path(&self, tenant: &TenantId) -> Result<PathBuf, WahubError> {
        Ok(tenant_dir(&self.root, tenant)?.join("settings.json"))
    }

    fn stats_path(&self, tenant: &TenantId) -> Result<PathBuf, WahubError> {
        Ok(tenant_dir(&self.root, tenant)?.join("stats.json"))
    }

    async fn mutate_stats<F>(&self, tenant: &TenantId, f: F) -> Result<(), WahubError>
    where
        F: FnOnce(&mut TenantStats),
    {
        let _guard = self.write_lock.lock().await;
        let path = self.stats_path(tenant)?;
        let mut stats: TenantStats = read_json(&path).await?.unwrap_or_default();
        f(&mut stats);
        write_json(&path, &stats).await
    }
}

#[async_trait]
impl RecordStore for JsonRecordStore {
    async fn set_bot_connected(
        &self,
        tenant: &TenantId,
        connected: bool,
    ) -> Result<(), WahubError> {
        self.mutate_stats(tenant, |stats| {
            stats.bot_connected = connected;
            if connected {
                stats.last_connected_at = Some(chrono::Utc::now().to_rfc3339());
            }
        })
        .await?;
        debug!(tenant = %tenant, connected, "bot connected flag persisted");
        Ok(())
    }

    async fn get_settings(&self, tenant: &TenantId) -> Result<TenantSettings, WahubError> {
        let path = self.settings_path(tenant)?;
        Ok(read_json(&path).await?.unwrap_or_default())
    }

    async fn update_settings(
        &self,
        tenant: &TenantId,
        settings: &TenantSettings,
    ) -> Result<(), WahubError> {
        let _guard = self.write_lock.lock().await;
        let path = self.settings_path(tenant)?;
        write_json(&path, settings).await
    }

    async fn increment_message_count(&self, tenant: &TenantId) -> Result<(), WahubError> {
        self.mutate_stats(tenant, |stats| stats.messages += 1).await
    }

    async fn increment_command_count(&self, tenant: &TenantId) -> Result<(), WahubError> {
        self.mutate_stats(tenant, |stats| stats.commands += 1).await
    }

    async fn get_stats(&self, tenant: &TenantId) -> Result<TenantStats, WahubError> {
        let path = self.stats_path(tenant)?;
        Ok(read_json(&path).await?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tenant(s: &str) -> TenantId {
        TenantId::from(s)
    }

    #[tokio::test]
    async fn missing_documents_yield_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonRecordStore::new(dir.path());

        let settings = store.get_settings(&tenant("t1")).await.unwrap();
        assert_eq!(settings.prefix, ".");

        let stats = store.get_stats(&tenant("t1")).await.unwrap();
        assert_eq!(stats.messages, 0);
        assert!(!stats.bot_connected);
    }

    #[tokio::test]
    async fn counters_accumulate() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonRecordStore::new(dir.path());
        let t = tenant("t1");

        store.increment_message_count(&t).await.unwrap();
        store.increment_message_count(&t).await.unwrap();
        store.increment_command_count(&t).await.unwrap();

        let stats = store.get_stats(&t).await.unwrap();
        assert_eq!(stats.messages, 2);
        assert_eq!(stats.commands, 1);
    }

    #[tokio::test]
    async fn connected_flag_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonRecordStore::new(dir.path());
        let t = tenant("t1");

        store.set_bot_connected(&t, true).await.unwrap();
        let stats = store.get_stats(&t).await.unwrap();
        assert!(stats.bot_connected);
        assert!(stats.last_connected_at.is_some());

        store.set_bot_connected(&t, false).await.unwrap();
        let stats = store.get_stats(&t).await.unwrap();
        assert!(!stats.bot_connected);
    }

    #[tokio::test]
    async fn settings_update_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonRecordStore::new(dir.path());
        let t = tenant("t1");

        let mut settings = store.get_settings(&t).await.unwrap();
        settings.prefix = "!".into();
        settings.disabled_commands.insert("ping".into());
        store.update_settings(&t, &settings).await.unwrap();

        let back = store.get_settings(&t).await.unwrap();
        assert_eq!(back.prefix, "!");
        assert!(back.is_disabled("ping"));
    }

    #[tokio::test]
    async fn tenants_are_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonRecordStore::new(dir.path());

        store.increment_message_count(&tenant("a")).await.unwrap();
        let stats_b = store.get_stats(&tenant("b")).await.unwrap();
        assert_eq!(stats_b.messages, 0);
    }
}
