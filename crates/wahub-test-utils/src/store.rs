// SPDX-FileCopyrightText: 2026 Wahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory record and auth stores.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use wahub_core::error::WahubError;
use wahub_core::traits::{AuthStateStore, RecordStore};
use wahub_core::types::{TenantId, TenantSettings, TenantStats};
use wahub_core::wire::AuthState;

/// [`RecordStore`] backed by process memory.
#[derive(Default)]
pub struct MemoryRecordStore {
    settings: Mutex<HashMap<TenantId, TenantSettings>>,
    stats: Mutex<HashMap<TenantId, TenantStats>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds settings for a tenant before the test runs.
    pub fn seed_settings(&self, tenant: &TenantId, settings: TenantSettings) {
        self.settings
            .lock()
            .unwrap()
            .insert(tenant.clone(), settings);
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn set_bot_connected(
        &self,
        tenant: &TenantId,
        connected: bool,
    ) -> Result<(), WahubError> {
        let mut stats = self.stats.lock().unwrap();
        stats.entry(tenant.clone()).or_default().bot_connected = connected;
        Ok(())
    }

    async fn get_settings(&self, tenant: &TenantId) -> Result<TenantSettings, WahubError> {
        Ok(self
            .settings
            .lock()
            .unwrap()
            .get(tenant)
            .cloned()
            .unwrap_or_default())
    }

    async fn update_settings(
        &self,
        tenant: &TenantId,
        settings: &TenantSettings,
    ) -> Result<(), WahubError> {
        self.settings
            .lock()
            .unwrap()
            .insert(tenant.clone(), settings.clone());
        Ok(())
    }

    async fn increment_message_count(&self, tenant: &TenantId) -> Result<(), WahubError> {
        self.stats.lock().unwrap().entry(tenant.clone()).or_default().messages += 1;
        Ok(())
    }

    async fn increment_command_count(&self, tenant: &TenantId) -> Result<(), WahubError> {
        self.stats.lock().unwrap().entry(tenant.clone()).or_default().commands += 1;
        Ok(())
    }

    async fn get_stats(&self, tenant: &TenantId) -> Result<TenantStats, WahubError> {
        Ok(self
            .stats
            .lock()
            .unwrap()
            .get(tenant)
            .cloned()
            .unwrap_or_default())
    }
}

/// [`AuthStateStore`] backed by process memory.
#[derive(Default)]
pub struct MemoryAuthStore {
    states: Mutex<HashMap<TenantId, AuthState>>,
    pub save_count: Mutex<usize>,
    pub clear_count: Mutex<usize>,
}

impl MemoryAuthStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds registered credentials so a session skips the QR flow.
    pub fn seed_registered(&self, tenant: &TenantId) {
        self.states.lock().unwrap().insert(
            tenant.clone(),
            AuthState {
                registered: true,
                creds: serde_json::json!({"seeded": true}),
            },
        );
    }
}

#[async_trait]
impl AuthStateStore for MemoryAuthStore {
    async fn load(&self, tenant: &TenantId) -> Result<AuthState, WahubError> {
        Ok(self
            .states
            .lock()
            .unwrap()
            .get(tenant)
            .cloned()
            .unwrap_or_default())
    }

    async fn save(&self, tenant: &TenantId, state: &AuthState) -> Result<(), WahubError> {
        self.states
            .lock()
            .unwrap()
            .insert(tenant.clone(), state.clone());
        *self.save_count.lock().unwrap() += 1;
        Ok(())
    }

    async fn clear(&self, tenant: &TenantId) -> Result<(), WahubError> {
        self.states.lock().unwrap().remove(tenant);
        *self.clear_count.lock().unwrap() += 1;
        Ok(())
    }
}
