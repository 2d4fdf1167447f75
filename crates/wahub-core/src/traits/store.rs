// SPDX-FileCopyrightText: 2026 Wahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record store trait for per-tenant settings and counters.

use async_trait::async_trait;

use crate::error::WahubError;
use crate::types::{TenantId, TenantSettings, TenantStats};

/// External store for per-tenant settings and telemetry counters.
///
/// Writes triggered by session transitions are best-effort: a failure is
/// logged and never blocks the in-memory state change.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Records whether the tenant's bot is currently connected.
    async fn set_bot_connected(&self, tenant: &TenantId, connected: bool)
        -> Result<(), WahubError>;

    /// Reads the tenant's settings document, defaulting when absent.
    async fn get_settings(&self, tenant: &TenantId) -> Result<TenantSettings, WahubError>;

    /// Replaces the tenant's settings document.
    async fn update_settings(
        &self,
        tenant: &TenantId,
        settings: &TenantSettings,
    ) -> Result<(), WahubError>;

    async fn increment_message_count(&self, tenant: &TenantId) -> Result<(), WahubError>;

    async fn increment_command_count(&self, tenant: &TenantId) -> Result<(), WahubError>;

    /// Reads the tenant's counters, defaulting when absent.
    async fn get_stats(&self, tenant: &TenantId) -> Result<TenantStats, WahubError>;
}
