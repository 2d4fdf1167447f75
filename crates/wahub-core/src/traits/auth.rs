// SPDX-FileCopyrightText: 2026 Wahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Auth state store trait for per-tenant durable credential material.

use async_trait::async_trait;

use crate::error::WahubError;
use crate::types::TenantId;
use crate::wire::AuthState;

/// Durable storage for a tenant's cryptographic session identity.
///
/// Loaded at connect time, saved on every credential-update event, and
/// cleared on logout.
#[async_trait]
pub trait AuthStateStore: Send + Sync {
    /// Loads the tenant's credential material, or a fresh unregistered
    /// state if none exists yet.
    async fn load(&self, tenant: &TenantId) -> Result<AuthState, WahubError>;

    /// Persists updated credential material.
    async fn save(&self, tenant: &TenantId, state: &AuthState) -> Result<(), WahubError>;

    /// Removes all stored credential material for the tenant.
    async fn clear(&self, tenant: &TenantId) -> Result<(), WahubError>;
}
