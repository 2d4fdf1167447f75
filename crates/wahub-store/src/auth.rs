// SPDX-FileCopyrightText: 2026 Wahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! File-backed implementation of the [`AuthStateStore`] trait.
//!
//! Credential material lives at `data_dir/<tenant>/auth/creds.json` and is
//! rewritten verbatim on every credential-update event from the protocol
//! library.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use wahub_core::error::WahubError;
use wahub_core::traits::AuthStateStore;
use wahub_core::types::TenantId;
use wahub_core::wire::AuthState;

use crate::{read_json, tenant_dir, write_json};

/// Per-tenant credential storage on the local filesystem.
pub struct FileAuthStore {
    root: PathBuf,
}

impl FileAuthStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn creds_path(&self, tenant: &TenantId) -> Result<PathBuf, WahubError> {
        Ok(tenant_dir(&self.root, tenant)?.join("auth").join("creds.json"))
    }
}

#[async_trait]
impl AuthStateStore for FileAuthStore {
    async fn load(&self, tenant: &TenantId) -> Result<AuthState, WahubError> {
        let path = self.creds_path(tenant)?;
        match read_json(&path).await? {
            Some(state) => Ok(state),
            None => {
                debug!(tenant = %tenant, "no stored credentials, starting unregistered");
                Ok(AuthState::default())
            }
        }
    }

    async fn save(&self, tenant: &TenantId, state: &AuthState) -> Result<(), WahubError> {
        let path = self.creds_path(tenant)?;
        write_json(&path, state).await
    }

    async fn clear(&self, tenant: &TenantId) -> Result<(), WahubError> {
        let dir = tenant_dir(&self.root, tenant)?.join("auth");
        match tokio::fs::remove_dir_all(&dir).await {
            Ok(()) => {
                debug!(tenant = %tenant, "auth material cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(WahubError::Persistence { source: e.into() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tenant(s: &str) -> TenantId {
        TenantId::from(s)
    }

    #[tokio::test]
    async fn load_missing_returns_unregistered_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileAuthStore::new(dir.path());
        let state = store.load(&tenant("t1")).await.unwrap();
        assert!(!state.registered);
        assert!(state.creds.is_null());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileAuthStore::new(dir.path());
        let t = tenant("t1");

        let state = AuthState {
            registered: true,
            creds: serde_json::json!({"noise_key": "abc", "me": {"id": "1@s.whatsapp.net"}}),
        };
        store.save(&t, &state).await.unwrap();

        let back = store.load(&t).await.unwrap();
        assert!(back.registered);
        assert_eq!(back.creds["noise_key"], "abc");
    }

    #[tokio::test]
    async fn clear_removes_material_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileAuthStore::new(dir.path());
        let t = tenant("t1");

        store
            .save(
                &t,
                &AuthState {
                    registered: true,
                    creds: serde_json::json!({}),
                },
            )
            .await
            .unwrap();

        store.clear(&t).await.unwrap();
        let state = store.load(&t).await.unwrap();
        assert!(!state.registered);

        // Clearing again is a no-op.
        store.clear(&t).await.unwrap();
    }
}
