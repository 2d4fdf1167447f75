// SPDX-FileCopyrightText: 2026 Wahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Flat-file JSON persistence for the Wahub session control plane.
//!
//! One directory per tenant under the configured data directory:
//!
//! ```text
//! data_dir/
//!   <tenant>/
//!     settings.json     per-tenant behavior settings
//!     stats.json        message/command counters, connected flag
//!     auth/creds.json   protocol credential material
//! ```
//!
//! Reads of missing files yield defaults; writes go through a temp file
//! rename so a crash never leaves a half-written document.

pub mod auth;
pub mod records;

pub use auth::FileAuthStore;
pub use records::JsonRecordStore;

use std::path::{Path, PathBuf};

use wahub_core::error::WahubError;
use wahub_core::types::TenantId;

/// Resolves the per-tenant directory, rejecting tenant ids that could
/// escape the data directory.
fn tenant_dir(root: &Path, tenant: &TenantId) -> Result<PathBuf, WahubError> {
    let id = tenant.as_str();
    if id.is_empty()
        || id.contains('/')
        || id.contains('\\')
        || id.contains("..")
    {
        return Err(WahubError::Internal(format!(
            "tenant id {id:?} is not a valid storage key"
        )));
    }
    Ok(root.join(id))
}

/// Serializes `value` to `path` atomically (write temp, rename).
async fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), WahubError> {
    let parent = path
        .parent()
        .ok_or_else(|| WahubError::Internal(format!("no parent for {}", path.display())))?;
    tokio::fs::create_dir_all(parent)
        .await
        .map_err(|e| WahubError::Persistence { source: e.into() })?;

    let bytes = serde_json::to_vec_pretty(value)
        .map_err(|e| WahubError::Persistence { source: e.into() })?;

    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, &bytes)
        .await
        .map_err(|e| WahubError::Persistence { source: e.into() })?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| WahubError::Persistence { source: e.into() })?;
    Ok(())
}

/// Deserializes `path`, returning `None` when the file does not exist.
async fn read_json<T: serde::de::DeserializeOwned>(
    path: &Path,
) -> Result<Option<T>, WahubError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => {
            let value = serde_json::from_slice(&bytes)
                .map_err(|e| WahubError::Persistence { source: e.into() })?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(WahubError::Persistence { source: e.into() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tenant_dir_rejects_traversal() {
        let root = Path::new("/data");
        assert!(tenant_dir(root, &TenantId::from("ok-tenant")).is_ok());
        assert!(tenant_dir(root, &TenantId::from("../escape")).is_err());
        assert!(tenant_dir(root, &TenantId::from("a/b")).is_err());
        assert!(tenant_dir(root, &TenantId::from("")).is_err());
    }

    #[tokio::test]
    async fn read_json_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let got: Option<serde_json::Value> = read_json(&path).await.unwrap();
        assert!(got.is_none());
    }

    #[tokio::test]
    async fn write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/doc.json");
        let value = serde_json::json!({"a": 1, "b": "two"});
        write_json(&path, &value).await.unwrap();
        let got: Option<serde_json::Value> = read_json(&path).await.unwrap();
        assert_eq!(got, Some(value));
    }
}
