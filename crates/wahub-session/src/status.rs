// SPDX-FileCopyrightText: 2026 Wahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Point-in-time session status snapshots.

use serde::Serialize;
use sysinfo::{ProcessesToUpdate, System, get_current_pid};

use wahub_core::types::{ConnectionState, TenantStats};

/// Snapshot of one tenant's session, assembled on demand.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub state: ConnectionState,
    /// Seconds since the current connection opened, when connected.
    pub uptime_secs: Option<u64>,
    pub reconnect_attempts: u32,
    pub stats: TenantStats,
    /// Resident memory of the hub process, best-effort.
    pub process_memory_bytes: Option<u64>,
}

/// Resident set size of this process, if the platform reports it.
pub fn process_memory_bytes() -> Option<u64> {
    let pid = get_current_pid().ok()?;
    let mut sys = System::new();
    sys.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
    sys.process(pid).map(|p| p.memory())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn own_process_memory_is_reported() {
        // Any Linux/macOS CI box reports a nonzero RSS for itself.
        let bytes = process_memory_bytes();
        assert!(bytes.is_some_and(|b| b > 0));
    }

    #[test]
    fn status_serializes_for_the_api_surface() {
        let status = SessionStatus {
            state: ConnectionState::Connected,
            uptime_secs: Some(42),
            reconnect_attempts: 1,
            stats: TenantStats::default(),
            process_memory_bytes: Some(1024),
        };
        let json = serde_json::to_string(&status).unwrap();
        assert!(json.contains(r#""state":"connected""#));
        assert!(json.contains(r#""uptime_secs":42"#));
    }
}
