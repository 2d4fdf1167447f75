// SPDX-FileCopyrightText: 2026 Wahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-tenant session bookkeeping: mutable state, timer generations, and
//! reconnect backoff.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use wahub_core::traits::WaSocket;
use wahub_core::types::{AuthMethod, ConnectionState};

use crate::logbuf::LogRing;

/// Reconnects attempted before the session goes terminal.
pub const MAX_RECONNECT_ATTEMPTS: u32 = 3;

/// Base reconnect delay, doubled per attempt.
pub const RECONNECT_BASE_MS: u64 = 5_000;

/// Ceiling on the reconnect delay.
pub const RECONNECT_CAP_MS: u64 = 30_000;

/// QR payloads surfaced per connection attempt before going quiet.
pub const MAX_QR_ISSUES: u32 = 3;

/// How long an unscanned QR stays valid before an expiry notice.
pub const QR_TIMEOUT: Duration = Duration::from_secs(60);

/// Pause between tearing down an old handle and opening a new one, giving
/// the remote end time to notice the close.
pub const SETTLE_DELAY: Duration = Duration::from_secs(2);

/// Delay before the one-time welcome message after a fresh registration.
pub const WELCOME_DELAY: Duration = Duration::from_secs(2);

/// Exponential backoff for reconnect `attempt` (0-based), capped.
pub fn backoff_delay(attempt: u32) -> Duration {
    let factor = 1u64 << attempt.min(16);
    Duration::from_millis(RECONNECT_BASE_MS.saturating_mul(factor).min(RECONNECT_CAP_MS))
}

/// One tenant's slot in the session manager.
///
/// The `state` mutex serializes every lifecycle mutation for the tenant;
/// `generation` is bumped on each teardown or restart so timers armed
/// against an older connection discover they are stale and do nothing.
pub(crate) struct TenantEntry {
    pub state: Mutex<TenantState>,
    pub generation: AtomicU64,
    pub logs: Mutex<LogRing>,
}

impl TenantEntry {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(TenantState::new()),
            generation: AtomicU64::new(0),
            logs: Mutex::new(LogRing::default()),
        }
    }

    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Invalidates every timer and loop armed against the current
    /// generation, returning the new one.
    pub fn bump_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// Mutable session state, guarded by the entry mutex.
pub(crate) struct TenantState {
    pub conn: ConnectionState,
    /// The live protocol handle; at most one per tenant.
    pub socket: Option<Arc<dyn WaSocket>>,
    pub method: AuthMethod,
    /// Normalized phone number, present for pairing sessions.
    pub phone: Option<String>,
    /// Whether stored credentials had completed device registration.
    pub registered: bool,
    pub reconnect_attempts: u32,
    /// QR payloads surfaced on the current connection.
    pub qr_issued: u32,
    pub pairing_code: Option<String>,
    pub connected_at: Option<Instant>,
    /// Welcome message already sent for this entry.
    pub welcomed: bool,
    pub event_task: Option<JoinHandle<()>>,
}

impl TenantState {
    fn new() -> Self {
        Self {
            conn: ConnectionState::Idle,
            socket: None,
            method: AuthMethod::Qr,
            phone: None,
            registered: false,
            reconnect_attempts: 0,
            qr_issued: 0,
            pairing_code: None,
            connected_at: None,
            welcomed: false,
            event_task: None,
        }
    }

    /// Drops the live handle and aborts the event loop, if any.
    pub fn drop_handle(&mut self) {
        if let Some(task) = self.event_task.take() {
            task.abort();
        }
        self.socket = None;
    }
}
