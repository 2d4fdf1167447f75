// SPDX-FileCopyrightText: 2026 Wahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The session manager: one entry per tenant, one event loop per live
//! connection.
//!
//! All lifecycle mutation for a tenant flows through that tenant's entry
//! mutex, so competing operations (start racing stop, reconnect racing a
//! fresh start) serialize per tenant while distinct tenants proceed in
//! parallel. Timers armed against a connection carry its generation number
//! and no-op once the generation has moved on.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use wahub_command::CommandRegistry;
use wahub_core::error::WahubError;
use wahub_core::event::SessionEvent;
use wahub_core::traits::{AuthStateStore, EventBus, RecordStore, WaConnector};
use wahub_core::types::{
    AuthMethod, ConnectionState, TenantId, TenantSettings, normalize_phone,
};
use wahub_core::wire::{ConnectionUpdate, DisconnectReason, WaEvent, WireState};
use wahub_router::MessageRouter;

use crate::session::{
    MAX_QR_ISSUES, MAX_RECONNECT_ATTEMPTS, QR_TIMEOUT, SETTLE_DELAY, TenantEntry, WELCOME_DELAY,
    backoff_delay,
};
use crate::qr;
use crate::status::{SessionStatus, process_memory_bytes};

const WELCOME_TEXT: &str = "Wahub is connected and ready. Send .menu to see available commands.";

/// Owns every tenant session. Cheap to clone; all clones share state.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<ManagerInner>,
}

struct ManagerInner {
    connector: Arc<dyn WaConnector>,
    auth: Arc<dyn AuthStateStore>,
    store: Arc<dyn RecordStore>,
    bus: Arc<dyn EventBus>,
    router: MessageRouter,
    tenants: DashMap<TenantId, Arc<TenantEntry>>,
    max_tenants: AtomicUsize,
}

impl SessionManager {
    pub fn new(
        connector: Arc<dyn WaConnector>,
        auth: Arc<dyn AuthStateStore>,
        store: Arc<dyn RecordStore>,
        bus: Arc<dyn EventBus>,
        registry: Arc<CommandRegistry>,
    ) -> Self {
        let router = MessageRouter::new(registry, Arc::clone(&store));
        Self {
            inner: Arc::new(ManagerInner {
                connector,
                auth,
                store,
                bus,
                router,
                tenants: DashMap::new(),
                max_tenants: AtomicUsize::new(usize::MAX),
            }),
        }
    }

    /// Caps how many tenants may hold entries at once.
    pub fn with_max_tenants(self, max_tenants: usize) -> Self {
        self.inner.max_tenants.store(max_tenants, Ordering::SeqCst);
        self
    }

    /// Starts (or restarts) the tenant's session.
    ///
    /// Validation failures surface here; connection progress is reported
    /// through the event bus. An existing session is torn down first, so
    /// the tenant ends up with at most one live handle.
    pub async fn start_session(
        &self,
        tenant: &TenantId,
        method: AuthMethod,
        phone: Option<&str>,
    ) -> Result<(), WahubError> {
        let phone = match method {
            AuthMethod::Pairing => {
                let raw = phone.ok_or_else(|| {
                    WahubError::AuthInput("pairing requires a phone number".into())
                })?;
                Some(normalize_phone(raw)?)
            }
            AuthMethod::Qr => None,
        };

        let at_capacity = !self.inner.tenants.contains_key(tenant)
            && self.inner.tenants.len() >= self.inner.max_tenants.load(Ordering::SeqCst);
        if at_capacity {
            return Err(WahubError::ResourceExhausted {
                tenant: tenant.to_string(),
                message: "tenant capacity reached".into(),
            });
        }

        let entry = self.entry(tenant);
        info!(tenant = %tenant, method = %method, "session start requested");

        let inner = Arc::clone(&self.inner);
        let tenant = tenant.clone();
        tokio::spawn(async move {
            start_connection(inner, tenant, entry, method, phone, true).await;
        });
        Ok(())
    }

    /// Stops the tenant's session and discards all transient state.
    ///
    /// Idempotent: stopping an absent session is a quiet no-op and emits
    /// nothing.
    pub async fn stop_session(&self, tenant: &TenantId) -> Result<(), WahubError> {
        let Some((_, entry)) = self.inner.tenants.remove(tenant) else {
            debug!(tenant = %tenant, "stop requested for absent session");
            return Ok(());
        };

        entry.bump_generation();
        let socket = {
            let mut st = entry.state.lock().await;
            st.conn = ConnectionState::Idle;
            st.pairing_code = None;
            st.connected_at = None;
            st.reconnect_attempts = 0;
            st.qr_issued = 0;
            if let Some(task) = st.event_task.take() {
                task.abort();
            }
            st.socket.take()
        };

        if let Some(socket) = socket {
            if let Err(e) = socket.logout().await {
                warn!(tenant = %tenant, error = %e, "logout during stop failed");
            }
        }
        if let Err(e) = self.inner.store.set_bot_connected(tenant, false).await {
            warn!(tenant = %tenant, error = %e, "connected flag update failed");
        }
        self.inner.bus.publish(tenant, SessionEvent::Disconnected);
        info!(tenant = %tenant, "session stopped");
        Ok(())
    }

    /// Stops every session concurrently, bounded by `timeout`.
    pub async fn stop_all(&self, timeout: Duration) {
        let tenants: Vec<TenantId> = self
            .inner
            .tenants
            .iter()
            .map(|e| e.key().clone())
            .collect();
        if tenants.is_empty() {
            return;
        }
        info!(count = tenants.len(), "stopping all sessions");

        let stops = tenants.into_iter().map(|tenant| {
            let mgr = self.clone();
            async move {
                if let Err(e) = mgr.stop_session(&tenant).await {
                    warn!(tenant = %tenant, error = %e, "stop failed during shutdown");
                }
            }
        });
        if tokio::time::timeout(timeout, futures::future::join_all(stops))
            .await
            .is_err()
        {
            warn!("session shutdown timed out; abandoning remaining stops");
        }
    }

    /// Whether the tenant currently holds an open, authenticated connection.
    pub async fn is_connected(&self, tenant: &TenantId) -> bool {
        let entry = self.inner.tenants.get(tenant).map(|e| Arc::clone(&e));
        match entry {
            Some(entry) => entry.state.lock().await.conn == ConnectionState::Connected,
            None => false,
        }
    }

    /// Point-in-time status snapshot for the tenant.
    pub async fn status(&self, tenant: &TenantId) -> SessionStatus {
        let stats = match self.inner.store.get_stats(tenant).await {
            Ok(stats) => stats,
            Err(e) => {
                warn!(tenant = %tenant, error = %e, "stats read failed");
                Default::default()
            }
        };

        let entry = self.inner.tenants.get(tenant).map(|e| Arc::clone(&e));
        let (state, uptime_secs, reconnect_attempts) = match entry {
            Some(entry) => {
                let st = entry.state.lock().await;
                let uptime = st
                    .connected_at
                    .filter(|_| st.conn == ConnectionState::Connected)
                    .map(|at| at.elapsed().as_secs());
                (st.conn, uptime, st.reconnect_attempts)
            }
            None => (ConnectionState::Idle, None, 0),
        };

        SessionStatus {
            state,
            uptime_secs,
            reconnect_attempts,
            stats,
            process_memory_bytes: process_memory_bytes(),
        }
    }

    /// Forces a fresh QR by tearing the session down and restarting it.
    ///
    /// Fails if the session is already connected.
    pub async fn refresh_qr(&self, tenant: &TenantId) -> Result<(), WahubError> {
        let Some(entry) = self.inner.tenants.get(tenant).map(|e| Arc::clone(&e)) else {
            return Err(WahubError::AuthInput("no session to refresh".into()));
        };

        let (method, phone) = {
            let st = entry.state.lock().await;
            if st.conn == ConnectionState::Connected {
                return Err(WahubError::AuthInput(
                    "session is already connected".into(),
                ));
            }
            (st.method, st.phone.clone())
        };
        info!(tenant = %tenant, "qr refresh requested");

        let inner = Arc::clone(&self.inner);
        let tenant = tenant.clone();
        tokio::spawn(async move {
            start_connection(inner, tenant, entry, method, phone, true).await;
        });
        Ok(())
    }

    /// Replaces the tenant's settings document.
    pub async fn update_settings(
        &self,
        tenant: &TenantId,
        settings: &TenantSettings,
    ) -> Result<(), WahubError> {
        self.inner.store.update_settings(tenant, settings).await
    }

    /// The pairing code issued for the current connection, if any.
    pub async fn pairing_code(&self, tenant: &TenantId) -> Option<String> {
        let entry = self.inner.tenants.get(tenant).map(|e| Arc::clone(&e))?;
        let st = entry.state.lock().await;
        st.pairing_code.clone()
    }

    /// Oldest-first copy of the tenant's log ring; empty when no session.
    pub async fn logs(&self, tenant: &TenantId) -> Vec<String> {
        let entry = self.inner.tenants.get(tenant).map(|e| Arc::clone(&e));
        match entry {
            Some(entry) => entry.logs.lock().await.snapshot(),
            None => Vec::new(),
        }
    }

    fn entry(&self, tenant: &TenantId) -> Arc<TenantEntry> {
        Arc::clone(
            &self
                .inner
                .tenants
                .entry(tenant.clone())
                .or_insert_with(|| Arc::new(TenantEntry::new())),
        )
    }
}

impl ManagerInner {
    /// Appends to the tenant's log ring and mirrors the line to observers.
    async fn log(&self, tenant: &TenantId, entry: &TenantEntry, line: &str) {
        let stamped = entry.logs.lock().await.push(line);
        self.bus
            .publish(tenant, SessionEvent::Log { line: stamped });
        debug!(tenant = %tenant, "{line}");
    }
}

/// Opens a connection for the tenant, replacing any existing one.
///
/// Holds the entry mutex for the whole sequence so concurrent starts and
/// reconnect timers serialize; exactly one connection survives.
fn start_connection(
    inner: Arc<ManagerInner>,
    tenant: TenantId,
    entry: Arc<TenantEntry>,
    method: AuthMethod,
    phone: Option<String>,
    reset_attempts: bool,
) -> futures::future::BoxFuture<'static, ()> {
    Box::pin(async move {
        if let Err(e) = try_start(&inner, &tenant, &entry, method, phone, reset_attempts).await {
            warn!(tenant = %tenant, error = %e, "connection open failed");
            inner
                .log(&tenant, &entry, &format!("connection failed: {e}"))
                .await;
            entry.state.lock().await.conn = ConnectionState::Error;
            inner.bus.publish(
                &tenant,
                SessionEvent::Error {
                    message: e.to_string(),
                },
            );
        }
    })
}

async fn try_start(
    inner: &Arc<ManagerInner>,
    tenant: &TenantId,
    entry: &Arc<TenantEntry>,
    method: AuthMethod,
    phone: Option<String>,
    reset_attempts: bool,
) -> Result<(), WahubError> {
    let mut st = entry.state.lock().await;

    // A stop may have removed the entry while this task was queued.
    let still_tracked = inner
        .tenants
        .get(tenant)
        .is_some_and(|e| Arc::ptr_eq(&e, entry));
    if !still_tracked {
        debug!(tenant = %tenant, "start superseded by stop");
        return Ok(());
    }

    if st.socket.is_some() || st.event_task.is_some() {
        entry.bump_generation();
        st.drop_handle();
        inner
            .log(tenant, entry, "replacing existing connection")
            .await;
        tokio::time::sleep(SETTLE_DELAY).await;
    }

    let generation = entry.bump_generation();
    st.conn = ConnectionState::Connecting;
    st.method = method;
    st.phone = phone;
    st.pairing_code = None;
    st.qr_issued = 0;
    st.connected_at = None;
    if reset_attempts {
        st.reconnect_attempts = 0;
    }
    inner.bus.publish(tenant, SessionEvent::Connecting);
    inner.log(tenant, entry, "opening connection").await;

    let auth = inner.auth.load(tenant).await?;
    st.registered = auth.registered;
    let (socket, events) = inner.connector.open(auth).await?;
    st.socket = Some(socket);
    st.event_task = Some(tokio::spawn(run_session(
        Arc::clone(inner),
        tenant.clone(),
        Arc::clone(entry),
        generation,
        events,
    )));
    Ok(())
}

/// Consumes one connection's event stream until it closes or goes stale.
async fn run_session(
    inner: Arc<ManagerInner>,
    tenant: TenantId,
    entry: Arc<TenantEntry>,
    generation: u64,
    mut events: mpsc::Receiver<WaEvent>,
) {
    while let Some(event) = events.recv().await {
        if entry.current_generation() != generation {
            debug!(tenant = %tenant, generation, "stale session loop exiting");
            break;
        }
        match event {
            WaEvent::Connection(update) => {
                handle_connection(&inner, &tenant, &entry, generation, update).await;
            }
            WaEvent::CredsUpdate(auth) => {
                if let Err(e) = inner.auth.save(&tenant, &auth).await {
                    warn!(tenant = %tenant, error = %e, "credential save failed");
                }
            }
            WaEvent::Messages(batch) => {
                let socket = entry.state.lock().await.socket.clone();
                if let Some(socket) = socket {
                    inner.router.route_batch(&tenant, &socket, &batch).await;
                }
            }
        }
    }
}

async fn handle_connection(
    inner: &Arc<ManagerInner>,
    tenant: &TenantId,
    entry: &Arc<TenantEntry>,
    generation: u64,
    update: ConnectionUpdate,
) {
    match update.state {
        WireState::Connecting => match update.qr {
            Some(payload) => handle_qr(inner, tenant, entry, generation, &payload).await,
            None => {
                entry.state.lock().await.conn = ConnectionState::Connecting;
                inner.bus.publish(tenant, SessionEvent::Connecting);
            }
        },
        WireState::Open => handle_open(inner, tenant, entry, generation, &update).await,
        WireState::Close => {
            let reason = update.reason.unwrap_or(DisconnectReason::ConnectionClosed);
            handle_close(inner, tenant, entry, generation, reason).await;
        }
    }
}

/// A pairing payload arrived: surface a QR image or a pairing code
/// depending on how the session authenticates.
async fn handle_qr(
    inner: &Arc<ManagerInner>,
    tenant: &TenantId,
    entry: &Arc<TenantEntry>,
    generation: u64,
    payload: &str,
) {
    let mut st = entry.state.lock().await;
    st.conn = ConnectionState::Authenticating;

    if st.method == AuthMethod::Pairing && !st.registered {
        if st.pairing_code.is_some() {
            return;
        }
        let (Some(socket), Some(phone)) = (st.socket.clone(), st.phone.clone()) else {
            return;
        };
        drop(st);

        match socket.request_pairing_code(&phone).await {
            Ok(code) => {
                entry.state.lock().await.pairing_code = Some(code.clone());
                inner.bus.publish(tenant, SessionEvent::PairingCode { code });
                inner.log(tenant, entry, "pairing code issued").await;
            }
            Err(e) => {
                warn!(tenant = %tenant, error = %e, "pairing code request failed");
                inner.bus.publish(
                    tenant,
                    SessionEvent::Error {
                        message: format!("pairing code request failed: {e}"),
                    },
                );
            }
        }
        return;
    }

    if st.qr_issued >= MAX_QR_ISSUES {
        debug!(tenant = %tenant, "qr issue cap reached; staying quiet");
        return;
    }
    st.qr_issued += 1;
    let issued = st.qr_issued;
    drop(st);

    match qr::render_data_url(payload) {
        Ok(data_url) => {
            inner.bus.publish(tenant, SessionEvent::Qr { data_url });
            inner
                .log(
                    tenant,
                    entry,
                    &format!("qr code issued ({issued}/{MAX_QR_ISSUES})"),
                )
                .await;
            arm_qr_expiry(inner, tenant, entry, generation, issued);
        }
        Err(e) => {
            warn!(tenant = %tenant, error = %e, "qr render failed");
            inner.bus.publish(
                tenant,
                SessionEvent::Error {
                    message: format!("qr render failed: {e}"),
                },
            );
        }
    }
}

/// Notifies observers when a surfaced QR ages out unscanned.
fn arm_qr_expiry(
    inner: &Arc<ManagerInner>,
    tenant: &TenantId,
    entry: &Arc<TenantEntry>,
    generation: u64,
    issued: u32,
) {
    let inner = Arc::clone(inner);
    let tenant = tenant.clone();
    let entry = Arc::clone(entry);
    tokio::spawn(async move {
        tokio::time::sleep(QR_TIMEOUT).await;
        if entry.current_generation() != generation {
            return;
        }
        {
            let st = entry.state.lock().await;
            // A scan or a newer QR makes this timer moot.
            if st.conn == ConnectionState::Connected || st.qr_issued != issued {
                return;
            }
        }
        inner.bus.publish(&tenant, SessionEvent::QrExpired);
        inner.log(&tenant, &entry, "qr code expired").await;
    });
}

async fn handle_open(
    inner: &Arc<ManagerInner>,
    tenant: &TenantId,
    entry: &Arc<TenantEntry>,
    generation: u64,
    update: &ConnectionUpdate,
) {
    let (identity, welcome_due) = {
        let mut st = entry.state.lock().await;
        st.conn = ConnectionState::Connected;
        st.reconnect_attempts = 0;
        st.qr_issued = 0;
        st.pairing_code = None;
        st.registered = true;
        st.connected_at = Some(Instant::now());
        let welcome_due = update.is_new_login && !st.welcomed;
        if welcome_due {
            st.welcomed = true;
        }
        (st.socket.as_ref().and_then(|s| s.identity()), welcome_due)
    };

    if let Err(e) = inner.store.set_bot_connected(tenant, true).await {
        warn!(tenant = %tenant, error = %e, "connected flag update failed");
    }

    let jid = identity
        .as_ref()
        .map(|i| i.jid.to_string())
        .unwrap_or_default();
    let name = identity.as_ref().and_then(|i| i.name.clone());
    info!(tenant = %tenant, jid = %jid, "session connected");
    inner
        .log(tenant, entry, &format!("connected as {jid}"))
        .await;
    inner
        .bus
        .publish(tenant, SessionEvent::Connected { jid, name });

    if welcome_due {
        if let Some(identity) = identity {
            arm_welcome(inner, tenant, entry, generation, identity.jid);
        }
    }
}

/// Sends the one-time welcome to the freshly linked account, delayed so
/// the connection has settled.
fn arm_welcome(
    inner: &Arc<ManagerInner>,
    tenant: &TenantId,
    entry: &Arc<TenantEntry>,
    generation: u64,
    to: wahub_core::types::Jid,
) {
    let inner = Arc::clone(inner);
    let tenant = tenant.clone();
    let entry = Arc::clone(entry);
    tokio::spawn(async move {
        tokio::time::sleep(WELCOME_DELAY).await;
        if entry.current_generation() != generation {
            return;
        }
        let socket = entry.state.lock().await.socket.clone();
        let Some(socket) = socket else { return };
        if let Err(e) = socket.send_message(&to, WELCOME_TEXT).await {
            debug!(tenant = %tenant, error = %e, "welcome message failed");
        }
    });
}

async fn handle_close(
    inner: &Arc<ManagerInner>,
    tenant: &TenantId,
    entry: &Arc<TenantEntry>,
    generation: u64,
    reason: DisconnectReason,
) {
    let (attempts, method, phone) = {
        let mut st = entry.state.lock().await;
        st.conn = ConnectionState::Disconnected;
        st.socket = None;
        st.pairing_code = None;
        st.connected_at = None;
        (st.reconnect_attempts, st.method, st.phone.clone())
    };

    if let Err(e) = inner.store.set_bot_connected(tenant, false).await {
        warn!(tenant = %tenant, error = %e, "connected flag update failed");
    }
    inner.bus.publish(tenant, SessionEvent::Disconnected);
    inner
        .log(tenant, entry, &format!("connection closed: {reason:?}"))
        .await;

    if !reason.is_recoverable() {
        // Logout is terminal: clear credentials and forget the tenant.
        entry.bump_generation();
        if let Err(e) = inner.auth.clear(tenant).await {
            warn!(tenant = %tenant, error = %e, "credential clear failed");
        }
        inner.tenants.remove(tenant);
        inner.bus.publish(tenant, SessionEvent::LoggedOut);
        inner
            .log(tenant, entry, "logged out; credentials cleared")
            .await;
        info!(tenant = %tenant, "session logged out");
        return;
    }

    if attempts >= MAX_RECONNECT_ATTEMPTS {
        entry.state.lock().await.conn = ConnectionState::Error;
        inner.bus.publish(
            tenant,
            SessionEvent::Error {
                message: format!("gave up after {MAX_RECONNECT_ATTEMPTS} reconnect attempts"),
            },
        );
        inner
            .log(tenant, entry, "reconnect attempts exhausted")
            .await;
        warn!(tenant = %tenant, "reconnect attempts exhausted");
        return;
    }

    let delay = backoff_delay(attempts);
    let attempt = attempts + 1;
    entry.state.lock().await.reconnect_attempts = attempt;
    inner.bus.publish(
        tenant,
        SessionEvent::Reconnecting {
            attempt,
            delay_ms: delay.as_millis() as u64,
        },
    );
    inner
        .log(
            tenant,
            entry,
            &format!(
                "reconnecting in {}ms (attempt {attempt}/{MAX_RECONNECT_ATTEMPTS})",
                delay.as_millis()
            ),
        )
        .await;

    let inner = Arc::clone(inner);
    let tenant = tenant.clone();
    let entry = Arc::clone(entry);
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        // A stop or fresh start in the meantime owns the entry now.
        if entry.current_generation() != generation {
            return;
        }
        start_connection(inner, tenant, entry, method, phone, false).await;
    });
}
