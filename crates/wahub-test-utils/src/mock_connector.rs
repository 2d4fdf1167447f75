// SPDX-FileCopyrightText: 2026 Wahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A [`WaConnector`] double producing scripted connections.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;

use wahub_core::error::WahubError;
use wahub_core::traits::{WaConnector, WaSocket};
use wahub_core::wire::{AuthState, WaEvent};

use crate::mock_socket::MockSocket;

/// Connector that hands out prepared mock connections in order.
///
/// Tests call [`MockConnector::prepare`] to queue a connection and get the
/// event sender that drives its session loop. When the queue is empty,
/// `open` produces a fresh silent connection whose sender is parked inside
/// the connector so the event stream stays open.
pub struct MockConnector {
    prepared: Mutex<VecDeque<(Arc<MockSocket>, mpsc::Receiver<WaEvent>)>>,
    parked_senders: Mutex<Vec<mpsc::Sender<WaEvent>>>,
    opens: AtomicUsize,
    /// Shared live-handle counter wired into every socket this connector creates.
    pub live_handles: Arc<AtomicUsize>,
    /// Auth states passed to `open`, for assertions.
    pub seen_auth: Mutex<Vec<AuthState>>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self {
            prepared: Mutex::new(VecDeque::new()),
            parked_senders: Mutex::new(Vec::new()),
            opens: AtomicUsize::new(0),
            live_handles: Arc::new(AtomicUsize::new(0)),
            seen_auth: Mutex::new(Vec::new()),
        }
    }

    /// Queues the next connection `open` will return and hands back the
    /// socket plus the sender used to script its events.
    pub fn prepare(&self) -> (Arc<MockSocket>, mpsc::Sender<WaEvent>) {
        let (tx, rx) = mpsc::channel(32);
        let socket = Arc::new(MockSocket::with_live_counter(Arc::clone(&self.live_handles)));
        self.prepared
            .lock()
            .unwrap()
            .push_back((Arc::clone(&socket), rx));
        (socket, tx)
    }

    /// How many times `open` has been called.
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    /// Currently live (not yet dropped) socket handles.
    pub fn live_count(&self) -> usize {
        self.live_handles.load(Ordering::SeqCst)
    }
}

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WaConnector for MockConnector {
    async fn open(
        &self,
        auth: AuthState,
    ) -> Result<(Arc<dyn WaSocket>, mpsc::Receiver<WaEvent>), WahubError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        self.seen_auth.lock().unwrap().push(auth);

        if let Some((socket, rx)) = self.prepared.lock().unwrap().pop_front() {
            return Ok((socket, rx));
        }

        let (tx, rx) = mpsc::channel(32);
        self.parked_senders.lock().unwrap().push(tx);
        let socket = Arc::new(MockSocket::with_live_counter(Arc::clone(&self.live_handles)));
        Ok((socket, rx))
    }
}
