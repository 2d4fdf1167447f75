// SPDX-FileCopyrightText: 2026 Wahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-tenant publish/subscribe fan-out.
//!
//! [`BroadcastBus`] maps each tenant to a `tokio::sync::broadcast` channel.
//! Publishing is fire-and-forget: with no subscribers the event is dropped
//! silently, and a slow subscriber that lags past the channel capacity
//! loses the oldest events rather than exerting backpressure.

use dashmap::DashMap;
use tokio::sync::broadcast;
use tracing::trace;

use wahub_core::event::SessionEvent;
use wahub_core::traits::EventBus;
use wahub_core::types::TenantId;

/// Buffered events per tenant room before a lagging subscriber starts
/// losing the oldest ones.
const ROOM_CAPACITY: usize = 64;

/// In-process event bus with one broadcast channel per tenant room.
pub struct BroadcastBus {
    rooms: DashMap<TenantId, broadcast::Sender<SessionEvent>>,
}

impl BroadcastBus {
    pub fn new() -> Self {
        Self {
            rooms: DashMap::new(),
        }
    }

    /// Subscribes to a tenant's room, creating the room if needed.
    ///
    /// The receiver observes only events published after this call.
    pub fn subscribe(&self, tenant: &TenantId) -> broadcast::Receiver<SessionEvent> {
        self.rooms
            .entry(tenant.clone())
            .or_insert_with(|| broadcast::channel(ROOM_CAPACITY).0)
            .subscribe()
    }

    /// Number of live subscribers for a tenant's room.
    pub fn subscriber_count(&self, tenant: &TenantId) -> usize {
        self.rooms
            .get(tenant)
            .map(|tx| tx.receiver_count())
            .unwrap_or(0)
    }
}

impl Default for BroadcastBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus for BroadcastBus {
    fn publish(&self, tenant: &TenantId, event: SessionEvent) {
        let Some(tx) = self.rooms.get(tenant) else {
            trace!(tenant = %tenant, "no room for tenant, dropping event");
            return;
        };
        // send() errs only when there are no receivers; fire-and-forget.
        let _ = tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tenant(s: &str) -> TenantId {
        TenantId::from(s)
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_a_noop() {
        let bus = BroadcastBus::new();
        bus.publish(&tenant("t1"), SessionEvent::Connecting);
        assert_eq!(bus.subscriber_count(&tenant("t1")), 0);
    }

    #[tokio::test]
    async fn subscriber_receives_published_events() {
        let bus = BroadcastBus::new();
        let mut rx = bus.subscribe(&tenant("t1"));

        bus.publish(&tenant("t1"), SessionEvent::Connecting);
        bus.publish(
            &tenant("t1"),
            SessionEvent::Connected {
                jid: "1@s.whatsapp.net".into(),
                name: None,
            },
        );

        assert_eq!(rx.recv().await.unwrap(), SessionEvent::Connecting);
        assert!(matches!(
            rx.recv().await.unwrap(),
            SessionEvent::Connected { .. }
        ));
    }

    #[tokio::test]
    async fn rooms_are_isolated_per_tenant() {
        let bus = BroadcastBus::new();
        let mut rx1 = bus.subscribe(&tenant("t1"));
        let mut rx2 = bus.subscribe(&tenant("t2"));

        bus.publish(&tenant("t1"), SessionEvent::Disconnected);

        assert_eq!(rx1.recv().await.unwrap(), SessionEvent::Disconnected);
        assert!(matches!(
            rx2.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn multiple_subscribers_fan_out() {
        let bus = BroadcastBus::new();
        let mut a = bus.subscribe(&tenant("t1"));
        let mut b = bus.subscribe(&tenant("t1"));
        assert_eq!(bus.subscriber_count(&tenant("t1")), 2);

        bus.publish(&tenant("t1"), SessionEvent::QrExpired);
        assert_eq!(a.recv().await.unwrap(), SessionEvent::QrExpired);
        assert_eq!(b.recv().await.unwrap(), SessionEvent::QrExpired);
    }
}
