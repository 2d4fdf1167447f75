// SPDX-FileCopyrightText: 2026 Wahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event bus trait for pushing session events to subscribed observers.

use crate::event::SessionEvent;
use crate::types::TenantId;

/// Publish/subscribe fan-out keyed by tenant room.
///
/// Fire-and-forget: no delivery guarantee, no backpressure, no
/// acknowledgment. Publishing to a room with no subscribers is a no-op.
pub trait EventBus: Send + Sync {
    /// Pushes an event to every observer of the tenant's room.
    fn publish(&self, tenant: &TenantId, event: SessionEvent);
}
