// SPDX-FileCopyrightText: 2026 Wahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! An [`EventBus`] double that records every published event.

use std::sync::Mutex;

use wahub_core::event::SessionEvent;
use wahub_core::traits::EventBus;
use wahub_core::types::TenantId;

/// Captures published events in order for assertions.
#[derive(Default)]
pub struct RecordingBus {
    events: Mutex<Vec<(TenantId, SessionEvent)>>,
}

impl RecordingBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// All events published so far for the given tenant.
    pub fn events_for(&self, tenant: &TenantId) -> Vec<SessionEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, _)| t == tenant)
            .map(|(_, e)| e.clone())
            .collect()
    }

    /// Count of events matching the predicate for the tenant.
    pub fn count_matching(
        &self,
        tenant: &TenantId,
        pred: impl Fn(&SessionEvent) -> bool,
    ) -> usize {
        self.events_for(tenant).iter().filter(|e| pred(e)).count()
    }
}

impl EventBus for RecordingBus {
    fn publish(&self, tenant: &TenantId, event: SessionEvent) {
        self.events.lock().unwrap().push((tenant.clone(), event));
    }
}
