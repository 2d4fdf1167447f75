// SPDX-FileCopyrightText: 2026 Wahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A [`WaSocket`] double that records every call.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use wahub_core::error::WahubError;
use wahub_core::traits::WaSocket;
use wahub_core::types::Jid;
use wahub_core::wire::{
    GroupMetadata, ParticipantAction, Presence, WaIdentity,
};

/// Recorded socket interactions, shared between the socket and the test.
#[derive(Default)]
pub struct SocketLog {
    pub sent: Mutex<Vec<(Jid, String)>>,
    pub reactions: Mutex<Vec<(Jid, String, String)>>,
    pub reads: Mutex<Vec<(Jid, Vec<String>)>>,
    pub presences: Mutex<Vec<(Jid, Presence)>>,
    pub participant_updates: Mutex<Vec<(Jid, Vec<Jid>, ParticipantAction)>>,
    pub logout_calls: AtomicUsize,
    pub pairing_requests: Mutex<Vec<String>>,
}

/// Scripted [`WaSocket`] implementation.
///
/// All interactions land in [`SocketLog`]; group metadata and failure
/// injection are configured up front by the test.
pub struct MockSocket {
    pub log: Arc<SocketLog>,
    groups: Mutex<HashMap<Jid, GroupMetadata>>,
    identity: Mutex<Option<WaIdentity>>,
    pairing_code: Mutex<String>,
    pub fail_sends: AtomicBool,
    pub fail_group_metadata: AtomicBool,
    pub fail_pairing: AtomicBool,
    /// Decremented on drop; used to count live handles across reconnects.
    live_counter: Option<Arc<AtomicUsize>>,
}

impl MockSocket {
    pub fn new() -> Self {
        Self {
            log: Arc::new(SocketLog::default()),
            groups: Mutex::new(HashMap::new()),
            identity: Mutex::new(None),
            pairing_code: Mutex::new("ABCD-1234".to_string()),
            fail_sends: AtomicBool::new(false),
            fail_group_metadata: AtomicBool::new(false),
            fail_pairing: AtomicBool::new(false),
            live_counter: None,
        }
    }

    /// A socket whose lifetime is tracked by `counter` (incremented here,
    /// decremented on drop).
    pub fn with_live_counter(counter: Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        let mut socket = Self::new();
        socket.live_counter = Some(counter);
        socket
    }

    /// Configures the metadata returned for a group JID.
    pub fn set_group(&self, meta: GroupMetadata) {
        self.groups.lock().unwrap().insert(meta.id.clone(), meta);
    }

    pub fn set_identity(&self, identity: WaIdentity) {
        *self.identity.lock().unwrap() = Some(identity);
    }

    pub fn set_pairing_code(&self, code: &str) {
        *self.pairing_code.lock().unwrap() = code.to_string();
    }

    /// Texts sent so far, for assertions.
    pub fn sent_texts(&self) -> Vec<String> {
        self.log
            .sent
            .lock()
            .unwrap()
            .iter()
            .map(|(_, text)| text.clone())
            .collect()
    }
}

impl Default for MockSocket {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MockSocket {
    fn drop(&mut self) {
        if let Some(counter) = &self.live_counter {
            counter.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

#[async_trait]
impl WaSocket for MockSocket {
    async fn send_message(&self, to: &Jid, text: &str) -> Result<(), WahubError> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(WahubError::connection("mock send failure"));
        }
        self.log
            .sent
            .lock()
            .unwrap()
            .push((to.clone(), text.to_string()));
        Ok(())
    }

    async fn send_reaction(
        &self,
        chat: &Jid,
        message_id: &str,
        emoji: &str,
    ) -> Result<(), WahubError> {
        self.log.reactions.lock().unwrap().push((
            chat.clone(),
            message_id.to_string(),
            emoji.to_string(),
        ));
        Ok(())
    }

    async fn mark_read(&self, chat: &Jid, message_ids: &[String]) -> Result<(), WahubError> {
        self.log
            .reads
            .lock()
            .unwrap()
            .push((chat.clone(), message_ids.to_vec()));
        Ok(())
    }

    async fn send_presence(&self, chat: &Jid, presence: Presence) -> Result<(), WahubError> {
        self.log
            .presences
            .lock()
            .unwrap()
            .push((chat.clone(), presence));
        Ok(())
    }

    async fn logout(&self) -> Result<(), WahubError> {
        self.log.logout_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn request_pairing_code(&self, phone: &str) -> Result<String, WahubError> {
        if self.fail_pairing.load(Ordering::SeqCst) {
            return Err(WahubError::connection("mock pairing failure"));
        }
        self.log
            .pairing_requests
            .lock()
            .unwrap()
            .push(phone.to_string());
        Ok(self.pairing_code.lock().unwrap().clone())
    }

    async fn group_metadata(&self, group: &Jid) -> Result<GroupMetadata, WahubError> {
        if self.fail_group_metadata.load(Ordering::SeqCst) {
            return Err(WahubError::connection("mock metadata failure"));
        }
        self.groups
            .lock()
            .unwrap()
            .get(group)
            .cloned()
            .ok_or_else(|| WahubError::connection(format!("{group} is not a known group")))
    }

    async fn group_participants_update(
        &self,
        group: &Jid,
        participants: &[Jid],
        action: ParticipantAction,
    ) -> Result<(), WahubError> {
        self.log.participant_updates.lock().unwrap().push((
            group.clone(),
            participants.to_vec(),
            action,
        ));
        Ok(())
    }

    fn identity(&self) -> Option<WaIdentity> {
        self.identity.lock().unwrap().clone()
    }
}
