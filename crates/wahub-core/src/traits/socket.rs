// SPDX-FileCopyrightText: 2026 Wahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The underlying connection abstraction.
//!
//! The wire protocol is an opaque external library; Wahub drives it only
//! through these two traits. [`WaConnector::open`] yields a live socket
//! handle plus a typed event receiver, and the session manager consumes
//! that receiver in a single per-session dispatch loop.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::WahubError;
use crate::types::Jid;
use crate::wire::{
    AuthState, GroupMetadata, ParticipantAction, Presence, WaEvent, WaIdentity,
};

/// Factory for protocol connections.
#[async_trait]
pub trait WaConnector: Send + Sync {
    /// Opens a connection with the given credential material.
    ///
    /// Returns the socket handle and the event stream for this connection
    /// generation. Dropping the receiver or the handle tears the
    /// connection down.
    async fn open(
        &self,
        auth: AuthState,
    ) -> Result<(std::sync::Arc<dyn WaSocket>, mpsc::Receiver<WaEvent>), WahubError>;
}

/// A live protocol connection handle.
///
/// Exclusively owned by the session manager entry for one tenant; replaced
/// wholesale on reconnect.
#[async_trait]
pub trait WaSocket: Send + Sync {
    /// Sends a text message to a user or group.
    async fn send_message(&self, to: &Jid, text: &str) -> Result<(), WahubError>;

    /// Sends an emoji reaction to an existing message.
    async fn send_reaction(
        &self,
        chat: &Jid,
        message_id: &str,
        emoji: &str,
    ) -> Result<(), WahubError>;

    /// Marks messages as read in a conversation.
    async fn mark_read(&self, chat: &Jid, message_ids: &[String]) -> Result<(), WahubError>;

    /// Toggles a transient presence state (composing, paused) in a chat.
    async fn send_presence(&self, chat: &Jid, presence: Presence) -> Result<(), WahubError>;

    /// Logs the account out, invalidating the stored credentials.
    async fn logout(&self) -> Result<(), WahubError>;

    /// Requests a pairing code for phone-number linking.
    async fn request_pairing_code(&self, phone: &str) -> Result<String, WahubError>;

    /// Fetches group metadata, including the participant list with roles.
    async fn group_metadata(&self, group: &Jid) -> Result<GroupMetadata, WahubError>;

    /// Applies a membership mutation (add/remove/promote/demote).
    async fn group_participants_update(
        &self,
        group: &Jid,
        participants: &[Jid],
        action: ParticipantAction,
    ) -> Result<(), WahubError>;

    /// The connected account's own identity, once known.
    fn identity(&self) -> Option<WaIdentity>;
}
