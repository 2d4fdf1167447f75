// SPDX-FileCopyrightText: 2026 Wahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire-level types exchanged with the underlying connection library.
//!
//! The protocol implementation itself is opaque to Wahub; these types
//! describe only the event surface and data shapes it delivers.

use serde::{Deserialize, Serialize};

use crate::types::{Jid, WaMessage};

/// Protocol-level connection phase reported by the socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireState {
    Connecting,
    Open,
    Close,
}

/// Why the underlying connection closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisconnectReason {
    /// The account was logged out; terminal, never reconnected.
    LoggedOut,
    ConnectionClosed,
    ConnectionLost,
    TimedOut,
    RestartRequired,
    /// Any other protocol status code.
    Other(u16),
}

impl DisconnectReason {
    /// Every close is reconnect-eligible except a logout.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, DisconnectReason::LoggedOut)
    }
}

/// A connection-state transition delivered by the socket.
#[derive(Debug, Clone)]
pub struct ConnectionUpdate {
    pub state: WireState,
    /// Raw QR payload to render, present while waiting for a scan.
    pub qr: Option<String>,
    /// Present on [`WireState::Close`].
    pub reason: Option<DisconnectReason>,
    /// True when this transition completed a fresh device registration.
    pub is_new_login: bool,
}

impl ConnectionUpdate {
    pub fn open() -> Self {
        Self {
            state: WireState::Open,
            qr: None,
            reason: None,
            is_new_login: false,
        }
    }

    pub fn connecting() -> Self {
        Self {
            state: WireState::Connecting,
            qr: None,
            reason: None,
            is_new_login: false,
        }
    }

    pub fn close(reason: DisconnectReason) -> Self {
        Self {
            state: WireState::Close,
            qr: None,
            reason: Some(reason),
            is_new_login: false,
        }
    }

    pub fn qr(payload: impl Into<String>) -> Self {
        Self {
            state: WireState::Connecting,
            qr: Some(payload.into()),
            reason: None,
            is_new_login: false,
        }
    }
}

/// Durable credential and key material for one tenant's session.
///
/// The contents are owned by the protocol library; Wahub persists the blob
/// verbatim on every credential-update event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthState {
    /// True once the device has completed registration (QR scan or pairing).
    pub registered: bool,
    /// Opaque credential blob from the protocol library.
    pub creds: serde_json::Value,
}

/// A single typed event from the underlying connection, consumed by one
/// dispatch loop per session.
#[derive(Debug, Clone)]
pub enum WaEvent {
    Connection(ConnectionUpdate),
    /// Updated credential material to persist.
    CredsUpdate(AuthState),
    /// A batch of inbound messages.
    Messages(Vec<WaMessage>),
}

/// The connected account's identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaIdentity {
    pub jid: Jid,
    pub name: Option<String>,
}

/// Presence state toggled while processing a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Composing,
    Paused,
    Available,
}

/// Role of a participant within a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupRole {
    Member,
    Admin,
    SuperAdmin,
}

impl GroupRole {
    pub fn is_admin(&self) -> bool {
        matches!(self, GroupRole::Admin | GroupRole::SuperAdmin)
    }
}

/// One participant entry from fetched group metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupParticipant {
    pub jid: Jid,
    pub role: GroupRole,
}

/// Metadata for a group conversation, fetched fresh per query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupMetadata {
    pub id: Jid,
    pub subject: String,
    pub participants: Vec<GroupParticipant>,
}

impl GroupMetadata {
    /// Whether the given JID is currently an admin of this group.
    pub fn is_admin(&self, jid: &Jid) -> bool {
        self.participants
            .iter()
            .any(|p| &p.jid == jid && p.role.is_admin())
    }
}

/// Membership mutation applied through the socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticipantAction {
    Add,
    Remove,
    Promote,
    Demote,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logged_out_is_terminal() {
        assert!(!DisconnectReason::LoggedOut.is_recoverable());
        assert!(DisconnectReason::ConnectionLost.is_recoverable());
        assert!(DisconnectReason::RestartRequired.is_recoverable());
        assert!(DisconnectReason::Other(503).is_recoverable());
    }

    #[test]
    fn group_role_admin_check() {
        assert!(GroupRole::Admin.is_admin());
        assert!(GroupRole::SuperAdmin.is_admin());
        assert!(!GroupRole::Member.is_admin());
    }

    #[test]
    fn group_metadata_admin_lookup() {
        let meta = GroupMetadata {
            id: Jid::from("123@g.us"),
            subject: "test group".into(),
            participants: vec![
                GroupParticipant {
                    jid: Jid::from("1@s.whatsapp.net"),
                    role: GroupRole::Admin,
                },
                GroupParticipant {
                    jid: Jid::from("2@s.whatsapp.net"),
                    role: GroupRole::Member,
                },
            ],
        };
        assert!(meta.is_admin(&Jid::from("1@s.whatsapp.net")));
        assert!(!meta.is_admin(&Jid::from("2@s.whatsapp.net")));
        assert!(!meta.is_admin(&Jid::from("3@s.whatsapp.net")));
    }

    #[test]
    fn connection_update_constructors() {
        assert_eq!(ConnectionUpdate::open().state, WireState::Open);
        assert_eq!(ConnectionUpdate::connecting().state, WireState::Connecting);
        let close = ConnectionUpdate::close(DisconnectReason::LoggedOut);
        assert_eq!(close.state, WireState::Close);
        assert_eq!(close.reason, Some(DisconnectReason::LoggedOut));
        let qr = ConnectionUpdate::qr("payload");
        assert_eq!(qr.qr.as_deref(), Some("payload"));
    }
}
