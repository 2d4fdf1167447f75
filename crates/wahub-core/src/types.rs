// SPDX-FileCopyrightText: 2026 Wahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across the Wahub workspace.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::error::WahubError;

/// Opaque identifier for one registered platform user. Each tenant owns
/// exactly one managed messaging session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantId(pub String);

impl TenantId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TenantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TenantId {
    fn from(s: &str) -> Self {
        TenantId(s.to_string())
    }
}

/// A WhatsApp address (user or group).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Jid(pub String);

impl Jid {
    /// Group conversations carry the `@g.us` server suffix.
    pub fn is_group(&self) -> bool {
        self.0.ends_with("@g.us")
    }

    /// The part before `@`, typically the phone number for user JIDs.
    pub fn user_part(&self) -> &str {
        self.0.split('@').next().unwrap_or(&self.0)
    }
}

impl std::fmt::Display for Jid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Jid {
    fn from(s: &str) -> Self {
        Jid(s.to_string())
    }
}

/// How a session authenticates with the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AuthMethod {
    /// Scan a QR image rendered from the pairing payload.
    Qr,
    /// Link via a short alphanumeric code tied to a phone number.
    Pairing,
}

/// Per-tenant connection state as seen by the session manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ConnectionState {
    Idle,
    Connecting,
    Authenticating,
    Connected,
    Disconnected,
    Error,
}

/// Normalizes a phone number for pairing-code authentication.
///
/// Strips every non-digit character and accepts the result only when it is
/// 10 to 15 digits long. `"+1 (555) 123-4567"` normalizes to `"15551234567"`;
/// `"123"` is rejected.
pub fn normalize_phone(input: &str) -> Result<String, WahubError> {
    let digits: String = input.chars().filter(char::is_ascii_digit).collect();
    if digits.len() < 10 || digits.len() > 15 {
        return Err(WahubError::AuthInput(format!(
            "phone number must normalize to 10-15 digits, got {} from {input:?}",
            digits.len()
        )));
    }
    Ok(digits)
}

/// Content of an inbound message, classified by type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageContent {
    /// Plain conversation text.
    Text(String),
    /// Extended text (quoted replies, links).
    ExtendedText(String),
    Image { caption: Option<String> },
    Video { caption: Option<String> },
    Audio,
    Document { caption: Option<String> },
    Sticker,
    /// Anything the router does not classify further.
    Other,
}

impl MessageContent {
    /// The textual payload: conversation text, extended-text body, or media
    /// caption. `None` for content with no text.
    pub fn text(&self) -> Option<&str> {
        match self {
            MessageContent::Text(t) | MessageContent::ExtendedText(t) => Some(t),
            MessageContent::Image { caption }
            | MessageContent::Video { caption }
            | MessageContent::Document { caption } => caption.as_deref(),
            MessageContent::Audio | MessageContent::Sticker | MessageContent::Other => None,
        }
    }

    /// True for media types that receive an automatic receipt reaction.
    pub fn is_media(&self) -> bool {
        matches!(
            self,
            MessageContent::Image { .. }
                | MessageContent::Video { .. }
                | MessageContent::Audio
                | MessageContent::Document { .. }
                | MessageContent::Sticker
        )
    }
}

/// An inbound message delivered by the underlying connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaMessage {
    /// Protocol-level message id, used for read receipts and reactions.
    pub id: String,
    /// The conversation this message belongs to (user or group JID).
    pub chat: Jid,
    /// The author of the message.
    pub sender: Jid,
    /// True when the bot's own account authored the message.
    pub from_me: bool,
    /// Display name of the sender, if the protocol provided one.
    pub push_name: Option<String>,
    pub content: MessageContent,
    /// JIDs mentioned in the message body.
    pub mentions: Vec<Jid>,
}

/// Per-tenant behavior settings, one JSON document per tenant.
///
/// Read on every inbound message to gate dispatch; written only via the
/// settings-update operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TenantSettings {
    /// Command prefix; messages starting with it are dispatched.
    pub prefix: String,
    /// JID of the tenant's configured owner, for owner-only commands.
    pub owner: Option<Jid>,
    /// Triggers disabled for this tenant.
    pub disabled_commands: BTreeSet<String>,
    /// Mark inbound messages as read.
    pub auto_read: bool,
    /// Reply to greeting vocabulary with a canned response.
    pub greeting_reply: bool,
}

impl Default for TenantSettings {
    fn default() -> Self {
        Self {
            prefix: ".".to_string(),
            owner: None,
            disabled_commands: BTreeSet::new(),
            auto_read: true,
            greeting_reply: true,
        }
    }
}

impl TenantSettings {
    /// Whether the given trigger is disabled for this tenant.
    pub fn is_disabled(&self, trigger: &str) -> bool {
        self.disabled_commands.contains(trigger)
    }
}

/// Per-tenant counters, one JSON document per tenant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TenantStats {
    pub messages: u64,
    pub commands: u64,
    pub bot_connected: bool,
    /// RFC3339 timestamp of the last successful connect.
    pub last_connected_at: Option<String>,
}
