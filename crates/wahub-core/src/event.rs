// SPDX-FileCopyrightText: 2026 Wahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Events published to per-tenant observers.
//!
//! Delivery is fire-and-forget: observability, not correctness. Browser
//! clients subscribe to their tenant room and render whatever arrives.

use serde::{Deserialize, Serialize};

/// A state-change notification for one tenant's session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A fresh QR payload rendered as an image data URL.
    Qr { data_url: String },
    /// The pending QR expired without being scanned.
    QrExpired,
    /// A pairing code to enter on the phone.
    PairingCode { code: String },
    Connecting,
    /// Connected; carries the account identity.
    Connected {
        jid: String,
        name: Option<String>,
    },
    Disconnected,
    /// A reconnect is scheduled.
    Reconnecting { attempt: u32, delay_ms: u64 },
    /// The account was logged out; the session was torn down.
    LoggedOut,
    /// A terminal or transient error, described for display.
    Error { message: String },
    /// A log line appended to the tenant's ring buffer.
    Log { line: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_tagged() {
        let e = SessionEvent::Reconnecting {
            attempt: 2,
            delay_ms: 10_000,
        };
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains(r#""event":"reconnecting""#));
        assert!(json.contains(r#""attempt":2"#));

        let back: SessionEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, e);
    }

    #[test]
    fn qr_event_carries_data_url() {
        let e = SessionEvent::Qr {
            data_url: "data:image/svg+xml;base64,AAAA".into(),
        };
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains("data:image/svg+xml"));
    }
}
