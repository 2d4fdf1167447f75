// SPDX-FileCopyrightText: 2026 Wahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound message builders.

use wahub_core::types::{Jid, MessageContent, WaMessage};

static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);

fn next_id() -> String {
    format!(
        "MSG{}",
        COUNTER.fetch_add(1, std::sync::atomic::Ordering::Relaxed)
    )
}

/// A plain text message in a private chat.
pub fn private_text(sender: &str, text: &str) -> WaMessage {
    WaMessage {
        id: next_id(),
        chat: Jid::from(sender),
        sender: Jid::from(sender),
        from_me: false,
        push_name: None,
        content: MessageContent::Text(text.to_string()),
        mentions: Vec::new(),
    }
}

/// A plain text message in a group chat.
pub fn group_text(group: &str, sender: &str, text: &str) -> WaMessage {
    WaMessage {
        id: next_id(),
        chat: Jid::from(group),
        sender: Jid::from(sender),
        from_me: false,
        push_name: None,
        content: MessageContent::Text(text.to_string()),
        mentions: Vec::new(),
    }
}
