// SPDX-FileCopyrightText: 2026 Wahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Passive auto-behaviors: media receipt reactions and greeting replies.

use std::sync::Arc;
use std::time::Duration;

use rand::seq::SliceRandom;
use tracing::debug;

use wahub_core::traits::WaSocket;
use wahub_core::types::{MessageContent, WaMessage};

/// Delay before a greeting reply goes out.
const GREETING_DELAY: Duration = Duration::from_millis(1500);

/// Greeting vocabulary, matched as a case-insensitive substring.
const GREETING_WORDS: &[&str] = &[
    "hello", "hi", "hey", "hola", "salam", "good morning", "good evening",
];

const GREETING_REPLIES: &[&str] = &[
    "Hello! \u{1F44B}",
    "Hey there!",
    "Hi! How can I help?",
    "Greetings! \u{1F916}",
];

/// Emoji acknowledging receipt of a media message.
pub fn receipt_emoji(content: &MessageContent) -> Option<&'static str> {
    match content {
        MessageContent::Image { .. } => Some("\u{1F4F8}"),
        MessageContent::Video { .. } => Some("\u{1F3A5}"),
        MessageContent::Audio => Some("\u{1F3B5}"),
        MessageContent::Document { .. } => Some("\u{1F4C4}"),
        MessageContent::Sticker => Some("\u{1F44D}"),
        _ => None,
    }
}

/// Reacts to a media message, best-effort.
pub async fn react_to_media(socket: &Arc<dyn WaSocket>, msg: &WaMessage) {
    let Some(emoji) = receipt_emoji(&msg.content) else {
        return;
    };
    if let Err(e) = socket.send_reaction(&msg.chat, &msg.id, emoji).await {
        debug!(error = %e, chat = %msg.chat, "media reaction failed");
    }
}

/// Whether the text matches the greeting vocabulary.
pub fn is_greeting(text: &str) -> bool {
    let lower = text.to_lowercase();
    GREETING_WORDS.iter().any(|w| lower.contains(w))
}

/// Queues a randomly chosen greeting reply after a short delay.
///
/// The send runs on a spawned task so a greeting never stalls the rest
/// of the batch; a reply over a closed socket fails quietly.
pub fn spawn_greeting_reply(socket: &Arc<dyn WaSocket>, msg: &WaMessage) {
    let reply = {
        let mut rng = rand::thread_rng();
        GREETING_REPLIES
            .choose(&mut rng)
            .copied()
            .unwrap_or(GREETING_REPLIES[0])
    };
    let socket = Arc::clone(socket);
    let chat = msg.chat.clone();
    tokio::spawn(async move {
        tokio::time::sleep(GREETING_DELAY).await;
        if let Err(e) = socket.send_message(&chat, reply).await {
            debug!(error = %e, chat = %chat, "greeting reply failed");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_match_is_case_insensitive_substring() {
        assert!(is_greeting("HELLO everyone"));
        assert!(is_greeting("well hi there"));
        assert!(is_greeting("Good Morning!"));
        assert!(!is_greeting("what is the weather"));
    }

    #[test]
    fn receipt_emoji_covers_media_only() {
        assert!(receipt_emoji(&MessageContent::Image { caption: None }).is_some());
        assert!(receipt_emoji(&MessageContent::Video { caption: None }).is_some());
        assert!(receipt_emoji(&MessageContent::Audio).is_some());
        assert!(receipt_emoji(&MessageContent::Document { caption: None }).is_some());
        assert!(receipt_emoji(&MessageContent::Sticker).is_some());
        assert!(receipt_emoji(&MessageContent::Text("hi".into())).is_none());
        assert!(receipt_emoji(&MessageContent::Other).is_none());
    }
}
