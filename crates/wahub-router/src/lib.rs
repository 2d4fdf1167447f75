// SPDX-FileCopyrightText: 2026 Wahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound message routing for Wahub tenant sessions.
//!
//! Each batch of protocol messages passes through the [`MessageRouter`],
//! which handles every message independently: read receipts and presence,
//! passive auto-behaviors (media reactions, greeting replies), and
//! command extraction for the dispatcher. A failure in one message never
//! aborts the rest of the batch.

pub mod passive;

use std::sync::Arc;

use tracing::{debug, warn};

use wahub_command::{dispatch, CommandContext, CommandRegistry, DispatchOutcome};
use wahub_core::error::WahubError;
use wahub_core::traits::{RecordStore, WaSocket};
use wahub_core::types::{TenantId, TenantSettings, WaMessage};
use wahub_core::wire::Presence;

/// Routes inbound messages to passive behaviors and the command dispatcher.
pub struct MessageRouter {
    registry: Arc<CommandRegistry>,
    store: Arc<dyn RecordStore>,
}

/// What the router did with one message, for telemetry and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Authored by the bot's own account; skipped.
    OwnMessage,
    /// Handled passively (reaction, greeting, or nothing actionable).
    Passive,
    /// Handed to the dispatcher.
    Command(DispatchOutcome),
}

impl MessageRouter {
    pub fn new(registry: Arc<CommandRegistry>, store: Arc<dyn RecordStore>) -> Self {
        Self { registry, store }
    }

    /// Processes a batch of inbound messages for one tenant.
    ///
    /// Per-message isolation: each message is routed inside its own error
    /// boundary, so one malformed message cannot abort the remainder.
    pub async fn route_batch(
        &self,
        tenant: &TenantId,
        socket: &Arc<dyn WaSocket>,
        messages: &[WaMessage],
    ) -> Vec<RouteOutcome> {
        let mut outcomes = Vec::with_capacity(messages.len());
        for msg in messages {
            match self.route_one(tenant, socket, msg).await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    warn!(tenant = %tenant, msg_id = %msg.id, error = %e,
                        "message routing failed, continuing batch");
                    outcomes.push(RouteOutcome::Passive);
                }
            }
        }
        outcomes
    }

    async fn route_one(
        &self,
        tenant: &TenantId,
        socket: &Arc<dyn WaSocket>,
        msg: &WaMessage,
    ) -> Result<RouteOutcome, WahubError> {
        if msg.from_me {
            return Ok(RouteOutcome::OwnMessage);
        }

        // Settings gate dispatch and are re-read per message.
        let settings = match self.store.get_settings(tenant).await {
            Ok(s) => s,
            Err(e) => {
                warn!(tenant = %tenant, error = %e, "settings read failed, using defaults");
                TenantSettings::default()
            }
        };

        // Telemetry first so a later failure still counts the message.
        if let Err(e) = self.store.increment_message_count(tenant).await {
            debug!(tenant = %tenant, error = %e, "message counter increment failed");
        }

        if settings.auto_read {
            if let Err(e) = socket.mark_read(&msg.chat, &[msg.id.clone()]).await {
                debug!(error = %e, "mark read failed");
            }
        }
        if let Err(e) = socket.send_presence(&msg.chat, Presence::Composing).await {
            debug!(error = %e, "composing presence failed");
        }

        let outcome = self.route_content(tenant, socket, msg, &settings).await;

        if let Err(e) = socket.send_presence(&msg.chat, Presence::Paused).await {
            debug!(error = %e, "paused presence failed");
        }

        outcome
    }

    async fn route_content(
        &self,
        tenant: &TenantId,
        socket: &Arc<dyn WaSocket>,
        msg: &WaMessage,
        settings: &TenantSettings,
    ) -> Result<RouteOutcome, WahubError> {
        if msg.content.is_media() {
            passive::react_to_media(socket, msg).await;
        }

        let Some(text) = msg.content.text() else {
            return Ok(RouteOutcome::Passive);
        };
        let text = text.trim();

        if let Some(rest) = text.strip_prefix(settings.prefix.as_str()) {
            let mut tokens = rest.split_whitespace();
            let Some(trigger) = tokens.next() else {
                // Bare prefix with nothing after it.
                return Ok(RouteOutcome::Passive);
            };
            let trigger = trigger.to_lowercase();
            let args: Vec<String> = tokens.map(str::to_string).collect();

            if let Err(e) = self.store.increment_command_count(tenant).await {
                debug!(tenant = %tenant, error = %e, "command counter increment failed");
            }

            let ctx = CommandContext {
                tenant,
                message: msg,
                args: &args,
                settings,
                socket,
                store: &self.store,
                registry: &self.registry,
            };
            return Ok(RouteOutcome::Command(dispatch(&trigger, &ctx).await));
        }

        if settings.greeting_reply && passive::is_greeting(text) {
            passive::spawn_greeting_reply(socket, msg);
        }

        Ok(RouteOutcome::Passive)
    }
}
