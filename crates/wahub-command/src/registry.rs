// SPDX-FileCopyrightText: 2026 Wahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command trait and registry.
//!
//! The [`CommandRegistry`] is built once at startup by explicit
//! registration calls (no runtime plugin loading) and is read-only
//! afterward, which makes unsynchronized concurrent reads safe. A spec
//! with several triggers registers the same handler under each one;
//! trigger collisions favor the most recent registration. That
//! last-write-wins policy is deliberate, not an error.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use wahub_core::error::WahubError;
use wahub_core::traits::{RecordStore, WaSocket};
use wahub_core::types::{TenantId, TenantSettings, WaMessage};

/// Static description of a command: triggers, scope requirements, and the
/// optional reaction emoji sent before the handler runs.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    /// Trigger tokens this command answers to; the first is primary.
    pub triggers: &'static [&'static str],
    pub description: &'static str,
    /// Only usable inside a group conversation.
    pub group_only: bool,
    /// Only usable in a private (non-group) conversation.
    pub private_only: bool,
    /// Sender must be an admin of the group.
    pub admin_only: bool,
    /// Sender must match the tenant's configured owner JID.
    pub owner_only: bool,
    /// Only the bot's own account may invoke it.
    pub from_me_only: bool,
    /// Reaction emoji sent to the triggering message, best-effort.
    pub react: Option<&'static str>,
}

impl CommandSpec {
    /// A spec with the given triggers and description and no restrictions.
    pub const fn new(triggers: &'static [&'static str], description: &'static str) -> Self {
        Self {
            triggers,
            description,
            group_only: false,
            private_only: false,
            admin_only: false,
            owner_only: false,
            from_me_only: false,
            react: None,
        }
    }

    pub fn primary_trigger(&self) -> &'static str {
        self.triggers.first().copied().unwrap_or("")
    }
}

/// Everything a handler needs: the triggering message, parsed arguments,
/// tenant settings, and the scoped send capability.
pub struct CommandContext<'a> {
    pub tenant: &'a TenantId,
    pub message: &'a WaMessage,
    pub args: &'a [String],
    pub settings: &'a TenantSettings,
    pub socket: &'a Arc<dyn WaSocket>,
    pub store: &'a Arc<dyn RecordStore>,
    pub registry: &'a CommandRegistry,
}

impl CommandContext<'_> {
    /// Replies in the conversation the command came from.
    pub async fn reply(&self, text: &str) -> Result<(), WahubError> {
        self.socket.send_message(&self.message.chat, text).await
    }
}

/// A command implementation invoked by the dispatcher.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn run(&self, ctx: &CommandContext<'_>) -> Result<(), WahubError>;
}

/// One registered command: its spec plus handler.
pub struct CommandEntry {
    pub spec: CommandSpec,
    pub handler: Arc<dyn CommandHandler>,
}

/// Registry of available commands, indexed by trigger.
pub struct CommandRegistry {
    commands: HashMap<String, Arc<CommandEntry>>,
}

impl CommandRegistry {
    /// Creates an empty command registry.
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// Registers a command under every trigger in its spec.
    ///
    /// A collision replaces the previous entry for that trigger
    /// (last-write-wins).
    pub fn register(&mut self, spec: CommandSpec, handler: Arc<dyn CommandHandler>) {
        let entry = Arc::new(CommandEntry {
            spec: spec.clone(),
            handler,
        });
        for trigger in spec.triggers {
            let key = trigger.to_lowercase();
            if self.commands.insert(key.clone(), Arc::clone(&entry)).is_some() {
                debug!(trigger = %key, "trigger re-registered, previous handler replaced");
            }
        }
    }

    /// Looks up the command entry for a trigger (compared lowercase).
    pub fn get(&self, trigger: &str) -> Option<Arc<CommandEntry>> {
        self.commands.get(trigger).cloned()
    }

    /// Returns `(primary_trigger, description)` pairs for every distinct
    /// command, sorted by primary trigger.
    pub fn list(&self) -> Vec<(&'static str, &'static str)> {
        let mut entries: Vec<(&'static str, &'static str)> = self
            .commands
            .values()
            .map(|e| (e.spec.primary_trigger(), e.spec.description))
            .collect();
        entries.sort_by_key(|(name, _)| *name);
        entries.dedup_by_key(|(name, _)| *name);
        entries
    }

    /// Number of registered triggers (aliases counted individually).
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}
