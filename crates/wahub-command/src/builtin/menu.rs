// SPDX-FileCopyrightText: 2026 Wahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command listing.

use std::fmt::Write as _;

use async_trait::async_trait;

use wahub_core::error::WahubError;

use crate::registry::{CommandContext, CommandHandler, CommandSpec};

pub fn spec() -> CommandSpec {
    CommandSpec::new(&["menu", "help"], "List available commands")
}

/// Renders the registry listing with the tenant's configured prefix.
pub struct MenuCommand;

#[async_trait]
impl CommandHandler for MenuCommand {
    async fn run(&self, ctx: &CommandContext<'_>) -> Result<(), WahubError> {
        let prefix = &ctx.settings.prefix;
        let mut text = String::from("Available commands:\n");
        for (trigger, description) in ctx.registry.list() {
            let disabled = if ctx.settings.is_disabled(trigger) {
                " (disabled)"
            } else {
                ""
            };
            let _ = writeln!(text, "{prefix}{trigger} - {description}{disabled}");
        }
        ctx.reply(text.trim_end()).await
    }
}
