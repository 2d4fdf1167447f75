// SPDX-FileCopyrightText: 2026 Wahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Owner-only settings commands.

use async_trait::async_trait;

use wahub_core::error::WahubError;

use crate::registry::{CommandContext, CommandHandler, CommandSpec};

pub fn spec() -> CommandSpec {
    CommandSpec {
        owner_only: true,
        ..CommandSpec::new(&["setprefix"], "Change the command prefix")
    }
}

/// Persists a new command prefix for the tenant.
pub struct SetPrefixCommand;

#[async_trait]
impl CommandHandler for SetPrefixCommand {
    async fn run(&self, ctx: &CommandContext<'_>) -> Result<(), WahubError> {
        let Some(prefix) = ctx.args.first() else {
            return ctx.reply("Usage: setprefix <new-prefix>").await;
        };
        if prefix.len() > 3 {
            return ctx.reply("Prefix must be at most 3 characters.").await;
        }

        let mut settings = ctx.settings.clone();
        settings.prefix = prefix.clone();
        ctx.store.update_settings(ctx.tenant, &settings).await?;

        ctx.reply(&format!("Prefix changed to {prefix}")).await
    }
}
