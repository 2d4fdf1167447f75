// SPDX-FileCopyrightText: 2026 Wahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Liveness check command.

use async_trait::async_trait;

use wahub_core::error::WahubError;

use crate::registry::{CommandContext, CommandHandler, CommandSpec};

pub fn spec() -> CommandSpec {
    CommandSpec {
        react: Some("\u{1F3D3}"), // ping-pong paddle
        ..CommandSpec::new(&["ping"], "Check that the bot is alive")
    }
}

/// Replies with a fixed pong message.
pub struct PingCommand;

#[async_trait]
impl CommandHandler for PingCommand {
    async fn run(&self, ctx: &CommandContext<'_>) -> Result<(), WahubError> {
        ctx.reply("Pong!").await
    }
}
