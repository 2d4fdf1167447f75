// SPDX-FileCopyrightText: 2026 Wahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Group administration commands: kick, promote, demote.
//!
//! All three act on the JIDs mentioned in the triggering message. With no
//! mentions they reply with usage text and never touch the group.

use async_trait::async_trait;

use wahub_core::error::WahubError;
use wahub_core::wire::ParticipantAction;

use crate::registry::{CommandContext, CommandHandler, CommandSpec};

pub fn kick_spec() -> CommandSpec {
    CommandSpec {
        group_only: true,
        admin_only: true,
        ..CommandSpec::new(&["kick", "remove"], "Remove mentioned members from the group")
    }
}

pub fn promote_spec() -> CommandSpec {
    CommandSpec {
        group_only: true,
        admin_only: true,
        ..CommandSpec::new(&["promote"], "Make mentioned members group admins")
    }
}

pub fn demote_spec() -> CommandSpec {
    CommandSpec {
        group_only: true,
        admin_only: true,
        ..CommandSpec::new(&["demote"], "Remove admin from mentioned members")
    }
}

async fn apply_to_mentions(
    ctx: &CommandContext<'_>,
    action: ParticipantAction,
    usage: &str,
    done: &str,
) -> Result<(), WahubError> {
    if ctx.message.mentions.is_empty() {
        return ctx.reply(usage).await;
    }
    ctx.socket
        .group_participants_update(&ctx.message.chat, &ctx.message.mentions, action)
        .await?;
    ctx.reply(done).await
}

/// Removes mentioned members from the group.
pub struct KickCommand;

#[async_trait]
impl CommandHandler for KickCommand {
    async fn run(&self, ctx: &CommandContext<'_>) -> Result<(), WahubError> {
        apply_to_mentions(
            ctx,
            ParticipantAction::Remove,
            "Mention the members to remove, e.g. `kick @user`.",
            "Removed.",
        )
        .await
    }
}

/// Promotes mentioned members to admin.
pub struct PromoteCommand;

#[async_trait]
impl CommandHandler for PromoteCommand {
    async fn run(&self, ctx: &CommandContext<'_>) -> Result<(), WahubError> {
        apply_to_mentions(
            ctx,
            ParticipantAction::Promote,
            "Mention the members to promote, e.g. `promote @user`.",
            "Promoted.",
        )
        .await
    }
}

/// Demotes mentioned admins back to members.
pub struct DemoteCommand;

#[async_trait]
impl CommandHandler for DemoteCommand {
    async fn run(&self, ctx: &CommandContext<'_>) -> Result<(), WahubError> {
        apply_to_mentions(
            ctx,
            ParticipantAction::Demote,
            "Mention the admins to demote, e.g. `demote @user`.",
            "Demoted.",
        )
        .await
    }
}
