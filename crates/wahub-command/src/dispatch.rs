// SPDX-FileCopyrightText: 2026 Wahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command dispatch: permission gating and handler invocation.
//!
//! Checks run in a fixed order and the first failing check short-circuits:
//! unknown trigger, disabled trigger, owner requirement, admin requirement,
//! group/private scope, self-only requirement. Admin resolution queries
//! group metadata fresh per invocation; a failed fetch (including "not a
//! group") counts as not-admin rather than an error. A handler failure is
//! contained here and reported to the conversation; it never propagates to
//! the router or the session manager.

use tracing::{debug, warn};

use wahub_core::error::WahubError;

use crate::registry::CommandContext;

const DISABLED_NOTICE: &str = "That command is disabled for this bot.";
const OWNER_NOTICE: &str = "Only the bot owner can use this command.";
const ADMIN_NOTICE: &str = "Only group admins can use this command.";
const GROUP_NOTICE: &str = "This command can only be used in a group chat.";
const PRIVATE_NOTICE: &str = "This command can only be used in a private chat.";
const SELF_NOTICE: &str = "This command can only be used by the bot account itself.";
const HANDLER_FAILED_NOTICE: &str = "The command failed to run. Please try again.";

/// What the dispatcher did with a resolved trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Trigger not in the registry; commands are optional matches.
    Unknown,
    /// Tenant settings disable this trigger.
    Disabled,
    /// A permission or scope check rejected the invocation.
    Denied,
    /// The handler ran to completion.
    Ran,
    /// The handler raised; the failure was contained and reported.
    Failed,
}

/// Resolves and runs a command for an inbound message.
///
/// Never returns an error: every failure mode is converted into a
/// conversational reply and an outcome value.
pub async fn dispatch(trigger: &str, ctx: &CommandContext<'_>) -> DispatchOutcome {
    let Some(entry) = ctx.registry.get(trigger) else {
        return DispatchOutcome::Unknown;
    };
    let spec = &entry.spec;

    if ctx.settings.is_disabled(trigger) {
        notice(ctx, DISABLED_NOTICE).await;
        return DispatchOutcome::Disabled;
    }

    if spec.owner_only {
        let is_owner = ctx
            .settings
            .owner
            .as_ref()
            .is_some_and(|owner| owner == &ctx.message.sender);
        if !is_owner && !ctx.message.from_me {
            notice(ctx, OWNER_NOTICE).await;
            return DispatchOutcome::Denied;
        }
    }

    if spec.admin_only {
        // Admin status only exists inside a group; outside one this is a
        // scope failure, not a permission failure.
        if !ctx.message.chat.is_group() {
            notice(ctx, GROUP_NOTICE).await;
            return DispatchOutcome::Denied;
        }
        if !sender_is_admin(ctx).await {
            notice(ctx, ADMIN_NOTICE).await;
            return DispatchOutcome::Denied;
        }
    }

    if spec.group_only && !ctx.message.chat.is_group() {
        notice(ctx, GROUP_NOTICE).await;
        return DispatchOutcome::Denied;
    }

    if spec.private_only && ctx.message.chat.is_group() {
        notice(ctx, PRIVATE_NOTICE).await;
        return DispatchOutcome::Denied;
    }

    if spec.from_me_only && !ctx.message.from_me {
        notice(ctx, SELF_NOTICE).await;
        return DispatchOutcome::Denied;
    }

    if let Some(emoji) = spec.react {
        if let Err(e) = ctx
            .socket
            .send_reaction(&ctx.message.chat, &ctx.message.id, emoji)
            .await
        {
            debug!(error = %e, trigger, "reaction failed, continuing");
        }
    }

    match entry.handler.run(ctx).await {
        Ok(()) => DispatchOutcome::Ran,
        Err(e) => {
            let err = WahubError::Handler {
                command: trigger.to_string(),
                message: e.to_string(),
            };
            warn!(tenant = %ctx.tenant, error = %err, "command handler failed");
            notice(ctx, HANDLER_FAILED_NOTICE).await;
            DispatchOutcome::Failed
        }
    }
}

/// Fetch-then-check admin resolution against the current participant list.
/// Any metadata failure is treated as "not admin".
async fn sender_is_admin(ctx: &CommandContext<'_>) -> bool {
    match ctx.socket.group_metadata(&ctx.message.chat).await {
        Ok(meta) => meta.is_admin(&ctx.message.sender),
        Err(e) => {
            debug!(error = %e, chat = %ctx.message.chat, "group metadata fetch failed");
            false
        }
    }
}

/// Best-effort conversational notice; a failed send is logged, not raised.
async fn notice(ctx: &CommandContext<'_>, text: &str) {
    if let Err(e) = ctx.reply(text).await {
        warn!(tenant = %ctx.tenant, error = %e, "failed to send dispatch notice");
    }
}
