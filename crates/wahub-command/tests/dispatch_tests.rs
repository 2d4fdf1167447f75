// SPDX-FileCopyrightText: 2026 Wahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dispatcher behavior: permission ordering, scope gating, disabled
//! triggers, and handler failure containment.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use wahub_command::{
    dispatch, register_builtins, CommandContext, CommandHandler, CommandRegistry, CommandSpec,
    DispatchOutcome,
};
use wahub_core::error::WahubError;
use wahub_core::traits::{RecordStore, WaSocket};
use wahub_core::types::{Jid, TenantId, TenantSettings, WaMessage};
use wahub_core::wire::{GroupMetadata, GroupParticipant, GroupRole};
use wahub_test_utils::{group_text, private_text, MemoryRecordStore, MockSocket};

const GROUP: &str = "120363@g.us";
const ADMIN: &str = "1111111111@s.whatsapp.net";
const MEMBER: &str = "2222222222@s.whatsapp.net";

struct Fixture {
    tenant: TenantId,
    registry: CommandRegistry,
    socket: Arc<MockSocket>,
    socket_dyn: Arc<dyn WaSocket>,
    store: Arc<dyn RecordStore>,
    settings: TenantSettings,
}

impl Fixture {
    fn new() -> Self {
        let mut registry = CommandRegistry::new();
        register_builtins(&mut registry);

        let socket = Arc::new(MockSocket::new());
        socket.set_group(GroupMetadata {
            id: Jid::from(GROUP),
            subject: "test group".into(),
            participants: vec![
                GroupParticipant {
                    jid: Jid::from(ADMIN),
                    role: GroupRole::Admin,
                },
                GroupParticipant {
                    jid: Jid::from(MEMBER),
                    role: GroupRole::Member,
                },
            ],
        });

        Self {
            tenant: TenantId::from("t1"),
            registry,
            socket_dyn: Arc::clone(&socket) as Arc<dyn WaSocket>,
            socket,
            store: Arc::new(MemoryRecordStore::new()),
            settings: TenantSettings::default(),
        }
    }

    async fn dispatch(&self, trigger: &str, args: &[String], message: &WaMessage) -> DispatchOutcome {
        let ctx = CommandContext {
            tenant: &self.tenant,
            message,
            args,
            settings: &self.settings,
            socket: &self.socket_dyn,
            store: &self.store,
            registry: &self.registry,
        };
        dispatch(trigger, &ctx).await
    }
}

#[tokio::test]
async fn unknown_trigger_is_a_silent_noop() {
    let fx = Fixture::new();
    let msg = private_text(MEMBER, ".frobnicate");
    assert_eq!(fx.dispatch("frobnicate", &[], &msg).await, DispatchOutcome::Unknown);
    assert!(fx.socket.sent_texts().is_empty());
}

#[tokio::test]
async fn kick_in_private_chat_gets_scope_notice_without_handler_call() {
    let fx = Fixture::new();
    let msg = private_text(ADMIN, ".kick");

    assert_eq!(fx.dispatch("kick", &[], &msg).await, DispatchOutcome::Denied);

    let texts = fx.socket.sent_texts();
    assert_eq!(texts.len(), 1);
    assert!(texts[0].contains("group chat"));
    assert!(fx.socket.log.participant_updates.lock().unwrap().is_empty());
}

#[tokio::test]
async fn kick_by_non_admin_gets_permission_notice() {
    let fx = Fixture::new();
    let msg = group_text(GROUP, MEMBER, ".kick");

    assert_eq!(fx.dispatch("kick", &[], &msg).await, DispatchOutcome::Denied);

    let texts = fx.socket.sent_texts();
    assert_eq!(texts.len(), 1);
    assert!(texts[0].contains("admins"));
    assert!(fx.socket.log.participant_updates.lock().unwrap().is_empty());
}

#[tokio::test]
async fn kick_by_admin_with_no_mentions_skips_group_update() {
    let fx = Fixture::new();
    let msg = group_text(GROUP, ADMIN, ".kick");

    assert_eq!(fx.dispatch("kick", &[], &msg).await, DispatchOutcome::Ran);

    // Usage reply, but no membership mutation.
    assert!(fx.socket.log.participant_updates.lock().unwrap().is_empty());
    let texts = fx.socket.sent_texts();
    assert_eq!(texts.len(), 1);
    assert!(texts[0].to_lowercase().contains("mention"));
}

#[tokio::test]
async fn kick_by_admin_with_mentions_removes_them() {
    let fx = Fixture::new();
    let mut msg = group_text(GROUP, ADMIN, ".kick @member");
    msg.mentions.push(Jid::from(MEMBER));

    assert_eq!(fx.dispatch("kick", &[], &msg).await, DispatchOutcome::Ran);

    let updates = fx.socket.log.participant_updates.lock().unwrap();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].1, vec![Jid::from(MEMBER)]);
}

#[tokio::test]
async fn metadata_fetch_failure_counts_as_not_admin() {
    let fx = Fixture::new();
    fx.socket.fail_group_metadata.store(true, Ordering::SeqCst);
    let msg = group_text(GROUP, ADMIN, ".kick");

    assert_eq!(fx.dispatch("kick", &[], &msg).await, DispatchOutcome::Denied);
    assert!(fx.socket.sent_texts()[0].contains("admins"));
}

#[tokio::test]
async fn disabled_ping_replies_notice_and_reenabling_restores_dispatch() {
    let mut fx = Fixture::new();
    fx.settings.disabled_commands.insert("ping".into());

    let msg = private_text(MEMBER, ".ping");
    assert_eq!(fx.dispatch("ping", &[], &msg).await, DispatchOutcome::Disabled);
    assert!(fx.socket.sent_texts()[0].contains("disabled"));

    fx.settings.disabled_commands.remove("ping");
    assert_eq!(fx.dispatch("ping", &[], &msg).await, DispatchOutcome::Ran);
    assert_eq!(fx.socket.sent_texts().last().unwrap(), "Pong!");
}

#[tokio::test]
async fn ping_sends_reaction_before_handler() {
    let fx = Fixture::new();
    let msg = private_text(MEMBER, ".ping");
    assert_eq!(fx.dispatch("ping", &[], &msg).await, DispatchOutcome::Ran);

    let reactions = fx.socket.log.reactions.lock().unwrap();
    assert_eq!(reactions.len(), 1);
    assert_eq!(reactions[0].1, msg.id);
}

#[tokio::test]
async fn owner_only_command_rejects_non_owner() {
    let mut fx = Fixture::new();
    fx.settings.owner = Some(Jid::from(ADMIN));

    let msg = private_text(MEMBER, ".setprefix !");
    let args = vec!["!".to_string()];
    assert_eq!(
        fx.dispatch("setprefix", &args, &msg).await,
        DispatchOutcome::Denied
    );
    assert!(fx.socket.sent_texts()[0].contains("owner"));
}

#[tokio::test]
async fn owner_can_change_prefix() {
    let mut fx = Fixture::new();
    fx.settings.owner = Some(Jid::from(ADMIN));

    let msg = private_text(ADMIN, ".setprefix !");
    let args = vec!["!".to_string()];
    assert_eq!(fx.dispatch("setprefix", &args, &msg).await, DispatchOutcome::Ran);

    let stored = fx.store.get_settings(&fx.tenant).await.unwrap();
    assert_eq!(stored.prefix, "!");
}

struct ExplodingCommand;

#[async_trait]
impl CommandHandler for ExplodingCommand {
    async fn run(&self, _ctx: &CommandContext<'_>) -> Result<(), WahubError> {
        Err(WahubError::Internal("deliberate failure".into()))
    }
}

#[tokio::test]
async fn handler_failure_is_contained_and_reported() {
    let mut fx = Fixture::new();
    fx.registry
        .register(CommandSpec::new(&["boom"], "explodes"), Arc::new(ExplodingCommand));

    let msg = private_text(MEMBER, ".boom");
    assert_eq!(fx.dispatch("boom", &[], &msg).await, DispatchOutcome::Failed);

    let texts = fx.socket.sent_texts();
    assert_eq!(texts.len(), 1);
    assert!(texts[0].contains("failed to run"));
}

struct CountingCommand(Arc<AtomicUsize>);

#[async_trait]
impl CommandHandler for CountingCommand {
    async fn run(&self, _ctx: &CommandContext<'_>) -> Result<(), WahubError> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[tokio::test]
async fn disabled_trigger_never_invokes_handler() {
    let mut fx = Fixture::new();
    let calls = Arc::new(AtomicUsize::new(0));
    fx.registry.register(
        CommandSpec::new(&["count"], "counts invocations"),
        Arc::new(CountingCommand(Arc::clone(&calls))),
    );
    fx.settings.disabled_commands.insert("count".into());

    let msg = private_text(MEMBER, ".count");
    fx.dispatch("count", &[], &msg).await;
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn menu_lists_registered_commands() {
    let fx = Fixture::new();
    let msg = private_text(MEMBER, ".menu");
    assert_eq!(fx.dispatch("menu", &[], &msg).await, DispatchOutcome::Ran);

    let texts = fx.socket.sent_texts();
    assert!(texts[0].contains(".ping"));
    assert!(texts[0].contains(".kick"));
}
