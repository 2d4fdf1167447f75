// SPDX-FileCopyrightText: 2026 Wahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in commands registered for every tenant.
//!
//! Dropping in a new command means adding a module here and listing it in
//! [`register_builtins`]; there is no runtime plugin loading.

pub mod group;
pub mod menu;
pub mod owner;
pub mod ping;

pub use group::{DemoteCommand, KickCommand, PromoteCommand};
pub use menu::MenuCommand;
pub use owner::SetPrefixCommand;
pub use ping::PingCommand;

use std::sync::Arc;

use crate::registry::CommandRegistry;

/// Registers all built-in commands into the given registry.
pub fn register_builtins(registry: &mut CommandRegistry) {
    registry.register(ping::spec(), Arc::new(PingCommand));
    registry.register(menu::spec(), Arc::new(MenuCommand));
    registry.register(group::kick_spec(), Arc::new(KickCommand));
    registry.register(group::promote_spec(), Arc::new(PromoteCommand));
    registry.register(group::demote_spec(), Arc::new(DemoteCommand));
    registry.register(owner::spec(), Arc::new(SetPrefixCommand));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_builtins_covers_all_triggers() {
        let mut registry = CommandRegistry::new();
        register_builtins(&mut registry);

        for trigger in ["ping", "menu", "help", "kick", "remove", "promote", "demote", "setprefix"] {
            assert!(registry.get(trigger).is_some(), "missing trigger {trigger}");
        }
    }

    #[test]
    fn kick_requires_group_and_admin() {
        let mut registry = CommandRegistry::new();
        register_builtins(&mut registry);

        let entry = registry.get("kick").unwrap();
        assert!(entry.spec.group_only);
        assert!(entry.spec.admin_only);
    }

    #[test]
    fn setprefix_is_owner_only() {
        let mut registry = CommandRegistry::new();
        register_builtins(&mut registry);
        assert!(registry.get("setprefix").unwrap().spec.owner_only);
    }
}
