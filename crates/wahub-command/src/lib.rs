// SPDX-FileCopyrightText: 2026 Wahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command registry and dispatcher for Wahub tenant sessions.
//!
//! This crate provides the [`CommandHandler`] trait, the load-once
//! [`CommandRegistry`], the permission-gated [`dispatch`] entry point, and
//! the built-in command modules:
//! - [`builtin::PingCommand`] -- liveness check
//! - [`builtin::MenuCommand`] -- command listing
//! - [`builtin::KickCommand`] / [`builtin::PromoteCommand`] /
//!   [`builtin::DemoteCommand`] -- group administration
//! - [`builtin::SetPrefixCommand`] -- owner-only prefix change

pub mod builtin;
pub mod dispatch;
pub mod registry;

pub use builtin::register_builtins;
pub use dispatch::{dispatch, DispatchOutcome};
pub use registry::{CommandContext, CommandEntry, CommandHandler, CommandRegistry, CommandSpec};
