// SPDX-FileCopyrightText: 2026 Wahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Wahub session control plane.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Wahub workspace. The session manager,
//! router, and dispatcher crates all build on the collaborator traits
//! defined here.

pub mod error;
pub mod event;
pub mod traits;
pub mod types;
pub mod wire;

// Re-export key items at crate root for ergonomic imports.
pub use error::WahubError;
pub use event::SessionEvent;
pub use types::{AuthMethod, ConnectionState, Jid, TenantId, TenantSettings, TenantStats};

// Re-export all collaborator traits at crate root.
pub use traits::{AuthStateStore, EventBus, RecordStore, WaConnector, WaSocket};
