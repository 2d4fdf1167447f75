// SPDX-FileCopyrightText: 2026 Wahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions consumed by the session core.
//!
//! Each external collaborator (protocol socket, auth store, record store,
//! event bus) is specified at its interface boundary; concrete
//! implementations live in their own crates and use `#[async_trait]` for
//! dynamic dispatch.

pub mod auth;
pub mod bus;
pub mod socket;
pub mod store;

pub use auth::AuthStateStore;
pub use bus::EventBus;
pub use socket::{WaConnector, WaSocket};
pub use store::RecordStore;
